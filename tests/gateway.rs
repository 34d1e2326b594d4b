//! End-to-end tests: router + TMDB client against a stub provider.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use moviegate::{router, AppState, Metrics, TmdbClient, UpstreamConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "integration-key";

fn gateway(upstream_uri: &str) -> Router {
    let client = TmdbClient::try_new(UpstreamConfig {
        base_url: upstream_uri.to_string(),
        api_key: API_KEY.to_string(),
        language: "en-US".to_string(),
        timeout: Some(Duration::from_secs(5)),
    })
    .unwrap();
    let state = AppState::new(client, Metrics::new().unwrap());
    router(state, None)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn popular_preserves_provider_order() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/popular"))
        .and(query_param("api_key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [
                {"id": 693134, "title": "Dune: Part Two", "poster_path": "/dune.jpg", "release_date": "2024-02-27", "vote_average": 8.2},
                {"id": 823464, "title": "Godzilla x Kong", "poster_path": null, "release_date": "2024-03-27", "vote_average": 7.2}
            ]
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = get_json(gateway(&upstream.uri()), "/api/movies/popular").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["id"], 693134);
    assert_eq!(body["data"][1]["id"], 823464);
    assert_eq!(body["data"][0]["poster_path"], "/dune.jpg");
    assert!(body["data"][1]["poster_path"].is_null());
}

#[tokio::test]
async fn search_with_empty_results_reports_zero_count() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search/movie"))
        .and(query_param("query", "Matrix"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "page": 1,
            "results": [],
            "total_pages": 0,
            "total_results": 0
        })))
        .expect(1)
        .mount(&upstream)
        .await;

    let (status, body) = get_json(gateway(&upstream.uri()), "/api/movies/search?q=Matrix").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "count": 0, "data": []}));
}

#[tokio::test]
async fn search_without_query_does_not_reach_provider() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(0)
        .mount(&upstream)
        .await;

    let (status, body) = get_json(gateway(&upstream.uri()), "/api/movies/search").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Please provide a search query (?q=movie_name)");
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn details_return_the_requested_movie() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/27205"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 27205,
            "title": "Inception",
            "overview": "Cobb steals secrets.",
            "genres": [{"id": 28, "name": "Action"}, {"id": 878, "name": "Science Fiction"}],
            "runtime": 148,
            "tagline": "Your mind is the scene of the crime.",
            "backdrop_path": "/backdrop.jpg",
            "poster_path": "/poster.jpg",
            "release_date": "2010-07-15",
            "vote_average": 8.4
        })))
        .mount(&upstream)
        .await;

    let (status, body) = get_json(gateway(&upstream.uri()), "/api/movies/27205").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["id"], 27205);
    assert_eq!(body["data"]["runtime"], 148);
    assert_eq!(body["data"]["genres"][1]["name"], "Science Fiction");
}

#[tokio::test]
async fn provider_rejection_becomes_server_error_envelope() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/movie/999999999/recommendations"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "success": false,
            "status_code": 34,
            "status_message": "The resource you requested could not be found."
        })))
        .mount(&upstream)
        .await;

    let (status, body) = get_json(
        gateway(&upstream.uri()),
        "/api/movies/999999999/recommendations",
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get recommendations:"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn unreachable_provider_is_caught_at_the_handler() {
    let (status, body) = get_json(gateway("http://127.0.0.1:1"), "/api/movies/trending").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to get trending movies:"));
}
