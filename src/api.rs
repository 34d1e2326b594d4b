// Copyright 2025 Memophor Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! HTTP API handlers for moviegate.
//!
//! This module implements the public REST endpoints:
//!
//! - `GET /` - Endpoint index
//! - `GET /healthz` - Service health check
//! - `GET /metrics` - Prometheus metrics export
//! - `GET /api/movies/search?q=` - Search by title
//! - `GET /api/movies/popular` - Popular movies
//! - `GET /api/movies/trending` - Movies trending this week
//! - `GET /api/movies/:id` - Movie details
//! - `GET /api/movies/:id/recommendations` - Movies similar to `id`
//!
//! Every handler makes at most one provider call and answers with an
//! [`Envelope`]. Provider failures never escape past this boundary.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path as UrlPath, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tokio::time::Instant;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::metrics::Metrics;
use crate::model::{Envelope, MovieDetail, MovieSummary, SearchQuery, ServiceIndex};
use crate::upstream::{MovieProvider, UpstreamError};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn MovieProvider>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(provider: impl MovieProvider + 'static, metrics: Metrics) -> Self {
        Self {
            provider: Arc::new(provider),
            metrics,
        }
    }
}

type ListResponse = Result<Json<Envelope<Vec<MovieSummary>>>, AppError>;

#[derive(Debug, Clone, Copy)]
enum Operation {
    Search,
    Details,
    Popular,
    Trending,
    Recommendations,
}

impl Operation {
    fn label(self) -> &'static str {
        match self {
            Operation::Search => "search",
            Operation::Details => "details",
            Operation::Popular => "popular",
            Operation::Trending => "trending",
            Operation::Recommendations => "recommendations",
        }
    }

    fn action(self) -> &'static str {
        match self {
            Operation::Search => "search movies",
            Operation::Details => "get movie details",
            Operation::Popular => "get popular movies",
            Operation::Trending => "get trending movies",
            Operation::Recommendations => "get recommendations",
        }
    }
}

/// Await a provider call, record it, and convert its failure into an [`AppError`].
async fn call_upstream<T, F>(state: &AppState, operation: Operation, call: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    let start = Instant::now();
    let result = call.await;
    state.metrics.record_upstream(
        operation.label(),
        start.elapsed().as_secs_f64(),
        result.is_err(),
    );

    result.map_err(|error| {
        tracing::warn!(operation = operation.label(), %error, "provider call failed");
        AppError::upstream(operation.action(), error)
    })
}

/// Build the application router.
///
/// When `static_dir` is given, unknown paths are served from it so the
/// browser front-end can be hosted by the same process.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let routes = Router::new()
        .route("/", get(index))
        .route("/healthz", get(health))
        .route("/metrics", get(metrics))
        .route("/api/movies/search", get(search_movies))
        .route("/api/movies/popular", get(popular_movies))
        .route("/api/movies/trending", get(trending_movies))
        .route("/api/movies/:id", get(movie_details))
        .route("/api/movies/:id/recommendations", get(movie_recommendations));

    let routes = match static_dir {
        Some(dir) => routes.fallback_service(ServeDir::new(dir)),
        None => routes.fallback(not_found),
    };

    routes.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    )
}

pub async fn index() -> Json<ServiceIndex> {
    Json(ServiceIndex::default())
}

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "moviegate",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Metrics endpoint
pub async fn metrics(State(state): State<AppState>) -> Result<String, AppError> {
    state.metrics.export()
}

pub async fn search_movies(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ListResponse {
    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            state.metrics.record_validation_failure();
            tracing::debug!(%rejection, "rejecting malformed search query");
            return Err(rejection.into());
        }
    };

    let Some(term) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) else {
        state.metrics.record_validation_failure();
        tracing::debug!("rejecting search without a query");
        return Err(AppError::bad_request(
            "Please provide a search query (?q=movie_name)",
        ));
    };

    let movies = call_upstream(&state, Operation::Search, state.provider.search_movies(term)).await?;
    Ok(Json(Envelope::list(movies)))
}

pub async fn movie_details(
    State(state): State<AppState>,
    id: Result<UrlPath<String>, PathRejection>,
) -> Result<Json<Envelope<MovieDetail>>, AppError> {
    let UrlPath(id) = id?;
    let movie = call_upstream(&state, Operation::Details, state.provider.get_movie_details(&id)).await?;
    Ok(Json(Envelope::item(movie)))
}

pub async fn popular_movies(State(state): State<AppState>) -> ListResponse {
    let movies = call_upstream(&state, Operation::Popular, state.provider.get_popular_movies()).await?;
    Ok(Json(Envelope::list(movies)))
}

pub async fn trending_movies(State(state): State<AppState>) -> ListResponse {
    let movies = call_upstream(&state, Operation::Trending, state.provider.get_trending_movies()).await?;
    Ok(Json(Envelope::list(movies)))
}

pub async fn movie_recommendations(
    State(state): State<AppState>,
    id: Result<UrlPath<String>, PathRejection>,
) -> ListResponse {
    let UrlPath(id) = id?;
    let movies = call_upstream(
        &state,
        Operation::Recommendations,
        state.provider.get_movie_recommendations(&id),
    )
    .await?;
    Ok(Json(Envelope::list(movies)))
}

async fn not_found() -> AppError {
    AppError::not_found("route not found")
}
