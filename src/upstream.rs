// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Upstream client for the TMDB movie metadata API.
//!
//! Every operation issues exactly one GET with the API key and locale
//! attached. There are no retries and nothing is cached between calls.

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::UpstreamConfig;
use crate::model::{MovieDetail, MoviePage, MovieSummary};

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("invalid provider base url `{0}`")]
    BaseUrl(String),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed provider payload at `{path}`: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of movie metadata consumed by the HTTP handlers.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieProvider: Send + Sync {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, UpstreamError>;
    async fn get_movie_details(&self, id: &str) -> Result<MovieDetail, UpstreamError>;
    async fn get_popular_movies(&self) -> Result<Vec<MovieSummary>, UpstreamError>;
    async fn get_trending_movies(&self) -> Result<Vec<MovieSummary>, UpstreamError>;
    async fn get_movie_recommendations(&self, id: &str) -> Result<Vec<MovieSummary>, UpstreamError>;
}

/// HTTP client wrapper for talking to TMDB.
#[derive(Clone)]
pub struct TmdbClient {
    base_url: Url,
    api_key: String,
    language: String,
    client: Client,
}

/// Error body TMDB sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ProviderErrorBody {
    status_message: String,
}

impl TmdbClient {
    pub fn try_new(config: UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(&config.base_url)
            .ok()
            .filter(|url| !url.cannot_be_a_base())
            .ok_or_else(|| UpstreamError::BaseUrl(config.base_url.clone()))?;

        Ok(Self {
            base_url,
            api_key: config.api_key,
            language: config.language,
            client,
        })
    }

    /// Append `segments` to the base URL, each percent-encoded as exactly one
    /// path segment so caller supplied ids cannot address another endpoint.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::BaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<T, UpstreamError> {
        let url = self.endpoint(segments)?;
        tracing::debug!(path = url.path(), "calling tmdb");

        let response = self
            .client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body)
                .map(|err| err.status_message)
                .unwrap_or(body);
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let deserializer = &mut serde_json::Deserializer::from_str(&body);
        serde_path_to_error::deserialize(deserializer).map_err(|e| UpstreamError::Decode {
            path: e.path().to_string(),
            source: e.into_inner(),
        })
    }

    async fn get_page(
        &self,
        segments: &[&str],
        params: &[(&str, &str)],
    ) -> Result<Vec<MovieSummary>, UpstreamError> {
        let page: MoviePage = self.get(segments, params).await?;
        tracing::debug!(?segments, page = page.page, results = page.results.len(), "tmdb page received");
        Ok(page.results)
    }
}

#[async_trait]
impl MovieProvider for TmdbClient {
    async fn search_movies(&self, query: &str) -> Result<Vec<MovieSummary>, UpstreamError> {
        self.get_page(
            &["search", "movie"],
            &[("query", query), ("language", self.language.as_str()), ("page", "1")],
        )
        .await
    }

    async fn get_movie_details(&self, id: &str) -> Result<MovieDetail, UpstreamError> {
        self.get(&["movie", id], &[("language", self.language.as_str())])
            .await
    }

    async fn get_popular_movies(&self) -> Result<Vec<MovieSummary>, UpstreamError> {
        self.get_page(
            &["movie", "popular"],
            &[("language", self.language.as_str()), ("page", "1")],
        )
        .await
    }

    async fn get_trending_movies(&self) -> Result<Vec<MovieSummary>, UpstreamError> {
        self.get_page(&["trending", "movie", "week"], &[("language", self.language.as_str())])
            .await
    }

    async fn get_movie_recommendations(&self, id: &str) -> Result<Vec<MovieSummary>, UpstreamError> {
        self.get_page(
            &["movie", id, "recommendations"],
            &[("language", self.language.as_str()), ("page", "1")],
        )
        .await
    }
}
