// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Data models for movie payloads and the response envelope.
//!
//! Movie DTOs keep TMDB's snake_case field names so the browser can read
//! provider shaped objects unchanged.

use serde::{Deserialize, Serialize};

pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/500x750?text=No+Poster";
pub const BACKDROP_PLACEHOLDER: &str = "https://via.placeholder.com/1920x1080?text=No+Backdrop";

/// A movie as returned by list endpoints (search, popular, trending, recommendations).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// Full movie record returned by the details lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub summary: MovieSummary,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Paged list wrapper used by every TMDB list endpoint.
#[derive(Debug, Deserialize)]
pub struct MoviePage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<MovieSummary>,
}

impl MovieSummary {
    /// Poster URL for the given TMDB size (e.g. `w500`), or the placeholder
    /// image when the movie has no poster.
    pub fn poster_url(&self, size: &str) -> String {
        image_url(self.poster_path.as_deref(), size).unwrap_or_else(|| POSTER_PLACEHOLDER.to_string())
    }
}

impl MovieDetail {
    pub fn backdrop_url(&self, size: &str) -> String {
        image_url(self.backdrop_path.as_deref(), size)
            .unwrap_or_else(|| BACKDROP_PLACEHOLDER.to_string())
    }
}

fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.map(str::trim)
        .filter(|path| !path.is_empty())
        .map(|path| format!("{IMAGE_BASE_URL}/{size}{path}"))
}

/// Uniform `{success, count?, data?, error?}` wrapper returned by every endpoint.
///
/// Fields are private: the constructors guarantee that a success carries data
/// and no error, and a failure carries an error and no data.
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> Envelope<T> {
    pub fn item(data: T) -> Self {
        Self {
            success: true,
            count: None,
            data: Some(data),
            error: None,
        }
    }
}

impl<T> Envelope<Vec<T>> {
    pub fn list(data: Vec<T>) -> Self {
        Self {
            success: true,
            count: Some(data.len()),
            data: Some(data),
            error: None,
        }
    }
}

impl Envelope<()> {
    pub fn failure<M: Into<String>>(message: M) -> Self {
        Self {
            success: false,
            count: None,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointIndex {
    pub search: &'static str,
    pub details: &'static str,
    pub popular: &'static str,
    pub trending: &'static str,
    pub recommendations: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceIndex {
    pub message: &'static str,
    pub endpoints: EndpointIndex,
}

impl Default for ServiceIndex {
    fn default() -> Self {
        Self {
            message: "Welcome to Movie Database API!",
            endpoints: EndpointIndex {
                search: "/api/movies/search?q=movie_name",
                details: "/api/movies/:id",
                popular: "/api/movies/popular",
                trending: "/api/movies/trending",
                recommendations: "/api/movies/:id/recommendations",
            },
        }
    }
}
