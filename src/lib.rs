// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! moviegate: a thin HTTP gateway in front of the TMDB movie API.
//!
//! Requests are validated, forwarded to the provider with the configured API
//! key, and answered with a uniform `{success, count?, data?, error?}` envelope.

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod upstream;

pub use api::{router, AppState};
pub use config::{AppConfig, UpstreamConfig};
pub use error::AppError;
pub use metrics::Metrics;
pub use upstream::{MovieProvider, TmdbClient, UpstreamError};
