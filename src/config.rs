// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Environment driven configuration.
//!
//! Values are read through a lookup function so the parsing rules can be
//! exercised without touching the process environment.

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Settings for the outbound TMDB client.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub api_key: String,
    pub language: String,
    /// `None` leaves the transport default (no timeout) in place.
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    listen_addr: SocketAddr,
    pub upstream: UpstreamConfig,
    pub static_dir: Option<PathBuf>,
    pub json_logs: bool,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("TMDB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .context("TMDB_API_KEY must be set")?;

        let host: IpAddr = lookup("MOVIEGATE_HOST")
            .unwrap_or_else(|| "0.0.0.0".to_string())
            .parse()
            .context("invalid MOVIEGATE_HOST")?;

        let port: u16 = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .context("PORT must be a valid port number")?;

        let base_url = lookup("TMDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("TMDB_BASE_URL must be an http(s) URL, got {base_url}");
        }

        let language = lookup("TMDB_LANGUAGE")
            .filter(|lang| !lang.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        let timeout = parse_timeout(lookup("TMDB_TIMEOUT_SECONDS"), 10)?;

        let static_dir = lookup("MOVIEGATE_STATIC_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from);

        let json_logs = lookup("MOVIEGATE_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            listen_addr: SocketAddr::new(host, port),
            upstream: UpstreamConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                language,
                timeout,
            },
            static_dir,
            json_logs,
        })
    }

    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }
}

fn parse_timeout(raw: Option<String>, default_secs: u64) -> Result<Option<Duration>> {
    let secs: u64 = match raw {
        Some(value) => value
            .trim()
            .parse()
            .context("TMDB_TIMEOUT_SECONDS must be an integer number of seconds")?,
        None => default_secs,
    };

    if secs == 0 {
        return Ok(None);
    }

    Ok(Some(Duration::from_secs(secs)))
}
