// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use moviegate::{router, AppConfig, AppState, Metrics, TmdbClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cfg = AppConfig::from_env()?;
    init_tracing(cfg.json_logs);

    let provider =
        TmdbClient::try_new(cfg.upstream.clone()).context("failed to build TMDB client")?;
    let metrics = Metrics::new().context("failed to register metrics")?;
    let state = AppState::new(provider, metrics);

    if let Some(dir) = &cfg.static_dir {
        tracing::info!(dir = %dir.display(), "serving static front-end");
    }
    match cfg.upstream.timeout {
        Some(timeout) => tracing::info!(?timeout, "upstream timeout configured"),
        None => tracing::warn!("upstream timeout disabled; stalled provider calls will hang"),
    }

    let app = router(state, cfg.static_dir.as_deref());

    let listen_addr = cfg.listen_addr();
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;

    tracing::info!(%listen_addr, upstream = %cfg.upstream.base_url, "starting moviegate");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("moviegate exited cleanly");

    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(%error, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term_signal) => term_signal.recv().await,
            Err(error) => {
                tracing::warn!(%error, "failed to install SIGTERM handler");
                None
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
