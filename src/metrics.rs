// Copyright 2025 Memophor Labs
// SPDX-License-Identifier: Apache-2.0

//! Prometheus metrics collection for the gateway.
//!
//! Tracks outbound provider calls and locally rejected requests.

use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry};
use std::sync::Arc;

use crate::error::AppError;

/// Metrics collector for moviegate
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,

    // Upstream metrics, labelled by operation
    pub upstream_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub upstream_latency: HistogramVec,

    // Requests rejected before reaching the provider
    pub validation_failures: IntCounter,
}

fn metric_error(e: prometheus::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("Failed to create metric: {}", e))
}

impl Metrics {
    pub fn new() -> Result<Self, AppError> {
        let registry = Registry::new();

        let upstream_requests = IntCounterVec::new(
            Opts::new(
                "moviegate_upstream_requests_total",
                "Total number of calls issued to the movie provider",
            ),
            &["operation"],
        )
        .map_err(metric_error)?;

        let upstream_failures = IntCounterVec::new(
            Opts::new(
                "moviegate_upstream_failures_total",
                "Total number of provider calls that resulted in an error",
            ),
            &["operation"],
        )
        .map_err(metric_error)?;

        let upstream_latency = HistogramVec::new(
            HistogramOpts::new(
                "moviegate_upstream_latency_seconds",
                "Duration of provider calls in seconds",
            )
            .buckets(vec![
                0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.0, 5.0, 10.0,
            ]),
            &["operation"],
        )
        .map_err(metric_error)?;

        let validation_failures = IntCounter::with_opts(Opts::new(
            "moviegate_validation_failures_total",
            "Total number of requests rejected before any provider call",
        ))
        .map_err(metric_error)?;

        registry
            .register(Box::new(upstream_requests.clone()))
            .map_err(metric_error)?;
        registry
            .register(Box::new(upstream_failures.clone()))
            .map_err(metric_error)?;
        registry
            .register(Box::new(upstream_latency.clone()))
            .map_err(metric_error)?;
        registry
            .register(Box::new(validation_failures.clone()))
            .map_err(metric_error)?;

        Ok(Self {
            registry: Arc::new(registry),
            upstream_requests,
            upstream_failures,
            upstream_latency,
            validation_failures,
        })
    }

    /// Record a provider call and how long it took
    pub fn record_upstream(&self, operation: &str, seconds: f64, failed: bool) {
        self.upstream_requests.with_label_values(&[operation]).inc();
        self.upstream_latency
            .with_label_values(&[operation])
            .observe(seconds);
        if failed {
            self.upstream_failures.with_label_values(&[operation]).inc();
        }
    }

    pub fn record_validation_failure(&self) {
        self.validation_failures.inc();
    }

    /// Export metrics in Prometheus format
    pub fn export(&self) -> Result<String, AppError> {
        use prometheus::Encoder;

        let encoder = prometheus::TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode metrics: {}", e)))?;

        String::from_utf8(buffer).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "Failed to convert metrics to string: {}",
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_calls_are_counted_per_operation() {
        let metrics = Metrics::new().unwrap();

        metrics.record_upstream("popular", 0.02, false);
        metrics.record_upstream("popular", 0.03, true);
        metrics.record_upstream("search", 0.01, false);

        assert_eq!(
            metrics.upstream_requests.with_label_values(&["popular"]).get(),
            2
        );
        assert_eq!(
            metrics.upstream_failures.with_label_values(&["popular"]).get(),
            1
        );
        assert_eq!(
            metrics.upstream_failures.with_label_values(&["search"]).get(),
            0
        );
    }

    #[test]
    fn export_renders_text_exposition() {
        let metrics = Metrics::new().unwrap();
        metrics.record_validation_failure();
        metrics.record_upstream("trending", 0.1, false);

        let text = metrics.export().unwrap();

        assert!(text.contains("moviegate_validation_failures_total 1"));
        assert!(text.contains("moviegate_upstream_requests_total{operation=\"trending\"} 1"));
    }
}
