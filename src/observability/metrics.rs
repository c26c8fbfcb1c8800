//! # Metrics
//!
//! Prometheus metrics for monitoring the library from inside a host process.
//!
//! ## Metrics Exposed
//!
//! - `smc_operations_total` - Exported operations by name and outcome status
//! - `smc_operation_duration_seconds` - Duration of exported operations
//! - `smc_provider_requests_total` - Requests sent to the remote secret service
//! - `smc_provider_request_errors_total` - Failed requests to the remote secret service
//! - `smc_provider_request_duration_seconds` - Duration of remote requests
//! - `smc_clients_live` - Client handles created and not yet destroyed
//!
//! The host reads them through `smc_metrics_text`, which renders the
//! Prometheus text exposition format.

use prometheus::{HistogramVec, IntCounterVec, IntGauge, Registry, TextEncoder};
use std::sync::LazyLock;

use crate::error::{ClientError, Status};

static OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "smc_operations_total",
            "Total number of exported operations by operation and status",
        ),
        &["operation", "status"],
    )
    .expect("Failed to create OPERATIONS_TOTAL metric - this should never happen")
});

static OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "smc_operation_duration_seconds",
            "Duration of exported operations in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0]),
        &["operation"],
    )
    .expect("Failed to create OPERATION_DURATION metric - this should never happen")
});

static PROVIDER_REQUESTS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "smc_provider_requests_total",
            "Total number of requests to the remote secret service",
        ),
        &["provider", "operation"],
    )
    .expect("Failed to create PROVIDER_REQUESTS_TOTAL metric - this should never happen")
});

static PROVIDER_REQUEST_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        prometheus::Opts::new(
            "smc_provider_request_errors_total",
            "Total number of failed requests to the remote secret service",
        ),
        &["provider", "operation"],
    )
    .expect("Failed to create PROVIDER_REQUEST_ERRORS_TOTAL metric - this should never happen")
});

static PROVIDER_REQUEST_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        prometheus::HistogramOpts::new(
            "smc_provider_request_duration_seconds",
            "Duration of requests to the remote secret service in seconds",
        )
        .buckets(vec![0.05, 0.1, 0.5, 1.0, 2.0, 5.0]),
        &["provider"],
    )
    .expect("Failed to create PROVIDER_REQUEST_DURATION metric - this should never happen")
});

static CLIENTS_LIVE: LazyLock<IntGauge> = LazyLock::new(|| {
    IntGauge::new(
        "smc_clients_live",
        "Number of client handles created and not yet destroyed",
    )
    .expect("Failed to create CLIENTS_LIVE metric - this should never happen")
});

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    let registry = Registry::new();
    if let Err(e) = register_metrics(&registry) {
        tracing::warn!("Failed to register metrics: {}", e);
    }
    registry
});

fn register_metrics(registry: &Registry) -> prometheus::Result<()> {
    registry.register(Box::new(OPERATIONS_TOTAL.clone()))?;
    registry.register(Box::new(OPERATION_DURATION.clone()))?;
    registry.register(Box::new(PROVIDER_REQUESTS_TOTAL.clone()))?;
    registry.register(Box::new(PROVIDER_REQUEST_ERRORS_TOTAL.clone()))?;
    registry.register(Box::new(PROVIDER_REQUEST_DURATION.clone()))?;
    registry.register(Box::new(CLIENTS_LIVE.clone()))?;
    Ok(())
}

pub fn record_operation(operation: &str, status: Status, duration: f64) {
    OPERATIONS_TOTAL
        .with_label_values(&[operation, status.as_str()])
        .inc();
    OPERATION_DURATION
        .with_label_values(&[operation])
        .observe(duration);
}

pub fn record_provider_request(provider: &str, operation: &str, duration: f64) {
    PROVIDER_REQUESTS_TOTAL
        .with_label_values(&[provider, operation])
        .inc();
    PROVIDER_REQUEST_DURATION
        .with_label_values(&[provider])
        .observe(duration);
}

pub fn increment_provider_request_errors(provider: &str, operation: &str) {
    PROVIDER_REQUEST_ERRORS_TOTAL
        .with_label_values(&[provider, operation])
        .inc();
}

pub fn increment_clients_live() {
    CLIENTS_LIVE.inc();
}

pub fn decrement_clients_live() {
    CLIENTS_LIVE.dec();
}

/// Render all metrics in the Prometheus text exposition format
///
/// # Errors
/// Returns a serialization error if encoding fails
pub fn gather_text() -> Result<String, ClientError> {
    TextEncoder::new()
        .encode_to_string(&REGISTRY.gather())
        .map_err(|e| ClientError::Serialization(format!("Failed to encode metrics: {e}")))
}
