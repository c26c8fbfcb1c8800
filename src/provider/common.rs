//! # Common Provider Utilities
//!
//! Shared span and metric bookkeeping for remote requests, so every provider
//! reports outcomes the same way.

use crate::error::ClientError;
use crate::observability::metrics;
use std::time::{Duration, Instant};
use tracing::Span;

/// Records metrics and span attributes for a successful request
pub fn record_success_metrics(span: &Span, provider: &str, operation: &str, duration: Duration) {
    span.record("operation.duration_ms", duration_ms(duration));
    span.record("operation.success", true);
    metrics::record_provider_request(provider, operation, duration.as_secs_f64());
}

/// Records metrics and span attributes for a failed request
pub fn record_error_metrics(
    span: &Span,
    provider: &str,
    operation: &str,
    error: &ClientError,
    duration: Duration,
) {
    span.record("operation.success", false);
    span.record("error.status", error.status().as_str());
    span.record("error.code", error.backend_code());
    span.record("operation.duration_ms", duration_ms(duration));
    metrics::record_provider_request(provider, operation, duration.as_secs_f64());
    metrics::increment_provider_request_errors(provider, operation);
}

fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Helper struct for tracking one request
#[derive(Debug)]
pub struct OperationTracker {
    start: Instant,
    span: Span,
    provider: &'static str,
    operation: &'static str,
}

impl OperationTracker {
    /// Create a new operation tracker
    pub fn new(span: Span, provider: &'static str, operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            span,
            provider,
            operation,
        }
    }

    /// Record the outcome of `result` and pass it through
    pub fn finish<T>(&self, result: Result<T, ClientError>) -> Result<T, ClientError> {
        match &result {
            Ok(_) => record_success_metrics(
                &self.span,
                self.provider,
                self.operation,
                self.start.elapsed(),
            ),
            Err(e) => {
                record_error_metrics(
                    &self.span,
                    self.provider,
                    self.operation,
                    e,
                    self.start.elapsed(),
                );
                tracing::debug!(parent: &self.span, "{} {} failed: {}", self.provider, self.operation, e);
            }
        }
        result
    }
}
