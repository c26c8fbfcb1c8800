//! # Read Operations
//!
//! Implementation of [`SecretService`] for the GCP Secret Manager REST API.

use async_trait::async_trait;
use tracing::field::Empty;
use tracing::{debug_span, Instrument};

use super::rest::{decode_access_response, metadata_from_response, SecretManagerRest};
use crate::error::ClientError;
use crate::metadata::SecretVersionMetadata;
use crate::provider::common::OperationTracker;
use crate::provider::{SecretBytes, SecretService};

const PROVIDER: &str = "gcp";

#[async_trait]
impl SecretService for SecretManagerRest {
    async fn access_secret_version(&self, name: &str) -> Result<SecretBytes, ClientError> {
        let span = debug_span!(
            "gcp.secret.access",
            secret.name = name,
            operation.success = Empty,
            operation.duration_ms = Empty,
            error.status = Empty,
            error.code = Empty,
        );
        let tracker = OperationTracker::new(span.clone(), PROVIDER, "access");

        let result = self
            .get(&format!("{name}:access"), decode_access_response)
            .instrument(span)
            .await;

        tracker.finish(result)
    }

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersionMetadata, ClientError> {
        let span = debug_span!(
            "gcp.secret.get_version",
            secret.name = name,
            operation.success = Empty,
            operation.duration_ms = Empty,
            error.status = Empty,
            error.code = Empty,
        );
        let tracker = OperationTracker::new(span.clone(), PROVIDER, "get_version");

        let result = self
            .get(name, metadata_from_response)
            .instrument(span)
            .await;

        tracker.finish(result)
    }
}
