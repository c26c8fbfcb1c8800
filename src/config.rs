//! # Client Configuration
//!
//! Connection settings loaded from environment variables.
//!
//! The C entry points take no configuration arguments, so everything the
//! REST backend needs is read from the process environment when a client
//! (or a legacy one-shot connection) is created.

use std::time::Duration;
use tracing::warn;

use crate::constants::{
    DEFAULT_ENDPOINT, DEFAULT_METADATA_HOST, DEFAULT_REQUEST_TIMEOUT_SECS, ENV_ACCESS_TOKEN,
    ENV_ENDPOINT, ENV_METADATA_HOST, ENV_REQUEST_TIMEOUT_SECS,
};

/// Settings for one connection to the Secret Manager REST API
#[derive(Clone)]
pub struct ClientConfig {
    /// API base URL, without the `/v1` suffix
    pub endpoint: String,
    /// Static bearer token; when unset the metadata server is asked for one
    pub access_token: Option<String>,
    /// Metadata server host used for Workload Identity tokens
    pub metadata_host: String,
    /// Per-request timeout applied by the HTTP client
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("metadata_host", &self.metadata_host)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            access_token: None,
            metadata_host: DEFAULT_METADATA_HOST.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let request_timeout_secs = match get(ENV_REQUEST_TIMEOUT_SECS) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    warn!(
                        "Ignoring invalid {}={:?}, using default of {}s",
                        ENV_REQUEST_TIMEOUT_SECS, raw, DEFAULT_REQUEST_TIMEOUT_SECS
                    );
                    DEFAULT_REQUEST_TIMEOUT_SECS
                }
            },
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Self {
            endpoint: get(ENV_ENDPOINT)
                .map_or_else(|| DEFAULT_ENDPOINT.to_string(), |e| e.trim_end_matches('/').to_string()),
            access_token: get(ENV_ACCESS_TOKEN),
            metadata_host: get(ENV_METADATA_HOST)
                .unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string()),
            request_timeout_secs,
        }
    }

    /// Get request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// URL of the metadata server token endpoint
    pub fn metadata_token_url(&self) -> String {
        format!(
            "http://{}/computeMetadata/v1/instance/service-accounts/default/token",
            self.metadata_host
        )
    }
}
