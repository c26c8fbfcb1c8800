//! GCP Secret Manager REST Client
//!
//! Native REST implementation for GCP Secret Manager API v1.
//! Uses reqwest for HTTP requests and OAuth2 bearer tokens for authentication.
//!
//! This implementation:
//! - Works directly with Pact HTTP mock servers
//! - Uses reqwest with rustls (no OpenSSL dependencies)
//! - Acquires tokens lazily, so constructing a client does no network I/O
//!
//! References:
//! - [GCP Secret Manager REST API v1](https://docs.cloud.google.com/secret-manager/docs/reference/rest)

use anyhow::{Context, Result};
use base64::{engine::general_purpose, Engine as _};
use reqwest::Client;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use super::responses::{AccessSecretVersionResponse, GcpErrorResponse, SecretVersionResponse, TokenResponse};
use super::rpc_code;
use crate::config::ClientConfig;
use crate::constants::TOKEN_EXPIRY_MARGIN_SECS;
use crate::error::ClientError;
use crate::metadata::{SecretVersionMetadata, Timestamp, VersionState};
use crate::provider::SecretBytes;

/// Access token plus the instant after which it must be refreshed
struct CachedToken {
    value: Zeroizing<String>,
    refresh_at: Instant,
}

/// GCP Secret Manager REST client
pub struct SecretManagerRest {
    http_client: Client,
    base_url: String,
    static_token: Option<Zeroizing<String>>,
    metadata_token_url: String,
    token_cache: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for SecretManagerRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretManagerRest")
            .field("base_url", &self.base_url)
            .field("static_token", &self.static_token.is_some())
            .finish_non_exhaustive()
    }
}

impl SecretManagerRest {
    /// Create a new GCP REST client
    ///
    /// Uses `SMC_ACCESS_TOKEN` when configured, otherwise Workload Identity
    /// tokens from the metadata server on first use.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        if config.access_token.is_some() {
            info!("Using static access token for {}", config.endpoint);
        } else {
            debug!(
                "Using Workload Identity authentication via metadata server {}",
                config.metadata_host
            );
        }

        Ok(Self {
            http_client,
            base_url: config.endpoint.clone(),
            static_token: config.access_token.clone().map(Zeroizing::new),
            metadata_token_url: config.metadata_token_url(),
            token_cache: Mutex::new(None),
        })
    }

    /// Get an OAuth2 access token for GCP API authentication
    ///
    /// Supports:
    /// - Static token (`SMC_ACCESS_TOKEN`) - for tests and local dev
    /// - Metadata server (Workload Identity) - for GKE/GCE, cached until near expiry
    pub(crate) async fn access_token(&self) -> Result<Zeroizing<String>, ClientError> {
        if let Some(token) = &self.static_token {
            return Ok(token.clone());
        }

        {
            let cache = self.token_cache.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(cached) = cache.as_ref() {
                if Instant::now() < cached.refresh_at {
                    return Ok(cached.value.clone());
                }
            }
        }

        let response = self
            .http_client
            .get(&self.metadata_token_url)
            .header("Metadata-Flavor", "Google")
            .send()
            .await
            .map_err(|e| {
                ClientError::Transport(format!(
                    "Failed to get access token from metadata server: {e}"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("Metadata server returned status {}: {}", status, body);
            if std::env::var("GOOGLE_APPLICATION_CREDENTIALS").is_ok() {
                warn!(
                    "GOOGLE_APPLICATION_CREDENTIALS is set but service account JSON authentication \
                    is not supported; set SMC_ACCESS_TOKEN or use Workload Identity"
                );
            }
            return Err(ClientError::Transport(format!(
                "Metadata server returned HTTP {} for access token request",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ClientError::Transport(format!("Failed to parse token response: {e}"))
        })?;
        info!("Retrieved access token from metadata server (Workload Identity)");

        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        let value = Zeroizing::new(token.access_token);
        let mut cache = self.token_cache.lock().unwrap_or_else(PoisonError::into_inner);
        *cache = Some(CachedToken {
            value: value.clone(),
            refresh_at: Instant::now() + Duration::from_secs(lifetime),
        });
        Ok(value)
    }

    /// Perform an authenticated GET against `/v1/{path}` and decode the body
    ///
    /// `decode` sees the response body in place. Non-2xx responses are
    /// converted to [`ClientError::Remote`].
    pub(crate) async fn get<T, F>(&self, path: &str, decode: F) -> Result<T, ClientError>
    where
        F: FnOnce(&[u8]) -> Result<T, ClientError>,
    {
        let token = self.access_token().await?;
        let url = format!("{}/v1/{}", self.base_url, path);

        // Format authorization header: add "Bearer " prefix if not already present
        let auth_header = if token.starts_with("Bearer ") {
            Zeroizing::new(token.as_str().to_string())
        } else {
            Zeroizing::new(format!("Bearer {}", token.as_str()))
        };

        let response = self
            .http_client
            .get(&url)
            .header("Authorization", auth_header.as_str())
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| ClientError::Transport(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Transport(format!("Failed to read response body: {e}")))?;

        if status.is_success() {
            decode(&body)
        } else {
            Err(error_from_response(status.as_u16(), &body))
        }
    }
}

/// Convert a GCP error response into a remote error
///
/// The backend code is the canonical rpc code; the message is the API's own
/// message, or the raw body when it is not a GCP error document.
pub(crate) fn error_from_response(http_status: u16, body: &[u8]) -> ClientError {
    match serde_json::from_slice::<GcpErrorResponse>(body) {
        Ok(parsed) => ClientError::Remote {
            code: rpc_code::resolve(Some(parsed.error.status.as_str()), http_status),
            message: parsed.error.message,
        },
        Err(_) => ClientError::Remote {
            code: rpc_code::from_http_status(http_status),
            message: String::from_utf8_lossy(body).trim().to_string(),
        },
    }
}

/// Decode the base64 payload of an access response
pub(crate) fn decode_access_response(body: &[u8]) -> Result<SecretBytes, ClientError> {
    let response: AccessSecretVersionResponse = serde_json::from_slice(body)
        .map_err(|e| ClientError::Serialization(format!("Failed to parse secret version response: {e}")))?;
    debug!("Decoding payload of {}", response.name);

    general_purpose::STANDARD
        .decode(response.payload.data.as_bytes())
        .map(Zeroizing::new)
        .map_err(|e| ClientError::Encoding(format!("Failed to decode base64 secret data: {e}")))
}

/// Convert a `SecretVersion` document into the metadata record
pub(crate) fn metadata_from_response(body: &[u8]) -> Result<SecretVersionMetadata, ClientError> {
    let response: SecretVersionResponse = serde_json::from_slice(body)
        .map_err(|e| ClientError::Serialization(format!("Failed to parse secret version: {e}")))?;

    let create_time = response
        .create_time
        .as_deref()
        .map(parse_timestamp)
        .transpose()?
        .unwrap_or_default();
    let destroy_time = response
        .destroy_time
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    Ok(SecretVersionMetadata {
        name: response.name,
        state: response
            .state
            .as_deref()
            .map_or(VersionState::Unspecified, VersionState::from_name)
            .code(),
        create_time,
        destroy_time,
        etag: response.etag,
    })
}

/// Split an RFC 3339 timestamp into seconds and nanoseconds since the epoch
pub(crate) fn parse_timestamp(raw: &str) -> Result<Timestamp, ClientError> {
    let parsed = chrono::DateTime::parse_from_rfc3339(raw)
        .map_err(|e| ClientError::Serialization(format!("Invalid timestamp {raw:?}: {e}")))?;
    let nanos = i32::try_from(parsed.timestamp_subsec_nanos())
        .map_err(|e| ClientError::Serialization(format!("Invalid timestamp {raw:?}: {e}")))?;
    Ok(Timestamp::new(parsed.timestamp(), nanos))
}
