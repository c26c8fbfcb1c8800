//! # Response Types
//!
//! GCP Secret Manager REST API response structures.
//!
//! These structs represent the JSON payloads returned by the GCP Secret Manager REST API v1.
//! They are designed to match the API schema as documented at:
//! https://cloud.google.com/secret-manager/docs/reference/rest

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Secret payload containing the actual secret data
///
/// The payload contains the secret value, which is base64-encoded
/// when transmitted over the REST API. An empty secret may omit `data`.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/SecretPayload
#[derive(Debug, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretPayload {
    /// Base64-encoded secret data
    #[serde(default)]
    pub data: String,
}

/// Response from accessing a secret version
///
/// Returned by `GET /v1/projects/{project}/secrets/{secret}/versions/{version}:access`
/// when successfully retrieving a secret version's value.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets.versions/access
#[derive(Debug, Deserialize)]
pub struct AccessSecretVersionResponse {
    /// The resource name of the secret version, with the version number resolved
    #[serde(default)]
    pub name: String,
    /// The secret payload containing the base64-encoded secret value
    #[serde(default)]
    pub payload: SecretPayload,
}

/// Secret version metadata
///
/// Returned by `GET /v1/projects/{project}/secrets/{secret}/versions/{version}`.
/// Timestamps are RFC 3339 strings; `destroyTime` is only present once the
/// version has been destroyed.
///
/// API Reference: https://cloud.google.com/secret-manager/docs/reference/rest/v1/projects.secrets.versions#SecretVersion
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretVersionResponse {
    pub name: String,
    #[serde(default)]
    pub create_time: Option<String>,
    #[serde(default)]
    pub destroy_time: Option<String>,
    /// Enum name, e.g. `ENABLED`
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub etag: String,
}

/// GCP API error response wrapper
///
/// GCP REST API returns errors in a standard format with an `error` field
/// containing error details.
///
/// API Reference: https://cloud.google.com/apis/design/errors
#[derive(Debug, Deserialize)]
pub struct GcpErrorResponse {
    /// Error details
    pub error: GcpError,
}

/// Detailed error information from GCP API
#[derive(Debug, Deserialize)]
pub struct GcpError {
    /// HTTP status code (e.g., 404, 403, 500)
    #[serde(default)]
    pub code: u16,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
    /// Error status string (e.g., "NOT_FOUND", "PERMISSION_DENIED")
    #[serde(default)]
    pub status: String,
}

/// OAuth2 access token response from GCP metadata server
///
/// Endpoint: `http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token`
///
/// API Reference: https://cloud.google.com/compute/docs/metadata/querying-metadata
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    /// OAuth2 access token for authenticating with GCP APIs
    pub access_token: String,
    /// Token expiration time in seconds
    #[serde(default)]
    pub expires_in: u64,
}
