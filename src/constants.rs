//! # Constants
//!
//! Shared constants used throughout the library.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see [`crate::config`]).

/// Version used when the caller does not name one
pub const DEFAULT_VERSION: &str = "latest";

/// Default GCP Secret Manager REST endpoint
pub const DEFAULT_ENDPOINT: &str = "https://secretmanager.googleapis.com";

/// Default metadata server host (Workload Identity / GCE)
pub const DEFAULT_METADATA_HOST: &str = "metadata.google.internal";

/// Default per-request timeout on the HTTP client (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Refresh cached access tokens this long before they expire (seconds)
pub const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

/// Default log filter when `SMC_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "secret_manager_ffi=warn";

/// Error message used when the remote service reports an empty one
pub const DEFAULT_ERROR_MESSAGE: &str = "access failed";

/// Error message for every argument validation failure at the C boundary
pub const INVALID_ARGUMENTS_MESSAGE: &str = "invalid arguments";

/// Error message used when a payload buffer cannot be allocated
pub const ALLOC_FAILED_MESSAGE: &str = "alloc failed";

// Environment variable names

pub const ENV_ENDPOINT: &str = "SMC_ENDPOINT";
pub const ENV_ACCESS_TOKEN: &str = "SMC_ACCESS_TOKEN";
pub const ENV_METADATA_HOST: &str = "GCE_METADATA_HOST";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "SMC_REQUEST_TIMEOUT_SECS";
pub const ENV_LOG: &str = "SMC_LOG";
