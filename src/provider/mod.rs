//! # Provider Modules
//!
//! The remote secret service capability and its implementations.
//!
//! Every backend implements [`SecretService`]. The C boundary only ever talks
//! to a `Box<dyn SecretService>`, so tests can substitute an in-memory fake
//! for the GCP REST client.

use async_trait::async_trait;
use zeroize::Zeroizing;

use crate::error::ClientError;
use crate::metadata::SecretVersionMetadata;

/// Raw secret payload, wiped from memory when dropped
pub type SecretBytes = Zeroizing<Vec<u8>>;

/// Read access to a remote secret manager
#[async_trait]
pub trait SecretService: Send + Sync {
    /// Fetch the payload of a secret version
    ///
    /// `name` is a fully-qualified `projects/*/secrets/*/versions/*` name.
    async fn access_secret_version(&self, name: &str) -> Result<SecretBytes, ClientError>;

    /// Fetch the metadata of a secret version without its payload
    async fn get_secret_version(&self, name: &str) -> Result<SecretVersionMetadata, ClientError>;
}

// Common utilities shared across providers
pub mod common;

// Provider implementations
pub mod gcp;
