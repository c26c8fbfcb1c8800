//! # Secret Client
//!
//! A synchronous client around one [`SecretService`].
//!
//! Every call blocks the calling thread until the remote request completes or
//! fails. The client owns a current-thread tokio runtime that exists only to
//! drive the service's futures; nothing runs in the background between calls.
//!
//! A `SecretClient` is `Send` but is meant to be used by one caller at a time.
//! Share it across threads only behind external mutual exclusion.

use tokio::runtime::Runtime;
use tracing::{debug, info_span};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::metadata::SecretVersionMetadata;
use crate::provider::gcp::SecretManagerRest;
use crate::provider::{SecretBytes, SecretService};
use crate::resource_name::{validate_full_name, ResourceName};

/// Blocking handle to one secret backend
pub struct SecretClient {
    // Dropped before the runtime that drives its connections
    service: Box<dyn SecretService>,
    runtime: Runtime,
}

impl std::fmt::Debug for SecretClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretClient").finish_non_exhaustive()
    }
}

impl SecretClient {
    /// Connect to GCP Secret Manager using `config`
    ///
    /// # Errors
    /// Returns an error if the runtime or HTTP client cannot be created
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        install_crypto_provider();
        let service = SecretManagerRest::new(config)
            .map_err(|e| ClientError::Allocation(format!("{e:#}")))?;
        Self::with_service(service)
    }

    /// Wrap an existing service implementation
    ///
    /// # Errors
    /// Returns an error if the runtime cannot be created
    pub fn with_service<S>(service: S) -> Result<Self, ClientError>
    where
        S: SecretService + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ClientError::Allocation(format!("Failed to create runtime: {e}")))?;

        Ok(Self {
            service: Box::new(service),
            runtime,
        })
    }

    /// Fetch the payload of the version named by parts
    ///
    /// # Errors
    /// Returns the remote or transport failure
    pub fn access_secret(&self, name: &ResourceName) -> Result<SecretBytes, ClientError> {
        debug!(
            "Accessing secret {} in project {} at version {}",
            name.secret_id(),
            name.project_id(),
            name.version()
        );
        self.access(name.as_str())
    }

    /// Fetch the payload of a fully-qualified version name
    ///
    /// # Errors
    /// Returns an argument error for an empty name, otherwise the remote failure
    pub fn access_secret_by_name(&self, name: &str) -> Result<SecretBytes, ClientError> {
        self.access(validate_full_name(name)?)
    }

    /// Fetch the metadata of the version named by parts
    ///
    /// # Errors
    /// Returns the remote or transport failure
    pub fn secret_metadata(&self, name: &ResourceName) -> Result<SecretVersionMetadata, ClientError> {
        debug!(
            "Fetching metadata of secret {} in project {} at version {}",
            name.secret_id(),
            name.project_id(),
            name.version()
        );
        self.metadata(name.as_str())
    }

    /// Fetch the metadata of a fully-qualified version name
    ///
    /// # Errors
    /// Returns an argument error for an empty name, otherwise the remote failure
    pub fn secret_metadata_by_name(&self, name: &str) -> Result<SecretVersionMetadata, ClientError> {
        self.metadata(validate_full_name(name)?)
    }

    fn access(&self, name: &str) -> Result<SecretBytes, ClientError> {
        let _guard = info_span!("secret.access", secret.name = name).entered();
        let payload = self.runtime.block_on(self.service.access_secret_version(name))?;
        debug!("Accessed {} ({} bytes)", name, payload.len());
        Ok(payload)
    }

    fn metadata(&self, name: &str) -> Result<SecretVersionMetadata, ClientError> {
        let _guard = info_span!("secret.metadata", secret.name = name).entered();
        let metadata = self.runtime.block_on(self.service.get_secret_version(name))?;
        debug!("Fetched metadata for {} (state {})", name, metadata.state);
        Ok(metadata)
    }
}

/// Install ring as the process-wide rustls provider if none is set yet
fn install_crypto_provider() {
    if rustls::crypto::CryptoProvider::get_default().is_none() {
        // Losing a race with another installer is fine; one provider wins
        let _ = rustls::crypto::ring::default_provider().install_default();
    }
}
