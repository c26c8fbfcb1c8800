//! Common test utilities
//!
//! Provides rustls setup for the REST contract tests and an in-memory
//! [`SecretService`] for exercising the C ABI without a network.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use async_trait::async_trait;
use secret_manager_ffi::error::ClientError;
use secret_manager_ffi::metadata::{SecretVersionMetadata, Timestamp, VersionState};
use secret_manager_ffi::provider::{SecretBytes, SecretService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use zeroize::Zeroizing;

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Must run before any request that uses rustls.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        // Another test binary helper may have installed it already
        let _ = rustls::crypto::ring::default_provider().install_default();
    });
}

/// Canonical google.rpc codes used by the fake
pub const NOT_FOUND: i32 = 5;
pub const FAILED_PRECONDITION: i32 = 9;
pub const INVALID_ARGUMENT: i32 = 3;

#[derive(Debug, Clone)]
struct StoredVersion {
    payload: Vec<u8>,
    state: VersionState,
    create_time: Timestamp,
    destroy_time: Option<Timestamp>,
}

/// In-memory secret store with versioning support
///
/// Versions are numbered from 1 per secret, oldest first; `latest` resolves
/// to the newest version that is not destroyed. Clones share state, so a
/// test can keep one copy while the client owns another.
#[derive(Clone, Debug, Default)]
pub struct FakeSecretStore {
    secrets: Arc<Mutex<HashMap<String, Vec<StoredVersion>>>>,
    failure: Arc<Mutex<Option<(i32, String)>>>,
    requests: Arc<AtomicUsize>,
}

impl FakeSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a version and return its id
    pub fn add_version(&self, project: &str, secret: &str, payload: &[u8], create_seconds: i64) -> String {
        let mut secrets = self.secrets.lock().unwrap();
        let versions = secrets.entry(secret_key(project, secret)).or_default();
        versions.push(StoredVersion {
            payload: payload.to_vec(),
            state: VersionState::Enabled,
            create_time: Timestamp::new(create_seconds, 0),
            destroy_time: None,
        });
        versions.len().to_string()
    }

    /// Mark a version destroyed and drop its payload
    pub fn destroy_version(&self, project: &str, secret: &str, version: &str, at_seconds: i64) {
        let mut secrets = self.secrets.lock().unwrap();
        let versions = secrets.get_mut(&secret_key(project, secret)).unwrap();
        let index: usize = version.parse().unwrap();
        let stored = &mut versions[index - 1];
        stored.payload.clear();
        stored.state = VersionState::Destroyed;
        stored.destroy_time = Some(Timestamp::new(at_seconds, 500));
    }

    /// Fail every request with this backend code and message
    pub fn fail_with(&self, code: i32, message: &str) {
        *self.failure.lock().unwrap() = Some((code, message.to_string()));
    }

    pub fn clear_failure(&self) {
        *self.failure.lock().unwrap() = None;
    }

    /// Requests that reached the fake
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn lookup(&self, name: &str) -> Result<(String, StoredVersion), ClientError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some((code, message)) = self.failure.lock().unwrap().clone() {
            return Err(ClientError::Remote { code, message });
        }

        let (key, version) = parse_name(name)?;
        let secrets = self.secrets.lock().unwrap();
        let versions = secrets.get(&key).ok_or_else(|| not_found(name))?;
        let (number, stored) = if version == "latest" {
            versions
                .iter()
                .enumerate()
                .rev()
                .find(|(_, v)| v.state != VersionState::Destroyed)
                .ok_or_else(|| not_found(name))?
        } else {
            let index: usize = version.parse().map_err(|_| remote(INVALID_ARGUMENT, "bad version"))?;
            let stored = index
                .checked_sub(1)
                .and_then(|i| versions.get(i))
                .ok_or_else(|| not_found(name))?;
            (index - 1, stored)
        };
        Ok((format!("{key}/versions/{}", number + 1), stored.clone()))
    }
}

#[async_trait]
impl SecretService for FakeSecretStore {
    async fn access_secret_version(&self, name: &str) -> Result<SecretBytes, ClientError> {
        let (resolved, stored) = self.lookup(name)?;
        if stored.state == VersionState::Destroyed {
            return Err(remote(
                FAILED_PRECONDITION,
                &format!("{resolved} is in DESTROYED state."),
            ));
        }
        Ok(Zeroizing::new(stored.payload))
    }

    async fn get_secret_version(&self, name: &str) -> Result<SecretVersionMetadata, ClientError> {
        let (resolved, stored) = self.lookup(name)?;
        Ok(SecretVersionMetadata {
            name: resolved,
            state: stored.state.code(),
            create_time: stored.create_time,
            destroy_time: stored.destroy_time,
            etag: format!("\"etag-{}\"", stored.create_time.seconds),
        })
    }
}

fn secret_key(project: &str, secret: &str) -> String {
    format!("projects/{project}/secrets/{secret}")
}

/// Split `projects/p/secrets/s/versions/v` into the secret key and version
fn parse_name(name: &str) -> Result<(String, String), ClientError> {
    let parts: Vec<&str> = name.split('/').collect();
    match parts.as_slice() {
        ["projects", project, "secrets", secret, "versions", version]
            if !project.is_empty() && !secret.is_empty() && !version.is_empty() =>
        {
            Ok((secret_key(project, secret), (*version).to_string()))
        }
        _ => Err(remote(INVALID_ARGUMENT, &format!("Invalid resource name: {name}"))),
    }
}

fn remote(code: i32, message: &str) -> ClientError {
    ClientError::Remote {
        code,
        message: message.to_string(),
    }
}

fn not_found(name: &str) -> ClientError {
    remote(NOT_FOUND, &format!("Secret [{name}] not found or has no versions."))
}
