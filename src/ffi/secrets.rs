//! Secret access, metadata and naming entry points.

use std::ffi::{c_char, c_void};

use super::alloc::release;
use super::client::SmcClient;
use super::result::{SmcBytesResult, SmcStringResult};
use super::{name_from_parts, optional_str, run_exported};
use crate::client::SecretClient;
use crate::error::ClientError;
use crate::observability::metrics;

/// Borrow the client behind a handle
///
/// # Safety
/// `client` must be null or a live handle from this library.
unsafe fn client_ref<'a>(client: *const SmcClient) -> Result<&'a SecretClient, ClientError> {
    // SAFETY: per the contract a non-null handle points to a live `SmcClient`
    unsafe { client.as_ref() }
        .map(|handle| &handle.inner)
        .ok_or_else(|| ClientError::InvalidArgument("client handle is null".to_string()))
}

/// Fetch a secret payload by project, secret and optional version
///
/// A null or empty `version` means `latest`.
///
/// # Safety
/// `client` must be null or a live handle. Each string must be null or a
/// valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn smc_access_secret(
    client: *const SmcClient,
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
) -> SmcBytesResult {
    run_exported("access_secret", || {
        // SAFETY: forwarded caller contract
        let result = unsafe {
            client_ref(client).and_then(|client| {
                let name = name_from_parts(project_id, secret_id, version)?;
                client.access_secret(&name)
            })
        };
        SmcBytesResult::from(result)
    })
}

/// Fetch a secret payload by fully-qualified version name
///
/// # Safety
/// `client` must be null or a live handle. `resource_name` must be null or a
/// valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn smc_access_secret_by_name(
    client: *const SmcClient,
    resource_name: *const c_char,
) -> SmcBytesResult {
    run_exported("access_secret_by_name", || {
        // SAFETY: forwarded caller contract
        let result = unsafe {
            client_ref(client).and_then(|client| {
                let name = optional_str(resource_name, "resource_name")?;
                client.access_secret_by_name(name)
            })
        };
        SmcBytesResult::from(result)
    })
}

/// Fetch version metadata as a JSON record, by parts
///
/// # Safety
/// Same contract as [`smc_access_secret`].
#[no_mangle]
pub unsafe extern "C" fn smc_get_secret_metadata(
    client: *const SmcClient,
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
) -> SmcStringResult {
    run_exported("get_secret_metadata", || {
        // SAFETY: forwarded caller contract
        let result = unsafe {
            client_ref(client).and_then(|client| {
                let name = name_from_parts(project_id, secret_id, version)?;
                client.secret_metadata(&name)?.to_json()
            })
        };
        SmcStringResult::from(result)
    })
}

/// Fetch version metadata as a JSON record, by fully-qualified name
///
/// # Safety
/// Same contract as [`smc_access_secret_by_name`].
#[no_mangle]
pub unsafe extern "C" fn smc_get_secret_metadata_by_name(
    client: *const SmcClient,
    resource_name: *const c_char,
) -> SmcStringResult {
    run_exported("get_secret_metadata_by_name", || {
        // SAFETY: forwarded caller contract
        let result = unsafe {
            client_ref(client).and_then(|client| {
                let name = optional_str(resource_name, "resource_name")?;
                client.secret_metadata_by_name(name)?.to_json()
            })
        };
        SmcStringResult::from(result)
    })
}

/// Render `projects/{p}/secrets/{s}/versions/{v}` without a client
///
/// # Safety
/// Each string must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn smc_make_resource_name(
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
) -> SmcStringResult {
    run_exported("make_resource_name", || {
        // SAFETY: forwarded caller contract
        let result = unsafe { name_from_parts(project_id, secret_id, version) };
        SmcStringResult::from(result.map(|name| name.to_string()))
    })
}

/// Prometheus text exposition of this library's metrics
#[no_mangle]
pub extern "C" fn smc_metrics_text() -> SmcStringResult {
    run_exported("metrics_text", || SmcStringResult::from(metrics::gather_text()))
}

/// Release any payload, value or error pointer returned by this library
///
/// Null is a no-op. Each pointer must be released exactly once.
///
/// # Safety
/// `ptr` must be null or a pointer returned by this library that has not
/// been released yet.
#[no_mangle]
pub unsafe extern "C" fn smc_free(ptr: *mut c_void) {
    // SAFETY: forwarded caller contract
    unsafe { release(ptr) };
}
