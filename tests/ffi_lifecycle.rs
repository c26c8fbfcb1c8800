//! End-to-end tests of the C ABI against an in-memory secret store
//!
//! Handles are built with `ffi::into_handle` around a fake service, then
//! driven only through the exported `smc_*` functions.

mod common;

use common::{FakeSecretStore, FAILED_PRECONDITION, NOT_FOUND};
use secret_manager_ffi::ffi::{
    into_handle, smc_access_secret, smc_access_secret_by_name, smc_destroy_client, smc_free,
    smc_get_secret_metadata, smc_get_secret_metadata_by_name, smc_make_resource_name,
    smc_metrics_text, SmcBytesResult, SmcClient, SmcStringResult,
};
use async_trait::async_trait;
use secret_manager_ffi::error::ClientError;
use secret_manager_ffi::metadata::SecretVersionMetadata;
use secret_manager_ffi::provider::{SecretBytes, SecretService};
use secret_manager_ffi::{SecretClient, Status};
use std::ffi::{c_char, CStr};
use std::ptr;

/// Owns one handle for the duration of a test
struct Handle {
    raw: *mut SmcClient,
}

impl Handle {
    fn new(store: &FakeSecretStore) -> Self {
        let client = SecretClient::with_service(store.clone()).expect("Failed to create client");
        Self {
            raw: into_handle(client),
        }
    }
}

impl Drop for Handle {
    fn drop(&mut self) {
        // SAFETY: created by into_handle and destroyed once here
        unsafe { smc_destroy_client(self.raw) };
    }
}

fn c_str(ptr: *const c_char) -> String {
    assert!(!ptr.is_null());
    // SAFETY: library strings are NUL-terminated
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
}

/// Copy a bytes result out and release everything it owns
fn take_bytes(result: SmcBytesResult) -> Result<Vec<u8>, (Status, i32, String)> {
    if result.status == Status::Ok {
        assert!(!result.data.is_null());
        assert!(result.error.is_null());
        // SAFETY: data holds `length` bytes
        let bytes = unsafe { std::slice::from_raw_parts(result.data, result.length) }.to_vec();
        // SAFETY: released once
        unsafe { smc_free(result.data.cast()) };
        Ok(bytes)
    } else {
        assert!(result.data.is_null());
        assert_eq!(result.length, 0);
        let message = c_str(result.error);
        // SAFETY: released once
        unsafe { smc_free(result.error.cast()) };
        Err((result.status, result.backend_code, message))
    }
}

fn take_string(result: SmcStringResult) -> Result<String, (Status, i32, String)> {
    if result.status == Status::Ok {
        assert!(result.error.is_null());
        let value = c_str(result.value);
        // SAFETY: released once
        unsafe { smc_free(result.value.cast()) };
        Ok(value)
    } else {
        assert!(result.value.is_null());
        let message = c_str(result.error);
        // SAFETY: released once
        unsafe { smc_free(result.error.cast()) };
        Err((result.status, result.backend_code, message))
    }
}

#[test]
fn test_access_latest_returns_stored_payload() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"old", 100);
    store.add_version("p", "s", b"current\0binary\xff", 200);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    assert_eq!(take_bytes(result).unwrap(), b"current\0binary\xff");

    // SAFETY: as above
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), c"1".as_ptr()) };
    assert_eq!(take_bytes(result).unwrap(), b"old");
}

#[test]
fn test_empty_version_means_latest() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"v1", 100);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), c"".as_ptr()) };
    assert_eq!(take_bytes(result).unwrap(), b"v1");
}

#[test]
fn test_access_by_name() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"by-name", 100);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static string
    let result = unsafe {
        smc_access_secret_by_name(handle.raw, c"projects/p/secrets/s/versions/1".as_ptr())
    };
    assert_eq!(take_bytes(result).unwrap(), b"by-name");
}

#[test]
fn test_empty_payload_is_non_null() {
    let store = FakeSecretStore::new();
    store.add_version("p", "empty", b"", 100);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"empty".as_ptr(), ptr::null()) };
    assert_eq!(result.status, Status::Ok);
    assert!(!result.data.is_null());
    assert_eq!(take_bytes(result).unwrap(), b"");
}

#[test]
fn test_remote_failure_carries_backend_code_and_message() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"secret", 100);
    store.fail_with(7, "Permission 'secretmanager.versions.access' denied");
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    let (status, code, message) = take_bytes(result).unwrap_err();
    assert_eq!(status, Status::RemoteError);
    assert_eq!(code, 7);
    assert_eq!(message, "Permission 'secretmanager.versions.access' denied");

    store.clear_failure();
    // SAFETY: as above
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    assert_eq!(take_bytes(result).unwrap(), b"secret");
}

#[test]
fn test_remote_failure_without_message_uses_default() {
    let store = FakeSecretStore::new();
    store.fail_with(14, "");
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    let (status, code, message) = take_bytes(result).unwrap_err();
    assert_eq!(status, Status::RemoteError);
    assert_eq!(code, 14);
    assert_eq!(message, "access failed");
}

#[test]
fn test_missing_and_destroyed_versions() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"one", 100);
    store.add_version("p", "s", b"two", 200);
    store.destroy_version("p", "s", "2", 300);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), c"2".as_ptr()) };
    let (status, code, _) = take_bytes(result).unwrap_err();
    assert_eq!(status, Status::RemoteError);
    assert_eq!(code, FAILED_PRECONDITION);

    // SAFETY: as above
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    assert_eq!(take_bytes(result).unwrap(), b"one");

    // SAFETY: as above
    let result = unsafe { smc_access_secret(handle.raw, c"p".as_ptr(), c"nope".as_ptr(), ptr::null()) };
    let (status, code, message) = take_bytes(result).unwrap_err();
    assert_eq!(status, Status::RemoteError);
    assert_eq!(code, NOT_FOUND);
    assert!(message.contains("projects/p/secrets/nope/versions/latest"));
}

#[test]
fn test_invalid_arguments_never_reach_the_service() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"secret", 100);
    let handle = Handle::new(&store);

    // SAFETY: live handle; nulls and 'static strings are allowed
    let results = unsafe {
        [
            smc_access_secret(handle.raw, c"".as_ptr(), c"s".as_ptr(), ptr::null()),
            smc_access_secret(handle.raw, c"p".as_ptr(), c"".as_ptr(), ptr::null()),
            smc_access_secret(handle.raw, ptr::null(), c"s".as_ptr(), ptr::null()),
            smc_access_secret_by_name(handle.raw, c"".as_ptr()),
            smc_access_secret_by_name(handle.raw, ptr::null()),
        ]
    };
    for result in results {
        let (status, code, message) = take_bytes(result).unwrap_err();
        assert_eq!(status, Status::ArgumentError);
        assert_eq!(code, 0);
        assert_eq!(message, "invalid arguments");
    }

    // SAFETY: live handle; nulls and 'static strings are allowed
    let metadata = unsafe {
        [
            smc_get_secret_metadata(handle.raw, c"".as_ptr(), c"s".as_ptr(), ptr::null()),
            smc_get_secret_metadata(handle.raw, c"p".as_ptr(), c"".as_ptr(), ptr::null()),
            smc_get_secret_metadata(handle.raw, c"p".as_ptr(), ptr::null(), c"1".as_ptr()),
            smc_get_secret_metadata_by_name(handle.raw, c"".as_ptr()),
            smc_get_secret_metadata_by_name(handle.raw, ptr::null()),
        ]
    };
    for result in metadata {
        let (status, code, message) = take_string(result).unwrap_err();
        assert_eq!(status, Status::ArgumentError);
        assert_eq!(code, 0);
        assert_eq!(message, "invalid arguments");
    }

    assert_eq!(store.request_count(), 0);
}

#[test]
fn test_null_handle_is_argument_error() {
    // SAFETY: null handle is rejected before use
    let result = unsafe { smc_access_secret(ptr::null(), c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    assert_eq!(take_bytes(result).unwrap_err().0, Status::ArgumentError);

    // SAFETY: as above
    let result = unsafe { smc_get_secret_metadata_by_name(ptr::null(), c"projects/p/secrets/s/versions/1".as_ptr()) };
    assert_eq!(take_string(result).unwrap_err().0, Status::ArgumentError);
}

#[test]
fn test_metadata_json() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"one", 100);
    store.add_version("p", "s", b"two", 200);
    store.destroy_version("p", "s", "2", 300);
    let handle = Handle::new(&store);

    // SAFETY: live handle and 'static strings
    let result = unsafe { smc_get_secret_metadata(handle.raw, c"p".as_ptr(), c"s".as_ptr(), c"1".as_ptr()) };
    assert_eq!(
        take_string(result).unwrap(),
        r#"{"name":"projects/p/secrets/s/versions/1","state":1,"create_time_seconds":100,"create_time_nanos":0,"destroy_time_seconds":0,"destroy_time_nanos":0,"etag":"\"etag-100\""}"#
    );

    // SAFETY: as above
    let result = unsafe {
        smc_get_secret_metadata_by_name(handle.raw, c"projects/p/secrets/s/versions/2".as_ptr())
    };
    let json: serde_json::Value = serde_json::from_str(&take_string(result).unwrap()).unwrap();
    assert_eq!(json["state"], 3);
    assert_eq!(json["destroy_time_seconds"], 300);
    assert_eq!(json["destroy_time_nanos"], 500);
}

#[test]
fn test_metadata_is_deterministic() {
    let store = FakeSecretStore::new();
    store.add_version("p", "s", b"one", 100);
    let handle = Handle::new(&store);

    let fetch = || {
        // SAFETY: live handle and 'static strings
        let result = unsafe { smc_get_secret_metadata(handle.raw, c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
        take_string(result).unwrap()
    };
    assert_eq!(fetch(), fetch());
}

#[test]
fn test_make_resource_name() {
    // SAFETY: 'static strings and null are allowed
    let latest = unsafe { smc_make_resource_name(c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    assert_eq!(take_string(latest).unwrap(), "projects/p/secrets/s/versions/latest");

    // SAFETY: as above
    let pinned = unsafe { smc_make_resource_name(c"p".as_ptr(), c"s".as_ptr(), c"3".as_ptr()) };
    assert_eq!(take_string(pinned).unwrap(), "projects/p/secrets/s/versions/3");

    // SAFETY: as above
    let again = unsafe { smc_make_resource_name(c"p".as_ptr(), c"s".as_ptr(), c"3".as_ptr()) };
    assert_eq!(take_string(again).unwrap(), "projects/p/secrets/s/versions/3");

    // SAFETY: as above
    let invalid = unsafe { smc_make_resource_name(c"p".as_ptr(), c"".as_ptr(), ptr::null()) };
    let (status, code, message) = take_string(invalid).unwrap_err();
    assert_eq!(status, Status::ArgumentError);
    assert_eq!(code, 0);
    assert_eq!(message, "invalid arguments");
}

#[test]
fn test_metrics_text_reports_operations() {
    // SAFETY: 'static strings
    let name = unsafe { smc_make_resource_name(c"p".as_ptr(), c"s".as_ptr(), ptr::null()) };
    take_string(name).unwrap();

    let text = take_string(smc_metrics_text()).unwrap();
    assert!(text.contains("smc_operations_total"));
    assert!(text.contains("make_resource_name"));
}

#[test]
fn test_destroy_null_is_noop() {
    // SAFETY: null is explicitly allowed
    unsafe {
        smc_destroy_client(ptr::null_mut());
        smc_free(ptr::null_mut());
    }
}

/// A destroyed handle must not be passed to any operation again
///
/// Doing so is undefined behavior, so this only checks that the handle is
/// released cleanly and the pointer is never touched afterwards.
#[test]
fn test_destroyed_handle_must_not_be_called() {
    let store = FakeSecretStore::new();
    let client = SecretClient::with_service(store.clone()).unwrap();
    let raw = into_handle(client);
    // SAFETY: live handle, destroyed once
    unsafe { smc_destroy_client(raw) };
    assert_eq!(store.request_count(), 0);
}

/// Service whose teardown panics
struct PanicsOnDrop;

#[async_trait]
impl SecretService for PanicsOnDrop {
    async fn access_secret_version(&self, _name: &str) -> Result<SecretBytes, ClientError> {
        Err(ClientError::Transport("unused".to_string()))
    }

    async fn get_secret_version(&self, _name: &str) -> Result<SecretVersionMetadata, ClientError> {
        Err(ClientError::Transport("unused".to_string()))
    }
}

impl Drop for PanicsOnDrop {
    fn drop(&mut self) {
        panic!("teardown failed");
    }
}

#[test]
fn test_destroy_contains_panic_during_drop() {
    let client = SecretClient::with_service(PanicsOnDrop).unwrap();
    let raw = into_handle(client);
    // SAFETY: live handle, destroyed once
    unsafe { smc_destroy_client(raw) };

    let text = take_string(smc_metrics_text()).unwrap();
    assert!(text.contains("destroy_client"));
}
