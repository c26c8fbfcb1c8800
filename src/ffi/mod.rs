//! # C ABI
//!
//! Exported `extern "C"` surface of the library.
//!
//! Every function here follows the same shape:
//! - raw pointer arguments are checked and converted to Rust types first
//! - the work runs inside [`run_exported`], which catches panics and records
//!   the outcome in the operation metrics
//! - the typed `Result` is flattened into a `#[repr(C)]` envelope last
//!
//! Pointers handed back to the caller are released with [`smc_free`].
//! See `include/secret_manager_ffi.h` for the C declarations.

use std::any::Any;
use std::ffi::{c_char, CStr};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Instant;

use tracing::{error, warn};

use crate::error::ClientError;
use crate::observability::metrics;
use crate::resource_name::ResourceName;

mod alloc;
mod client;
mod legacy;
mod result;
mod secrets;

pub use alloc::live_allocations;
pub use client::{into_handle, smc_create_client, smc_destroy_client, SmcClient};
pub use legacy::smc_get_secret;
pub use result::{SmcBytesResult, SmcClientResult, SmcStringResult};
pub use secrets::{
    smc_access_secret, smc_access_secret_by_name, smc_free, smc_get_secret_metadata,
    smc_get_secret_metadata_by_name, smc_make_resource_name, smc_metrics_text,
};

use result::Outcome;

/// Run the body of an exported function
///
/// A panic never crosses the boundary; it is logged and turned into the
/// envelope's panic outcome. The final status is recorded under `operation`.
pub(crate) fn run_exported<R, F>(operation: &'static str, body: F) -> R
where
    R: Outcome,
    F: FnOnce() -> R,
{
    let start = Instant::now();
    let outcome = match catch_unwind(AssertUnwindSafe(body)) {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!("{} panicked: {}", operation, message);
            R::from_panic(&format!("internal error: {message}"))
        }
    };
    metrics::record_operation(operation, outcome.status(), start.elapsed().as_secs_f64());
    outcome
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

/// Borrow an optional C string; null reads as an empty string
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for `'a`.
pub(crate) unsafe fn optional_str<'a>(
    ptr: *const c_char,
    field: &str,
) -> Result<&'a str, ClientError> {
    if ptr.is_null() {
        return Ok("");
    }
    // SAFETY: non-null and NUL-terminated per the caller's contract
    let raw = unsafe { CStr::from_ptr(ptr) };
    raw.to_str().map_err(|e| {
        warn!("{} is not valid UTF-8: {}", field, e);
        ClientError::InvalidArgument(format!("{field} is not valid UTF-8: {e}"))
    })
}

/// Resource name from three C strings, any of which may be null
///
/// # Safety
/// Each pointer must be null or a valid NUL-terminated string.
pub(crate) unsafe fn name_from_parts(
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
) -> Result<ResourceName, ClientError> {
    // SAFETY: forwarded caller contract
    let (project_id, secret_id, version) = unsafe {
        (
            optional_str(project_id, "project_id")?,
            optional_str(secret_id, "secret_id")?,
            optional_str(version, "version")?,
        )
    };
    Ok(ResourceName::new(project_id, secret_id, Some(version))?)
}
