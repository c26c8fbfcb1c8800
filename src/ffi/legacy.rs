//! One-shot access with output parameters.
//!
//! Predates the result envelopes. Each call opens its own connection,
//! performs one access and drops the connection before returning; callers
//! that make more than one request should hold a client handle instead.

use std::ffi::c_char;
use std::ptr;

use tracing::{debug, warn};

use super::alloc::{alloc_bytes, alloc_c_string};
use super::{name_from_parts, run_exported};
use crate::client::SecretClient;
use crate::config::ClientConfig;
use crate::constants::{ALLOC_FAILED_MESSAGE, DEFAULT_ERROR_MESSAGE, INVALID_ARGUMENTS_MESSAGE};
use crate::error::{ClientError, Status};
use crate::observability::logging;

/// Fetch one secret payload through a throwaway connection
///
/// On success `*out_buf`/`*out_len` receive a caller-owned copy of the
/// payload (non-null even when empty). On failure `*out_err` may receive a
/// caller-owned message. Outputs are reset on entry; release them with
/// `smc_free`.
///
/// # Safety
/// String arguments must be null or valid NUL-terminated strings. Output
/// pointers must be null or valid for a write.
#[no_mangle]
pub unsafe extern "C" fn smc_get_secret(
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> Status {
    run_exported("get_secret", || {
        // SAFETY: forwarded caller contract
        unsafe {
            get_secret_with(
                || {
                    logging::init_logging();
                    SecretClient::connect(&ClientConfig::from_env())
                },
                project_id,
                secret_id,
                version,
                out_buf,
                out_len,
                out_err,
            )
        }
    })
}

/// Body of [`smc_get_secret`] with the connection step supplied by the caller
///
/// # Safety
/// Same contract as [`smc_get_secret`].
pub(crate) unsafe fn get_secret_with<C>(
    connect: C,
    project_id: *const c_char,
    secret_id: *const c_char,
    version: *const c_char,
    out_buf: *mut *mut u8,
    out_len: *mut usize,
    out_err: *mut *mut c_char,
) -> Status
where
    C: FnOnce() -> Result<SecretClient, ClientError>,
{
    // SAFETY: each output pointer is null or writable per the contract
    unsafe {
        if let Some(buf) = out_buf.as_mut() {
            *buf = ptr::null_mut();
        }
        if let Some(len) = out_len.as_mut() {
            *len = 0;
        }
        if let Some(err) = out_err.as_mut() {
            *err = ptr::null_mut();
        }
    }

    // SAFETY: forwarded caller contract
    let name = unsafe { name_from_parts(project_id, secret_id, version) };
    let name = match name {
        Ok(name) if !out_buf.is_null() && !out_len.is_null() && !out_err.is_null() => name,
        Ok(_) => {
            warn!("get_secret called with a null output pointer");
            // SAFETY: out_err is null or writable
            return unsafe { report(out_err, Status::ArgumentError, INVALID_ARGUMENTS_MESSAGE) };
        }
        Err(e) => {
            warn!("get_secret rejected arguments: {}", e);
            // SAFETY: out_err is null or writable
            return unsafe { report(out_err, e.status(), e.caller_message()) };
        }
    };

    let outcome = connect().and_then(|client| {
        debug!("One-shot connection opened for {}", name);
        client.access_secret(&name)
    });

    match outcome {
        Ok(payload) => {
            let buffer = alloc_bytes(&payload);
            if buffer.is_null() {
                // SAFETY: out_err is non-null and writable here
                return unsafe { report(out_err, Status::AllocationError, ALLOC_FAILED_MESSAGE) };
            }
            // SAFETY: both outputs were checked non-null above
            unsafe {
                *out_buf = buffer;
                *out_len = payload.len();
            }
            Status::Ok
        }
        Err(e) => {
            warn!("get_secret failed for {}: {}", name, e);
            // SAFETY: out_err is non-null and writable here
            unsafe { report(out_err, e.status(), e.caller_message()) }
        }
    }
}

/// Store `message` in `*out_err` (if writable) and return `status`
///
/// A failed copy turns the status into `AllocationError`.
///
/// # Safety
/// `out_err` must be null or valid for a write.
unsafe fn report(out_err: *mut *mut c_char, status: Status, message: &str) -> Status {
    // SAFETY: per the contract
    let Some(slot) = (unsafe { out_err.as_mut() }) else {
        return status;
    };
    let message = if message.is_empty() {
        DEFAULT_ERROR_MESSAGE
    } else {
        message
    };
    let copy = alloc_c_string(message);
    if copy.is_null() {
        return Status::AllocationError;
    }
    *slot = copy;
    status
}
