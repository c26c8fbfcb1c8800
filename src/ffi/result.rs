//! Result envelopes returned across the C boundary.
//!
//! All three shapes share `{status, backend_code, error}`. On success the
//! payload pointer is non-null and `error` is null; on failure the payload
//! pointer is null and `error` usually carries a message. Every non-null
//! pointer is owned by the caller and must be passed to `smc_free` once.
//!
//! Internally operations return `Result<_, ClientError>`; the `From`
//! conversions here are the only place those results are flattened and
//! ownership of the copied bytes moves to the caller.

use std::ffi::{c_char, c_int};
use std::ptr;

use super::alloc::{alloc_bytes, alloc_c_string};
use super::client::SmcClient;
use crate::constants::{ALLOC_FAILED_MESSAGE, DEFAULT_ERROR_MESSAGE};
use crate::error::{ClientError, Status};
use crate::provider::SecretBytes;

/// Outcome of `smc_create_client`; `client` is non-null iff `status == Ok`
#[repr(C)]
#[derive(Debug)]
pub struct SmcClientResult {
    pub status: Status,
    pub backend_code: c_int,
    pub error: *mut c_char,
    pub client: *mut SmcClient,
}

/// Binary payload; `data` is non-null iff `status == Ok`
#[repr(C)]
#[derive(Debug)]
pub struct SmcBytesResult {
    pub status: Status,
    pub backend_code: c_int,
    pub error: *mut c_char,
    pub data: *mut u8,
    pub length: usize,
}

/// NUL-terminated text payload; `value` is non-null iff `status == Ok`
#[repr(C)]
#[derive(Debug)]
pub struct SmcStringResult {
    pub status: Status,
    pub backend_code: c_int,
    pub error: *mut c_char,
    pub value: *mut c_char,
}

/// Status, backend code and error pointer shared by every failed envelope
struct ErrorFields {
    status: Status,
    backend_code: c_int,
    error: *mut c_char,
}

impl ErrorFields {
    /// Copy `message` (or the default) into a caller-owned string
    ///
    /// If that copy fails the status becomes `AllocationError` and the
    /// failure detail is lost.
    fn new(status: Status, backend_code: c_int, message: &str) -> Self {
        let message = if message.is_empty() {
            DEFAULT_ERROR_MESSAGE
        } else {
            message
        };
        let error = alloc_c_string(message);
        if error.is_null() {
            return Self::allocation_failed(ptr::null_mut());
        }
        Self {
            status,
            backend_code,
            error,
        }
    }

    fn allocation_failed(error: *mut c_char) -> Self {
        Self {
            status: Status::AllocationError,
            backend_code: 0,
            error,
        }
    }

    /// Payload allocation failed: report it with a best-effort message
    fn payload_allocation_failed() -> Self {
        Self::allocation_failed(alloc_c_string(ALLOC_FAILED_MESSAGE))
    }

    fn from_error(err: &ClientError) -> Self {
        Self::new(err.status(), err.backend_code(), err.caller_message())
    }
}

/// Status accessor shared by the envelopes and the legacy return code
pub(crate) trait Outcome {
    fn status(&self) -> Status;

    /// Envelope reported when the operation panicked
    fn from_panic(message: &str) -> Self;
}

impl SmcClientResult {
    pub(crate) fn ok(client: *mut SmcClient) -> Self {
        Self {
            status: Status::Ok,
            backend_code: 0,
            error: ptr::null_mut(),
            client,
        }
    }

    pub(crate) fn err(status: Status, backend_code: c_int, message: &str) -> Self {
        let fields = ErrorFields::new(status, backend_code, message);
        Self {
            status: fields.status,
            backend_code: fields.backend_code,
            error: fields.error,
            client: ptr::null_mut(),
        }
    }
}

impl Outcome for SmcClientResult {
    fn status(&self) -> Status {
        self.status
    }

    fn from_panic(message: &str) -> Self {
        Self::err(Status::AllocationError, 0, message)
    }
}

impl SmcBytesResult {
    /// Copy `data` into a caller-owned buffer
    pub(crate) fn ok(data: &[u8]) -> Self {
        let buffer = alloc_bytes(data);
        if buffer.is_null() {
            return Self::from_fields(ErrorFields::payload_allocation_failed());
        }
        Self {
            status: Status::Ok,
            backend_code: 0,
            error: ptr::null_mut(),
            data: buffer,
            length: data.len(),
        }
    }

    pub(crate) fn err(status: Status, backend_code: c_int, message: &str) -> Self {
        Self::from_fields(ErrorFields::new(status, backend_code, message))
    }

    fn from_fields(fields: ErrorFields) -> Self {
        Self {
            status: fields.status,
            backend_code: fields.backend_code,
            error: fields.error,
            data: ptr::null_mut(),
            length: 0,
        }
    }
}

impl Outcome for SmcBytesResult {
    fn status(&self) -> Status {
        self.status
    }

    fn from_panic(message: &str) -> Self {
        Self::err(Status::TransportError, 0, message)
    }
}

impl From<Result<SecretBytes, ClientError>> for SmcBytesResult {
    fn from(result: Result<SecretBytes, ClientError>) -> Self {
        match result {
            Ok(payload) => Self::ok(&payload),
            Err(e) => Self::from_fields(ErrorFields::from_error(&e)),
        }
    }
}

impl SmcStringResult {
    /// Copy `value` into a caller-owned NUL-terminated string
    pub(crate) fn ok(value: &str) -> Self {
        let buffer = alloc_c_string(value);
        if buffer.is_null() {
            return Self::from_fields(ErrorFields::payload_allocation_failed());
        }
        Self {
            status: Status::Ok,
            backend_code: 0,
            error: ptr::null_mut(),
            value: buffer,
        }
    }

    pub(crate) fn err(status: Status, backend_code: c_int, message: &str) -> Self {
        Self::from_fields(ErrorFields::new(status, backend_code, message))
    }

    fn from_fields(fields: ErrorFields) -> Self {
        Self {
            status: fields.status,
            backend_code: fields.backend_code,
            error: fields.error,
            value: ptr::null_mut(),
        }
    }
}

impl Outcome for SmcStringResult {
    fn status(&self) -> Status {
        self.status
    }

    fn from_panic(message: &str) -> Self {
        Self::err(Status::TransportError, 0, message)
    }
}

impl From<Result<String, ClientError>> for SmcStringResult {
    fn from(result: Result<String, ClientError>) -> Self {
        match result {
            Ok(value) => Self::ok(&value),
            Err(e) => Self::from_fields(ErrorFields::from_error(&e)),
        }
    }
}

impl Outcome for Status {
    fn status(&self) -> Status {
        *self
    }

    fn from_panic(_message: &str) -> Self {
        Status::TransportError
    }
}
