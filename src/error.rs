//! # Error Types
//!
//! Typed failures produced inside the library. Every exported C function
//! converts a [`ClientError`] into a [`Status`] plus backend code at the
//! boundary; nothing below the `ffi` module knows about result envelopes.

use thiserror::Error;

use crate::constants::INVALID_ARGUMENTS_MESSAGE;
use crate::resource_name::ResourceNameError;

/// Status codes reported across the C boundary
///
/// The discriminants are part of the ABI and must not change.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Ok = 0,
    ArgumentError = 1,
    TransportError = 2,
    RemoteError = 3,
    SerializationError = 4,
    EncodingError = 5,
    AllocationError = 6,
}

impl Status {
    /// Lower-case label used for metrics and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::ArgumentError => "argument_error",
            Status::TransportError => "transport_error",
            Status::RemoteError => "remote_error",
            Status::SerializationError => "serialization_error",
            Status::EncodingError => "encoding_error",
            Status::AllocationError => "allocation_error",
        }
    }
}

/// Errors that can occur while serving a request
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller supplied empty, missing or malformed identifiers
    #[error("invalid arguments: {0}")]
    InvalidArgument(String),

    /// The request never produced a response from the remote service
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote service answered with an error status
    #[error("remote error (code {code}): {message}")]
    Remote { code: i32, message: String },

    /// A response or record could not be (de)serialized
    #[error("serialization error: {0}")]
    Serialization(String),

    /// A payload was not in the expected encoding
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Local memory or resource exhaustion
    #[error("allocation error: {0}")]
    Allocation(String),
}

impl ClientError {
    /// Status reported for this error at the C boundary
    pub fn status(&self) -> Status {
        match self {
            ClientError::InvalidArgument(_) => Status::ArgumentError,
            ClientError::Transport(_) => Status::TransportError,
            ClientError::Remote { .. } => Status::RemoteError,
            ClientError::Serialization(_) => Status::SerializationError,
            ClientError::Encoding(_) => Status::EncodingError,
            ClientError::Allocation(_) => Status::AllocationError,
        }
    }

    /// Raw status code from the remote service, zero when none applies
    pub fn backend_code(&self) -> i32 {
        match self {
            ClientError::Remote { code, .. } => *code,
            _ => 0,
        }
    }

    /// Message handed to the caller
    ///
    /// Argument failures always report the same fixed text; the detail is
    /// only logged.
    pub fn caller_message(&self) -> &str {
        match self {
            ClientError::InvalidArgument(_) => INVALID_ARGUMENTS_MESSAGE,
            ClientError::Remote { message, .. } => message,
            ClientError::Transport(message)
            | ClientError::Serialization(message)
            | ClientError::Encoding(message)
            | ClientError::Allocation(message) => message,
        }
    }
}

impl From<ResourceNameError> for ClientError {
    fn from(err: ResourceNameError) -> Self {
        ClientError::InvalidArgument(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Serialization(err.to_string())
    }
}
