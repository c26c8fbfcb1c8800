//! # Secret Version Metadata
//!
//! The immutable version record returned by `GetSecretVersion` and its
//! flat JSON rendering handed to C callers.

use serde::Serialize;

use crate::error::ClientError;

/// A point in time as reported by the backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self {
        Self { seconds, nanos }
    }
}

/// Lifecycle state of a secret version, numbered as the backend numbers it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionState {
    Unspecified = 0,
    Enabled = 1,
    Disabled = 2,
    Destroyed = 3,
}

impl VersionState {
    /// Map the REST enum name to the backend state
    ///
    /// Unknown names map to `Unspecified`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "ENABLED" => VersionState::Enabled,
            "DISABLED" => VersionState::Disabled,
            "DESTROYED" => VersionState::Destroyed,
            _ => VersionState::Unspecified,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Metadata for one secret version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretVersionMetadata {
    pub name: String,
    /// Backend enum value, kept numeric so unknown states pass through
    pub state: i32,
    pub create_time: Timestamp,
    /// Absent while the version has never been destroyed
    pub destroy_time: Option<Timestamp>,
    pub etag: String,
}

/// Wire shape of the rendered record; field order is the output order
#[derive(Serialize)]
struct MetadataRecord<'a> {
    name: &'a str,
    state: i32,
    create_time_seconds: i64,
    create_time_nanos: i32,
    destroy_time_seconds: i64,
    destroy_time_nanos: i32,
    etag: &'a str,
}

impl SecretVersionMetadata {
    /// Render the record as compact JSON
    ///
    /// Output depends only on the record, so equal records always render
    /// to byte-identical strings.
    ///
    /// # Errors
    /// Returns a serialization error if rendering fails
    pub fn to_json(&self) -> Result<String, ClientError> {
        let destroy_time = self.destroy_time.unwrap_or_default();
        let record = MetadataRecord {
            name: &self.name,
            state: self.state,
            create_time_seconds: self.create_time.seconds,
            create_time_nanos: self.create_time.nanos,
            destroy_time_seconds: destroy_time.seconds,
            destroy_time_nanos: destroy_time.nanos,
            etag: &self.etag,
        };
        Ok(serde_json::to_string(&record)?)
    }
}
