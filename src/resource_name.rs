//! # Resource Names
//!
//! Canonical secret version identifiers of the form
//! `projects/{project}/secrets/{secret}/versions/{version}`.
//!
//! Identifiers are concatenated as given. No escaping is applied; the
//! backend rejects anything that is not valid on the wire.

use std::fmt;
use thiserror::Error;

use crate::constants::DEFAULT_VERSION;

/// Errors that can occur while building a resource name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResourceNameError {
    #[error("project_id must not be empty")]
    EmptyProjectId,

    #[error("secret_id must not be empty")]
    EmptySecretId,

    #[error("resource name must not be empty")]
    EmptyName,
}

/// A fully-qualified secret version name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    project_id: String,
    secret_id: String,
    version: String,
    rendered: String,
}

impl ResourceName {
    /// Build a name from its parts
    ///
    /// An absent or empty `version` becomes `latest`.
    ///
    /// # Errors
    /// Returns an error if `project_id` or `secret_id` is empty
    pub fn new(
        project_id: &str,
        secret_id: &str,
        version: Option<&str>,
    ) -> Result<Self, ResourceNameError> {
        if project_id.is_empty() {
            return Err(ResourceNameError::EmptyProjectId);
        }
        if secret_id.is_empty() {
            return Err(ResourceNameError::EmptySecretId);
        }
        let version = version
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VERSION);

        Ok(Self {
            rendered: format!("projects/{project_id}/secrets/{secret_id}/versions/{version}"),
            project_id: project_id.to_string(),
            secret_id: secret_id.to_string(),
            version: version.to_string(),
        })
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn secret_id(&self) -> &str {
        &self.secret_id
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The rendered `projects/.../versions/...` string
    pub fn as_str(&self) -> &str {
        &self.rendered
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}

impl AsRef<str> for ResourceName {
    fn as_ref(&self) -> &str {
        &self.rendered
    }
}

/// Check a caller-supplied full name before it is sent to the backend
///
/// # Errors
/// Returns an error if `name` is empty
pub fn validate_full_name(name: &str) -> Result<&str, ResourceNameError> {
    if name.is_empty() {
        Err(ResourceNameError::EmptyName)
    } else {
        Ok(name)
    }
}
