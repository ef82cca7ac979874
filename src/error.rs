//! Error types for cibuild operations.
//!
//! This module defines [`BuildError`], the error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - `Environment` means the CI snapshot cannot yield a required value
//!   (unknown platform, no ref to derive a version from)
//! - `Validation` is reserved for [`check_version`] so callers can tell a
//!   malformed environment apart from a version/tag mismatch
//! - Use `anyhow::Error` (via `BuildError::Other`) for unexpected errors
//!
//! [`check_version`]: crate::environ::BuildEnviron::check_version

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cibuild operations.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The environment cannot produce a required derived value.
    #[error("Build environment error: {message}")]
    Environment { message: String },

    /// The declared version and the ref do not follow release conventions.
    #[error("Version check failed: {message}")]
    Validation { message: String },

    /// Failed to parse the release configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Zip archive writer failure.
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuildError {
    pub(crate) fn environment(message: impl Into<String>) -> Self {
        Self::Environment {
            message: message.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Whether this error came from the version/tag check.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

/// Result type alias for cibuild operations.
pub type Result<T> = std::result::Result<T, BuildError>;
