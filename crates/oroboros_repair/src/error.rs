//! # Repair Error Types
//!
//! Errors raised by the fallible config layer. Nothing above
//! [`ProfileConfigStore`](crate::config::ProfileConfigStore) ever sees them:
//! the store logs and falls back to the built-in ruleset.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing repair config.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepairError {
    /// The config file or its directory could not be read or written.
    #[error("i/o failure on {path}: {message}")]
    Io {
        /// File or directory involved.
        path: PathBuf,
        /// Underlying error text.
        message: String,
    },

    /// The config file exists but is not a valid profile document.
    #[error("failed to parse {path}: {message}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser error text.
        message: String,
    },

    /// The in-memory config could not be encoded.
    #[error("failed to serialize repair profiles: {0}")]
    Serialize(String),
}

impl RepairError {
    /// Wraps an [`std::io::Error`] with the path it concerns.
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Result type for repair config operations.
pub type RepairResult<T> = Result<T, RepairError>;
