//! Error types for FlatDB
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Absent documents, indexes and meta entries are not errors at the store
//! API; they surface as `None` or empty values. The variants below cover the
//! conditions that are fatal to a single call.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for FlatDB operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for FlatDB
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (directory creation, removal, listing)
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// A low-level read targeted a file that does not exist
    #[error("File not found: {}", path.display())]
    NotFound {
        /// Path that was read
        path: PathBuf,
    },

    /// Serialization/deserialization error outside of a stored file
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A stored file could not be decoded
    #[error("Data corruption in {}: {reason}", path.display())]
    Corruption {
        /// File that failed to decode
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// A write kept failing after every retry attempt
    #[error("Write to {} failed after {attempts} attempts: {source}", path.display())]
    WriteFailed {
        /// Target of the write
        path: PathBuf,
        /// Total number of attempts made
        attempts: usize,
        /// Error from the last attempt
        #[source]
        source: io::Error,
    },

    /// Caller supplied an unusable argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store options could not be read or parsed
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// Build a corruption error for `path`
    pub fn corruption(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Corruption {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    /// True for the not-found variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(e: rmp_serde::encode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(e: rmp_serde::decode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}
