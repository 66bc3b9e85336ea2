//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to read a wheel document. Always recoverable: the caller
/// substitutes an empty wheel.
#[derive(Debug, Error)]
pub enum StoreReadError {
    /// The document does not exist yet.
    #[error("no wheel document at {0}")]
    Missing(String),

    /// The document exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The document is not a valid wheel.
    #[error("malformed wheel document at {location}: {source}")]
    Malformed {
        /// Where the document lives.
        location: String,
        /// Parse error.
        source: serde_json::Error,
    },

    /// The chat backend failed.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Failure to write a wheel document. Surfaced to the user.
#[derive(Debug, Error)]
pub enum StoreWriteError {
    /// The file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The wheel could not be serialized.
    #[error("failed to serialize wheel: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The serialized document exceeds what the backend can hold.
    #[error("wheel document is {len} characters, limit is {max}")]
    TooLarge {
        /// Serialized length.
        len: usize,
        /// Backend limit.
        max: usize,
    },

    /// The data channel does not exist.
    #[error("no channel named '{0}'")]
    NoChannel(String),

    /// The chat backend failed.
    #[error("backend error: {0}")]
    Backend(String),
}
