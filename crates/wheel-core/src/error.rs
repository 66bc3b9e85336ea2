//! Error types for wheel mutations.

use thiserror::Error;

/// Alias for `Result<T, WheelError>`.
pub type WheelResult<T> = Result<T, WheelError>;

/// Errors that can occur when mutating a wheel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WheelError {
    /// No option with the given name exists.
    #[error("'{0}' not found in the wheel")]
    NotFound(String),

    /// An argument was empty or malformed.
    #[error("{0}")]
    Validation(String),
}
