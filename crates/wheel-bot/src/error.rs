//! Error types for command handling.

use thiserror::Error;

/// The outbound adapter failed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReplyError {
    /// Sending a message failed.
    #[error("failed to send reply: {0}")]
    Send(String),

    /// Editing a message failed.
    #[error("failed to edit reply: {0}")]
    Edit(String),

    /// Pinning a message failed.
    #[error("failed to pin reply: {0}")]
    Pin(String),
}

/// Input that does not name a command.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// Nothing after the prefix.
    #[error("empty command")]
    Empty,

    /// The leading token is not a known verb.
    #[error("unknown command: {0}")]
    UnknownVerb(String),
}

/// Malformed arguments for a known verb.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ArgError {
    /// Wrong number or shape of arguments.
    #[error("wrong arguments")]
    Usage,

    /// A comma-separated list contained a blank entry.
    #[error("tags cannot be empty")]
    EmptyTag,
}
