//! Command handling for the wheel chat bot.
//!
//! [`WheelHandler`] takes one command string, routes it to the option store
//! and draw engine, and answers through a [`Replier`]. The chat platform is
//! never referenced directly: hosts supply a store and a replier.

pub mod command;
pub mod config;
pub mod error;
pub mod handler;
pub mod help;
pub mod reply;

pub use command::{Command, Verb, parse, strip_prefix};
pub use config::WheelConfig;
pub use error::{ParseError, ReplyError};
pub use handler::WheelHandler;
pub use reply::{Replier, Transcript, TranscriptEntry};
