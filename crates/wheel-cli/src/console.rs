//! Replier that writes to the terminal.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use colored::Colorize;

use wheel_bot::{Replier, ReplyError};
use wheel_store::MessageId;

/// Prints replies to stdout. A terminal cannot rewrite earlier output, so
/// edits are printed as new lines.
#[derive(Debug, Default)]
pub struct ConsoleReplier {
    next_id: AtomicU64,
}

impl ConsoleReplier {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Replier for ConsoleReplier {
    async fn send(&self, text: &str) -> Result<MessageId, ReplyError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        println!("{text}");
        Ok(MessageId(id.to_string()))
    }

    async fn edit(&self, _message: &MessageId, text: &str) -> Result<(), ReplyError> {
        println!("{text}");
        Ok(())
    }

    async fn pin(&self, _message: &MessageId) -> Result<(), ReplyError> {
        println!("{}", "(pinned as current result)".dimmed());
        Ok(())
    }
}
