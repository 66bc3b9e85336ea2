//! The outbound side of a command: send, edit, and pin replies.

use std::sync::Mutex;

use async_trait::async_trait;
use wheel_store::MessageId;

use crate::error::ReplyError;

/// Where a command's replies go.
///
/// A chat adapter implements this for the channel the command came from.
#[async_trait]
pub trait Replier: Send + Sync {
    /// Send a new reply and return its id.
    async fn send(&self, text: &str) -> Result<MessageId, ReplyError>;

    /// Replace the text of an earlier reply.
    async fn edit(&self, message: &MessageId, text: &str) -> Result<(), ReplyError>;

    /// Pin an earlier reply as the current result.
    async fn pin(&self, message: &MessageId) -> Result<(), ReplyError>;
}

/// One recorded adapter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEntry {
    /// A reply was sent.
    Sent {
        /// Assigned id.
        id: MessageId,
        /// Text sent.
        text: String,
    },
    /// A reply was edited.
    Edited {
        /// Which reply.
        id: MessageId,
        /// New text.
        text: String,
    },
    /// A reply was pinned.
    Pinned {
        /// Which reply.
        id: MessageId,
    },
}

/// A [`Replier`] that records every call in memory.
#[derive(Debug, Default)]
pub struct Transcript {
    entries: Mutex<Vec<TranscriptEntry>>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded call, in order.
    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.lock().clone()
    }

    /// Final text of every sent reply, in send order, with edits applied.
    pub fn messages(&self) -> Vec<String> {
        let entries = self.lock();
        let mut messages: Vec<(MessageId, String)> = Vec::new();
        for entry in entries.iter() {
            match entry {
                TranscriptEntry::Sent { id, text } => messages.push((id.clone(), text.clone())),
                TranscriptEntry::Edited { id, text } => {
                    if let Some(msg) = messages.iter_mut().find(|(m, _)| m == id) {
                        msg.1 = text.clone();
                    }
                }
                TranscriptEntry::Pinned { .. } => {}
            }
        }
        messages.into_iter().map(|(_, text)| text).collect()
    }

    /// Final text of the most recent reply.
    pub fn last(&self) -> Option<String> {
        self.messages().pop()
    }

    /// Final text of every pinned reply.
    pub fn pinned(&self) -> Vec<String> {
        let pinned: Vec<MessageId> = self
            .lock()
            .iter()
            .filter_map(|e| match e {
                TranscriptEntry::Pinned { id } => Some(id.clone()),
                _ => None,
            })
            .collect();
        let entries = self.lock();
        pinned
            .iter()
            .filter_map(|id| {
                entries.iter().rev().find_map(|e| match e {
                    TranscriptEntry::Sent { id: m, text } | TranscriptEntry::Edited { id: m, text }
                        if m == id =>
                    {
                        Some(text.clone())
                    }
                    _ => None,
                })
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TranscriptEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn knows(&self, id: &MessageId) -> bool {
        self.lock()
            .iter()
            .any(|e| matches!(e, TranscriptEntry::Sent { id: m, .. } if m == id))
    }
}

#[async_trait]
impl Replier for Transcript {
    async fn send(&self, text: &str) -> Result<MessageId, ReplyError> {
        let mut entries = self.lock();
        let sent = entries
            .iter()
            .filter(|e| matches!(e, TranscriptEntry::Sent { .. }))
            .count();
        let id = MessageId(format!("reply-{sent}"));
        entries.push(TranscriptEntry::Sent {
            id: id.clone(),
            text: text.to_string(),
        });
        Ok(id)
    }

    async fn edit(&self, message: &MessageId, text: &str) -> Result<(), ReplyError> {
        if !self.knows(message) {
            return Err(ReplyError::Edit(format!("unknown message {message}")));
        }
        self.lock().push(TranscriptEntry::Edited {
            id: message.clone(),
            text: text.to_string(),
        });
        Ok(())
    }

    async fn pin(&self, message: &MessageId) -> Result<(), ReplyError> {
        if !self.knows(message) {
            return Err(ReplyError::Pin(format!("unknown message {message}")));
        }
        self.lock().push(TranscriptEntry::Pinned {
            id: message.clone(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_sends_edits_and_pins() {
        let t = Transcript::new();
        let first = t.send("one").await.unwrap();
        let second = t.send("two").await.unwrap();
        t.edit(&first, "uno").await.unwrap();
        t.pin(&first).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(t.messages(), vec!["uno", "two"]);
        assert_eq!(t.pinned(), vec!["uno"]);
        assert_eq!(t.last().as_deref(), Some("two"));
        assert_eq!(t.entries().len(), 4);
    }

    #[tokio::test]
    async fn unknown_message_is_an_error() {
        let t = Transcript::new();
        let ghost = MessageId("nope".to_string());
        assert!(matches!(t.edit(&ghost, "x").await, Err(ReplyError::Edit(_))));
        assert!(matches!(t.pin(&ghost).await, Err(ReplyError::Pin(_))));
    }

    #[tokio::test]
    async fn clear_forgets() {
        let t = Transcript::new();
        t.send("one").await.unwrap();
        t.clear();
        assert!(t.messages().is_empty());
    }
}
