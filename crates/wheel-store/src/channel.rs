//! The chat-platform capabilities the pinned-message backend relies on.
//!
//! Only the shape is defined here. A concrete platform client implements
//! [`ChannelBackend`]; tests use an in-memory fake.

use async_trait::async_trait;

/// Opaque channel identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId(pub String);

/// Opaque message identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(pub String);

/// Opaque user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl std::fmt::Display for ChannelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pinned message as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinnedMessage {
    /// Message id.
    pub id: MessageId,
    /// Who wrote it.
    pub author: UserId,
    /// Text body.
    pub content: String,
}

/// Channel operations the pinned-message store needs.
///
/// Errors are reported as strings; the store wraps them in its own error
/// types.
#[async_trait]
pub trait ChannelBackend: Send + Sync {
    /// The identity the bot posts as.
    fn bot_user(&self) -> UserId;

    /// Find a channel by exact name.
    async fn find_channel(&self, name: &str) -> Result<Option<ChannelId>, String>;

    /// All pinned messages in a channel.
    async fn pinned_messages(&self, channel: &ChannelId) -> Result<Vec<PinnedMessage>, String>;

    /// Post a new message.
    async fn send_message(&self, channel: &ChannelId, content: &str) -> Result<MessageId, String>;

    /// Replace a message body.
    async fn edit_message(
        &self,
        channel: &ChannelId,
        message: &MessageId,
        content: &str,
    ) -> Result<(), String>;

    /// Pin a message.
    async fn pin_message(&self, channel: &ChannelId, message: &MessageId) -> Result<(), String>;
}
