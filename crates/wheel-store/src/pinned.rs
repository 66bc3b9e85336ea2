//! Pinned-message backend: the wheel document is the body of a message the
//! bot pinned in a dedicated channel.

use async_trait::async_trait;
use wheel_core::Wheel;

use crate::WheelStore;
use crate::channel::{ChannelBackend, ChannelId, PinnedMessage};
use crate::error::{StoreReadError, StoreWriteError};

/// Default name of the channel holding the document.
pub const DEFAULT_DATA_CHANNEL: &str = "wheel_data";

/// Default message size cap.
pub const DEFAULT_MAX_MESSAGE_LEN: usize = 2000;

/// Configuration for a pinned-message store.
#[derive(Debug, Clone)]
pub struct PinnedStoreConfig {
    /// Name of the channel holding the document.
    pub channel_name: String,
    /// Largest message body the platform accepts, in characters.
    pub max_message_len: usize,
}

impl Default for PinnedStoreConfig {
    fn default() -> Self {
        Self {
            channel_name: DEFAULT_DATA_CHANNEL.to_string(),
            max_message_len: DEFAULT_MAX_MESSAGE_LEN,
        }
    }
}

impl PinnedStoreConfig {
    /// Set the data channel name.
    pub fn with_channel_name(mut self, name: impl Into<String>) -> Self {
        self.channel_name = name.into();
        self
    }

    /// Set the message size cap.
    pub fn with_max_message_len(mut self, max: usize) -> Self {
        self.max_message_len = max;
        self
    }
}

/// Stores the wheel in a pinned message authored by the bot.
pub struct PinnedMessageStore<B> {
    backend: B,
    config: PinnedStoreConfig,
}

impl<B: ChannelBackend> PinnedMessageStore<B> {
    /// Create a store over a chat backend.
    pub fn new(backend: B, config: PinnedStoreConfig) -> Self {
        Self { backend, config }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn channel(&self) -> Result<Option<ChannelId>, String> {
        self.backend.find_channel(&self.config.channel_name).await
    }

    /// The bot's pinned document in `channel`. Other bot pins, such as spin
    /// results, are skipped; the first one that parses as a wheel wins.
    async fn document(&self, channel: &ChannelId) -> Result<Document, String> {
        let bot = self.backend.bot_user();
        let mut unreadable = None;
        for message in self.backend.pinned_messages(channel).await? {
            if message.author != bot {
                continue;
            }
            match Wheel::from_json(&message.content) {
                Ok(wheel) => return Ok(Document::Found { message, wheel }),
                Err(e) => {
                    tracing::debug!(
                        message = %message.id,
                        error = %e,
                        "skipping non-document pin"
                    );
                    unreadable.get_or_insert(e);
                }
            }
        }
        Ok(match unreadable {
            Some(e) => Document::Unreadable(e),
            None => Document::Absent,
        })
    }
}

/// What the data channel holds.
enum Document {
    Found {
        message: PinnedMessage,
        wheel: Wheel,
    },
    /// The bot has pins there, but none of them is a wheel.
    Unreadable(serde_json::Error),
    Absent,
}

#[async_trait]
impl<B: ChannelBackend> WheelStore for PinnedMessageStore<B> {
    fn identity(&self) -> String {
        format!("channel:{}", self.config.channel_name)
    }

    async fn load(&self) -> Result<Wheel, StoreReadError> {
        let location = format!("#{}", self.config.channel_name);
        let channel = self
            .channel()
            .await
            .map_err(StoreReadError::Backend)?
            .ok_or_else(|| StoreReadError::Missing(location.clone()))?;
        match self.document(&channel).await.map_err(StoreReadError::Backend)? {
            Document::Found { wheel, .. } => Ok(wheel),
            Document::Unreadable(source) => {
                Err(StoreReadError::Malformed { location, source })
            }
            Document::Absent => Err(StoreReadError::Missing(location)),
        }
    }

    async fn save(&self, wheel: &Wheel) -> Result<(), StoreWriteError> {
        let body = wheel.to_json_compact()?;
        let len = body.chars().count();
        if len > self.config.max_message_len {
            return Err(StoreWriteError::TooLarge {
                len,
                max: self.config.max_message_len,
            });
        }

        let channel = self
            .channel()
            .await
            .map_err(StoreWriteError::Backend)?
            .ok_or_else(|| StoreWriteError::NoChannel(self.config.channel_name.clone()))?;

        match self
            .document(&channel)
            .await
            .map_err(StoreWriteError::Backend)?
        {
            Document::Found { message, .. } => {
                self.backend
                    .edit_message(&channel, &message.id, &body)
                    .await
                    .map_err(StoreWriteError::Backend)?;
            }
            Document::Unreadable(_) | Document::Absent => {
                let id = self
                    .backend
                    .send_message(&channel, &body)
                    .await
                    .map_err(StoreWriteError::Backend)?;
                self.backend
                    .pin_message(&channel, &id)
                    .await
                    .map_err(StoreWriteError::Backend)?;
                tracing::info!(channel = %channel, message = %id, "pinned new wheel document");
            }
        }
        Ok(())
    }
}
