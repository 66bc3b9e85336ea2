//! Persistence for the wheel option store.
//!
//! A [`WheelStore`] reads and writes one whole [`Wheel`] document. Backends:
//! a JSON file ([`FileStore`]), a pinned chat message ([`PinnedMessageStore`]),
//! and memory ([`MemoryStore`]). Reads fail soft through [`load_or_empty`];
//! writes report [`StoreWriteError`]. [`Transactor`] serializes
//! read-modify-write cycles per store.

pub mod channel;
pub mod error;
pub mod file;
pub mod lock;
pub mod memory;
pub mod pinned;

use async_trait::async_trait;
use wheel_core::Wheel;

pub use channel::{ChannelBackend, ChannelId, MessageId, PinnedMessage, UserId};
pub use error::{StoreReadError, StoreWriteError};
pub use file::FileStore;
pub use lock::{StoreLocks, Transactor, Update};
pub use memory::MemoryStore;
pub use pinned::{PinnedMessageStore, PinnedStoreConfig};

/// A place where one wheel document lives.
#[async_trait]
pub trait WheelStore: Send + Sync {
    /// Stable identity of the backing document, used to serialize writers.
    fn identity(&self) -> String;

    /// Read the current document.
    async fn load(&self) -> Result<Wheel, StoreReadError>;

    /// Replace the whole document.
    async fn save(&self, wheel: &Wheel) -> Result<(), StoreWriteError>;
}

/// Load a wheel, treating any read failure as an empty wheel.
///
/// A missing document is expected on first use and logged at debug level;
/// anything else is logged as a warning.
pub async fn load_or_empty(store: &dyn WheelStore) -> Wheel {
    match store.load().await {
        Ok(wheel) => wheel,
        Err(err @ StoreReadError::Missing(_)) => {
            tracing::debug!(store = %store.identity(), "{err}; starting empty");
            Wheel::new()
        }
        Err(err) => {
            tracing::warn!(store = %store.identity(), error = %err, "unreadable wheel, treating as empty");
            Wheel::new()
        }
    }
}
