//! In-memory backend for development and testing.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use wheel_core::Wheel;

use crate::WheelStore;
use crate::error::{StoreReadError, StoreWriteError};

/// Keeps the serialized document in memory.
///
/// The document is held as text so reads and writes go through the same
/// serialization path as the durable backends.
#[derive(Debug, Default)]
pub struct MemoryStore {
    name: String,
    document: RwLock<Option<String>>,
    fail_writes: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryStore {
    /// Create an empty store with no document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a store holding the given wheel.
    pub fn with_wheel(name: impl Into<String>, wheel: &Wheel) -> Self {
        let store = Self::new(name);
        if let Ok(mut doc) = store.document.write() {
            *doc = wheel.to_json_compact().ok();
        }
        store
    }

    /// Create a store holding arbitrary text as its document.
    pub fn with_raw(name: impl Into<String>, raw: impl Into<String>) -> Self {
        let store = Self::new(name);
        if let Ok(mut doc) = store.document.write() {
            *doc = Some(raw.into());
        }
        store
    }

    /// Make every subsequent save fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WheelStore for MemoryStore {
    fn identity(&self) -> String {
        format!("memory:{}", self.name)
    }

    async fn load(&self) -> Result<Wheel, StoreReadError> {
        let doc = self
            .document
            .read()
            .map_err(|e| StoreReadError::Backend(e.to_string()))?;
        let text = doc
            .as_deref()
            .ok_or_else(|| StoreReadError::Missing(self.identity()))?;
        Wheel::from_json(text).map_err(|source| StoreReadError::Malformed {
            location: self.identity(),
            source,
        })
    }

    async fn save(&self, wheel: &Wheel) -> Result<(), StoreWriteError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreWriteError::Backend("writes disabled".to_string()));
        }
        let text = wheel.to_json_compact()?;
        let mut doc = self
            .document
            .write()
            .map_err(|e| StoreWriteError::Backend(e.to_string()))?;
        *doc = Some(text);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
