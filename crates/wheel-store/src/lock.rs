//! Per-store serialization of read-modify-write cycles.
//!
//! Two commands touching the same document must not interleave their load
//! and save, or one of them silently loses its update. [`StoreLocks`] hands
//! out one async mutex per store identity; [`Transactor`] holds it across
//! load, mutate, and save.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use wheel_core::Wheel;

use crate::error::StoreWriteError;
use crate::{WheelStore, load_or_empty};

/// Registry of per-store locks, keyed by [`WheelStore::identity`].
///
/// Clones share the same registry.
#[derive(Debug, Clone, Default)]
pub struct StoreLocks {
    locks: Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>,
}

impl StoreLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding the given store identity.
    pub fn lock_for(&self, identity: &str) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = match self.locks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        locks
            .entry(identity.to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }
}

/// What a mutation decided about its changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Update<T> {
    /// Persist the mutated wheel and return the value.
    Commit(T),
    /// Drop any changes and return the value without writing.
    Discard(T),
}

/// Runs loads and mutations against one store under its lock.
#[derive(Clone)]
pub struct Transactor {
    store: Arc<dyn WheelStore>,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl Transactor {
    /// Bind a store to its lock in the registry.
    pub fn new(store: Arc<dyn WheelStore>, locks: &StoreLocks) -> Self {
        let lock = locks.lock_for(&store.identity());
        Self { store, lock }
    }

    /// Load the current wheel. Read errors yield an empty wheel.
    pub async fn read(&self) -> Wheel {
        let _guard = self.lock.lock().await;
        load_or_empty(self.store.as_ref()).await
    }

    /// Load, apply `mutate`, and save if it commits, all under the lock.
    pub async fn update<T, F>(&self, mutate: F) -> Result<T, StoreWriteError>
    where
        F: FnOnce(&mut Wheel) -> Update<T>,
    {
        let _guard = self.lock.lock().await;
        let mut wheel = load_or_empty(self.store.as_ref()).await;
        match mutate(&mut wheel) {
            Update::Commit(value) => {
                self.store.save(&wheel).await.inspect_err(|e| {
                    tracing::warn!(store = %self.store.identity(), error = %e, "failed to save wheel");
                })?;
                Ok(value)
            }
            Update::Discard(value) => Ok(value),
        }
    }
}
