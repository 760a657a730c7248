use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::gateway::{ProgressStore, SettingsStore};

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for the durable key-value store backing the app.
///
/// The store holds opaque string blobs under fixed keys; callers own the
/// encoding. Writes on a key are sequenced relative to reads on the same key
/// (there is a single logical writer by construction).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the blob stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the blob under `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the typed gateways behind one handle for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub progress: ProgressStore,
    pub settings: SettingsStore,
}

impl Storage {
    /// Build a `Storage` over any key-value backend.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            progress: ProgressStore::new(Arc::clone(&kv)),
            settings: SettingsStore::new(kv),
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryKeyValueStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn in_memory_store_round_trips_values() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.put("k", "v1").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v1"));

        store.put("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));

        store.remove("k").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), None);
        // removing again is fine
        store.remove("k").await.unwrap();
    }
}
