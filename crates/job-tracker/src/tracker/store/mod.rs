//! Durable key-value collaborators the repository persists through.

mod file;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub use file::FileStore;

/// Key the whole application collection is stored under.
pub const COLLECTION_KEY: &str = "jobApplicationTracker";

/// Storage abstraction so the repository can be exercised against an in-memory fake.
pub trait CollectionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to save data. Storage might be full ({requested} bytes requested, capacity {capacity} bytes)")]
    CapacityExceeded { requested: usize, capacity: usize },
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store, optionally capped to mimic a storage quota.
#[derive(Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    capacity: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects any write that would push the stored bytes past `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Arc::default(),
            capacity: Some(capacity),
        }
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }
}

impl CollectionStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut guard = self.entries.lock().expect("store mutex poisoned");
        if let Some(capacity) = self.capacity {
            let others: usize = guard
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| existing.len() + stored.len())
                .sum();
            let requested = others + key.len() + value.len();
            if requested > capacity {
                return Err(StoreError::CapacityExceeded {
                    requested,
                    capacity,
                });
            }
        }
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
        Ok(())
    }
}
