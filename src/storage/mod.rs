//! Session-scoped fragment cache
//!
//! The loader never owns its cache; it receives a [`Storage`] capability.
//! Keys are opaque strings (the loader namespaces them with a prefix),
//! values are raw markup. Every operation is fallible and callers treat
//! failures as a miss or a no-op.

mod session;

pub use session::{CachedFragment, SessionStore};

use crate::error::{PartialsError, PartialsResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Abstract key-value store for cached fragments
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> PartialsResult<Option<String>>;

    /// Store `value` under `key`, overwriting any previous value
    async fn set(&self, key: &str, value: &str) -> PartialsResult<()>;
}

/// Process-local storage, dropped with the process
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> PartialsResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| PartialsError::storage("read", key, e))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> PartialsResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| PartialsError::storage("write", key, e))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_set_and_get() {
        let storage = MemoryStorage::new();
        storage.set("partials:/a.html", "<a></a>").await.unwrap();

        assert_eq!(
            storage.get("partials:/a.html").await.unwrap().as_deref(),
            Some("<a></a>")
        );
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn memory_overwrites_existing_key() {
        let storage = MemoryStorage::new();
        storage.set("k", "old").await.unwrap();
        storage.set("k", "new").await.unwrap();

        assert_eq!(storage.get("k").await.unwrap().as_deref(), Some("new"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn memory_missing_returns_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("nonexistent").await.unwrap().is_none());
        assert!(storage.is_empty());
    }
}
