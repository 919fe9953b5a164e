//! InMemoryBackingStore - HashMap-backed storage for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use super::{BackingError, BackingStore};

/// In-memory backing store. Clone-friendly via Arc: clones share storage,
/// which lets tests reopen a store over the same "device".
#[derive(Clone)]
pub struct InMemoryBackingStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl Default for InMemoryBackingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBackingStore {
    /// Create a new empty backing store.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl BackingStore for InMemoryBackingStore {
    async fn get(&self, key: &str) -> Result<Option<String>, BackingError> {
        let entries = self.entries.read().map_err(|_| BackingError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), BackingError> {
        let mut entries = self.entries.write().map_err(|_| BackingError::LockPoisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryBackingStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = InMemoryBackingStore::new();
        store.set("doc", "{}".to_string()).await.unwrap();
        assert_eq!(store.get("doc").await.unwrap(), Some("{}".to_string()));
    }

    #[tokio::test]
    async fn set_replaces_wholesale() {
        let store = InMemoryBackingStore::new();
        store.set("doc", "first".to_string()).await.unwrap();
        store.set("doc", "second".to_string()).await.unwrap();
        assert_eq!(store.get("doc").await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn clone_shares_storage() {
        let store = InMemoryBackingStore::new();
        let clone = store.clone();
        store.set("doc", "shared".to_string()).await.unwrap();
        assert_eq!(clone.get("doc").await.unwrap(), Some("shared".to_string()));
    }
}
