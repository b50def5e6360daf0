//! In-process fallback for the durable keyed store.
//!
//! Used when no durable backend is configured. Not durable across
//! restarts, and known limitation: TTLs are accepted but not enforced,
//! entries live until deleted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use webdesk_core::error::MemoryError;
use webdesk_core::store::KeyValueStore;

/// A `KeyValueStore` over a process-local map. Development only.
#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn set(
        &self,
        key: &str,
        value: &str,
        _ttl: Option<Duration>,
    ) -> Result<(), MemoryError> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>, MemoryError> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, MemoryError> {
        let entries = self.entries.read().await;
        let mut keys: Vec<String> = entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn delete(&self, key: &str) -> Result<bool, MemoryError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let store = InMemoryStore::new();
        store.set("k", "v", None).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
        assert!(store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
        assert!(!store.delete("k").await.unwrap());
    }

    #[tokio::test]
    async fn list_keys_filters_by_prefix() {
        let store = InMemoryStore::new();
        store.set("ns:a", "1", None).await.unwrap();
        store.set("ns:b", "2", None).await.unwrap();
        store.set("other:c", "3", None).await.unwrap();

        let keys = store.list_keys("ns:").await.unwrap();
        assert_eq!(keys, vec!["ns:a".to_string(), "ns:b".to_string()]);
    }
}
