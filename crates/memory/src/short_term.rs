//! Per-session working memory with a capacity bound.
//!
//! Each session owns its own lock: concurrent requests for the same
//! session serialize on it, while different sessions never contend.

use crate::{MemoryItem, MemoryKind};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

type SessionItems = Arc<Mutex<HashMap<String, MemoryItem>>>;

/// Bounded per-session key/value memory.
pub struct ShortTermMemory {
    sessions: RwLock<HashMap<String, SessionItems>>,
    max_items: usize,
}

impl ShortTermMemory {
    pub fn new(max_items: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_items,
        }
    }

    async fn session(&self, session_id: &str) -> SessionItems {
        {
            let sessions = self.sessions.read().await;
            if let Some(items) = sessions.get(session_id) {
                return Arc::clone(items);
            }
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(
            sessions
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(HashMap::new()))),
        )
    }

    /// Store a value under a key. Overwrites any existing item with fresh
    /// timestamps and reset access metadata, then prunes back to capacity.
    pub async fn store(
        &self,
        session_id: &str,
        key: &str,
        value: serde_json::Value,
        importance: f32,
    ) {
        let session = self.session(session_id).await;
        let mut items = session.lock().await;

        items.insert(
            key.to_string(),
            MemoryItem::new(key, value, MemoryKind::ShortTerm, importance),
        );

        if items.len() > self.max_items {
            let excess = items.len() - self.max_items;
            let mut ranked: Vec<(String, f32, u32)> = items
                .values()
                .map(|m| (m.key.clone(), m.importance, m.access_count))
                .collect();
            ranked.sort_by(|a, b| {
                a.1.partial_cmp(&b.1)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then(a.2.cmp(&b.2))
            });
            for (key, _, _) in ranked.into_iter().take(excess) {
                items.remove(&key);
            }
        }

        tracing::debug!(%session_id, key, "stored short-term memory");
    }

    /// Retrieve a value, updating its access metadata.
    pub async fn retrieve(&self, session_id: &str, key: &str) -> Option<serde_json::Value> {
        let session = self.session(session_id).await;
        let mut items = session.lock().await;

        let item = items.get_mut(key)?;
        item.accessed_at = Utc::now();
        item.access_count += 1;
        Some(item.value.clone())
    }

    /// All items for a session, in no particular order.
    pub async fn get_all(&self, session_id: &str) -> Vec<MemoryItem> {
        let session = self.session(session_id).await;
        let items = session.lock().await;
        items.values().cloned().collect()
    }

    /// Drop all items for a session.
    pub async fn clear(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn store_and_retrieve() {
        let memory = ShortTermMemory::new(50);
        memory
            .store("s1", "last_intent", serde_json::json!("asking_price"), 0.5)
            .await;

        let value = memory.retrieve("s1", "last_intent").await.unwrap();
        assert_eq!(value, serde_json::json!("asking_price"));
        assert!(memory.retrieve("s1", "missing").await.is_none());
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let memory = ShortTermMemory::new(50);
        memory.store("s1", "k", serde_json::json!(1), 0.5).await;
        assert!(memory.retrieve("s2", "k").await.is_none());
    }

    #[tokio::test]
    async fn overwrite_resets_access_metadata() {
        let memory = ShortTermMemory::new(50);
        memory.store("s1", "k", serde_json::json!(1), 0.5).await;
        memory.retrieve("s1", "k").await;
        memory.store("s1", "k", serde_json::json!(2), 0.5).await;

        let items = memory.get_all("s1").await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].access_count, 0);
        assert_eq!(items[0].value, serde_json::json!(2));
    }

    #[tokio::test]
    async fn prune_drops_least_important_first() {
        let memory = ShortTermMemory::new(2);
        memory.store("s1", "low", serde_json::json!(1), 0.1).await;
        memory.store("s1", "mid", serde_json::json!(2), 0.5).await;
        memory.store("s1", "high", serde_json::json!(3), 0.9).await;

        assert!(memory.retrieve("s1", "low").await.is_none());
        assert!(memory.retrieve("s1", "mid").await.is_some());
        assert!(memory.retrieve("s1", "high").await.is_some());
    }

    #[tokio::test]
    async fn access_count_breaks_importance_ties() {
        let memory = ShortTermMemory::new(2);
        memory.store("s1", "a", serde_json::json!(1), 0.5).await;
        memory.store("s1", "b", serde_json::json!(2), 0.5).await;
        // Touch "a" so "b" is the pruning victim
        memory.retrieve("s1", "a").await;
        memory.store("s1", "c", serde_json::json!(3), 0.5).await;

        assert!(memory.retrieve("s1", "b").await.is_none());
        assert!(memory.retrieve("s1", "a").await.is_some());
    }

    #[tokio::test]
    async fn clear_removes_everything() {
        let memory = ShortTermMemory::new(50);
        memory.store("s1", "k", serde_json::json!(1), 0.5).await;
        memory.clear("s1").await;
        assert!(memory.get_all("s1").await.is_empty());
    }

    #[tokio::test]
    async fn capacity_is_never_exceeded() {
        let memory = ShortTermMemory::new(5);
        for i in 0..20 {
            memory
                .store("s1", &format!("k{i}"), serde_json::json!(i), 0.5)
                .await;
        }
        assert!(memory.get_all("s1").await.len() <= 5);
    }
}
