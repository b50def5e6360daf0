//! Per-user persistent memory behind a durable keyed store.
//!
//! Keys are namespaced `webdesk:memory:{user}:{key}`. Every write carries
//! a TTL (default 30 days) after which the backing store is expected to
//! expire the entry.

use crate::{MemoryItem, MemoryKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use webdesk_core::error::MemoryError;
use webdesk_core::store::KeyValueStore;

const KEY_PREFIX: &str = "webdesk:memory:";
const SECS_PER_DAY: u64 = 86_400;

/// Everything known about a user, aggregated from their namespace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub preferences: HashMap<String, serde_json::Value>,
}

/// Cross-session user memory.
pub struct LongTermMemory {
    store: Arc<dyn KeyValueStore>,
    ttl: Duration,
}

impl LongTermMemory {
    pub fn new(store: Arc<dyn KeyValueStore>, ttl_days: u64) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(ttl_days * SECS_PER_DAY),
        }
    }

    fn namespace(user_id: &str) -> String {
        format!("{KEY_PREFIX}{user_id}:")
    }

    fn storage_key(user_id: &str, key: &str) -> String {
        format!("{}{}", Self::namespace(user_id), key)
    }

    /// Persist a fact about a user.
    pub async fn store(
        &self,
        user_id: &str,
        key: &str,
        value: serde_json::Value,
        importance: f32,
    ) -> Result<(), MemoryError> {
        let item = MemoryItem::new(key, value, MemoryKind::LongTerm, importance);
        let data =
            serde_json::to_string(&item).map_err(|e| MemoryError::Decode(e.to_string()))?;

        self.store
            .set(&Self::storage_key(user_id, key), &data, Some(self.ttl))
            .await?;

        tracing::debug!(%user_id, key, "stored long-term memory");
        Ok(())
    }

    /// Fetch a fact, or `None` if absent or expired.
    pub async fn retrieve(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, MemoryError> {
        let data = self.store.get(&Self::storage_key(user_id, key)).await?;
        match data {
            Some(raw) => {
                let item: MemoryItem =
                    serde_json::from_str(&raw).map_err(|e| MemoryError::Decode(e.to_string()))?;
                Ok(Some(item.value))
            }
            None => Ok(None),
        }
    }

    /// Aggregate every stored fact under the user's namespace into a flat
    /// preference map.
    pub async fn get_user_profile(&self, user_id: &str) -> Result<UserProfile, MemoryError> {
        let namespace = Self::namespace(user_id);
        let keys = self.store.list_keys(&namespace).await?;

        let mut preferences = HashMap::new();
        for full_key in keys {
            if let Some(raw) = self.store.get(&full_key).await? {
                let item: MemoryItem =
                    serde_json::from_str(&raw).map_err(|e| MemoryError::Decode(e.to_string()))?;
                let short_key = full_key
                    .strip_prefix(&namespace)
                    .unwrap_or(&full_key)
                    .to_string();
                preferences.insert(short_key, item.value);
            }
        }

        Ok(UserProfile {
            user_id: user_id.to_string(),
            preferences,
        })
    }

    /// Remove a fact. Returns `true` if it existed.
    pub async fn delete(&self, user_id: &str, key: &str) -> Result<bool, MemoryError> {
        self.store.delete(&Self::storage_key(user_id, key)).await
    }
}
