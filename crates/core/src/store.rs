//! Durable keyed storage trait.
//!
//! Long-term memory persists user facts across sessions behind this trait.
//! The default backend is the in-memory store in `webdesk-memory`; a Redis
//! or sled backend can be dropped in without touching the memory layer.

use crate::error::MemoryError;
use async_trait::async_trait;
use std::time::Duration;

/// A durable key/value store with optional per-key expiry.
///
/// Keys are namespaced strings (e.g., `webdesk:memory:{user}:{key}`).
/// Values are opaque strings; callers handle their own serialization.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Store a value under a key, with an optional time-to-live.
    async fn set(
        &self,
        key: &str,
        value: &str,
        ttl: Option<Duration>,
    ) -> std::result::Result<(), MemoryError>;

    /// Fetch a value, or `None` if the key is absent or expired.
    async fn get(&self, key: &str) -> std::result::Result<Option<String>, MemoryError>;

    /// List all keys starting with the given prefix.
    async fn list_keys(&self, prefix: &str) -> std::result::Result<Vec<String>, MemoryError>;

    /// Remove a key. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> std::result::Result<bool, MemoryError>;
}
