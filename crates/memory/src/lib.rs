//! # Webdesk Memory
//!
//! Three memory layers for the support agent:
//!
//! - [`ShortTermMemory`]: per-session working memory with a capacity bound
//!   and importance-based pruning.
//! - [`LongTermMemory`]: per-user facts behind a durable [`KeyValueStore`]
//!   with a TTL on every write.
//! - [`ConversationMemory`]: per-session message history with topic-based
//!   compaction once it grows past a threshold.
//!
//! Short-term and conversation memory are shared mutable state across
//! concurrent requests for the same session id; both serialize access
//! per session key so interleaved store/prune or append/compact operations
//! cannot lose updates.

pub mod conversation;
pub mod in_memory_store;
pub mod long_term;
pub mod short_term;

pub use conversation::ConversationMemory;
pub use in_memory_store::InMemoryStore;
pub use long_term::{LongTermMemory, UserProfile};
pub use short_term::ShortTermMemory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which layer a memory item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryKind {
    ShortTerm,
    LongTerm,
}

/// A single stored memory item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryItem {
    pub key: String,
    pub value: serde_json::Value,
    pub kind: MemoryKind,
    pub created_at: DateTime<Utc>,
    pub accessed_at: DateTime<Utc>,
    pub access_count: u32,
    /// 0.0 = low, 1.0 = high; drives pruning order
    pub importance: f32,
    /// Free-form annotations (source, tags, ...); not interpreted by the
    /// stores themselves
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl MemoryItem {
    pub fn new(key: impl Into<String>, value: serde_json::Value, kind: MemoryKind, importance: f32) -> Self {
        let now = Utc::now();
        Self {
            key: key.into(),
            value,
            kind,
            created_at: now,
            accessed_at: now,
            access_count: 0,
            importance,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, serde_json::Value>) -> Self {
        self.metadata = metadata;
        self
    }
}
