//! Per-session conversation history with topic-based compaction.
//!
//! Once a session's history grows past the configured threshold, everything
//! older than the most recent messages is folded into a one-sentence topic
//! summary. The summary is surfaced to the model as a synthetic system
//! message ahead of the raw history.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use webdesk_core::message::{ChatMessage, Role};

/// How many raw messages survive a compaction.
const KEEP_RECENT: usize = 10;

/// (substring to scan for, topic label)
const TOPIC_KEYWORDS: &[(&str, &str)] = &[
    ("prix", "tarifs"),
    ("devis", "devis"),
    ("délai", "délais"),
];

struct Session {
    messages: Vec<StoredMessage>,
    summary: Option<String>,
}

struct StoredMessage {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

type SessionHandle = Arc<Mutex<Session>>;

/// Bounded conversation history, one list per session.
pub struct ConversationMemory {
    sessions: RwLock<HashMap<String, SessionHandle>>,
    max_messages: usize,
}

impl ConversationMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_messages,
        }
    }

    async fn session(&self, session_id: &str) -> SessionHandle {
        {
            let sessions = self.sessions.read().await;
            if let Some(session) = sessions.get(session_id) {
                return Arc::clone(session);
            }
        }
        let mut sessions = self.sessions.write().await;
        Arc::clone(sessions.entry(session_id.to_string()).or_insert_with(|| {
            Arc::new(Mutex::new(Session {
                messages: Vec::new(),
                summary: None,
            }))
        }))
    }

    /// Append a message; compacts the history if it grew past the bound.
    pub async fn add_message(&self, session_id: &str, role: Role, content: &str) {
        let session = self.session(session_id).await;
        let mut session = session.lock().await;

        session.messages.push(StoredMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        });

        if session.messages.len() > self.max_messages {
            compact(&mut session);
            tracing::debug!(%session_id, "compacted conversation history");
        }
    }

    /// The last `n` messages in order, preceded by a synthetic system
    /// message carrying the summary when one exists.
    pub async fn get_messages(&self, session_id: &str, last_n: usize) -> Vec<ChatMessage> {
        let session = self.session(session_id).await;
        let session = session.lock().await;

        let start = session.messages.len().saturating_sub(last_n);
        let mut result = Vec::new();

        if let Some(summary) = &session.summary {
            result.push(ChatMessage::system(format!(
                "Résumé de la conversation précédente: {summary}"
            )));
        }

        for msg in &session.messages[start..] {
            let mut message = ChatMessage::with_role(msg.role, msg.content.clone());
            message.timestamp = msg.timestamp;
            result.push(message);
        }

        result
    }

    /// Drop a session's history and summary.
    pub async fn clear(&self, session_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(session_id);
    }
}

/// Keep the most recent messages verbatim; fold everything older into a
/// topic summary, overwriting any prior one.
fn compact(session: &mut Session) {
    let cutoff = session.messages.len().saturating_sub(KEEP_RECENT);
    if cutoff == 0 {
        return;
    }

    let mut topics: Vec<&str> = Vec::new();
    for msg in &session.messages[..cutoff] {
        let lower = msg.content.to_lowercase();
        for (keyword, label) in TOPIC_KEYWORDS {
            if lower.contains(keyword) && !topics.contains(label) {
                topics.push(label);
            }
        }
    }

    let summary = if topics.is_empty() {
        "Discussion sur: divers sujets".to_string()
    } else {
        format!("Discussion sur: {}", topics.join(", "))
    };

    session.summary = Some(summary);
    session.messages.drain(..cutoff);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn messages_are_returned_in_order() {
        let memory = ConversationMemory::new(20);
        memory.add_message("s1", Role::User, "Bonjour").await;
        memory.add_message("s1", Role::Assistant, "Bonjour !").await;

        let messages = memory.get_messages("s1", 10).await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[1].content, "Bonjour !");
    }

    #[tokio::test]
    async fn last_n_limits_history() {
        let memory = ConversationMemory::new(20);
        for i in 0..8 {
            memory
                .add_message("s1", Role::User, &format!("message {i}"))
                .await;
        }

        let messages = memory.get_messages("s1", 3).await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, "message 5");
    }

    #[tokio::test]
    async fn compaction_summarizes_old_topics() {
        let memory = ConversationMemory::new(12);
        memory
            .add_message("s1", Role::User, "Quel est le prix d'un site ?")
            .await;
        memory
            .add_message("s1", Role::User, "Et le délai de livraison ?")
            .await;
        for i in 0..11 {
            memory
                .add_message("s1", Role::User, &format!("message {i}"))
                .await;
        }

        let messages = memory.get_messages("s1", 20).await;
        // Summary system message plus the 10 surviving raw messages
        assert_eq!(messages.len(), 11);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("tarifs"));
        assert!(messages[0].content.contains("délais"));
    }

    #[tokio::test]
    async fn compaction_without_known_topics_uses_placeholder() {
        let memory = ConversationMemory::new(12);
        for i in 0..13 {
            memory
                .add_message("s1", Role::User, &format!("message {i}"))
                .await;
        }

        let messages = memory.get_messages("s1", 20).await;
        assert!(messages[0].content.contains("divers sujets"));
    }

    #[tokio::test]
    async fn clear_drops_summary_too() {
        let memory = ConversationMemory::new(4);
        for i in 0..6 {
            memory
                .add_message("s1", Role::User, &format!("prix {i}"))
                .await;
        }
        memory.clear("s1").await;

        assert!(memory.get_messages("s1", 10).await.is_empty());
    }

    #[tokio::test]
    async fn empty_session_returns_no_messages() {
        let memory = ConversationMemory::new(20);
        assert!(memory.get_messages("nope", 10).await.is_empty());
    }
}
