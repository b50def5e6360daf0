//! Agent registry: a closed set of agent kinds with coarse status.
//!
//! Unknown agent identifiers route to the support agent rather than
//! failing; the surrounding service treats the support pipeline as the
//! default destination.

use crate::state::AgentStatus;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// The agents this service can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentKind {
    /// MARIE, the customer-support agent
    Support,
}

impl AgentKind {
    /// Resolve an external identifier; anything unrecognized is support.
    pub fn from_id(id: &str) -> Self {
        match id.to_lowercase().as_str() {
            "marie" | "support" => AgentKind::Support,
            _ => AgentKind::Support,
        }
    }

    /// The agent's public name.
    pub fn name(&self) -> &'static str {
        match self {
            AgentKind::Support => "MARIE",
        }
    }

    pub fn role(&self) -> &'static str {
        match self {
            AgentKind::Support => "Support Chatbot",
        }
    }
}

/// Tracks per-agent status for observability.
pub struct AgentRegistry {
    statuses: RwLock<HashMap<AgentKind, AgentStatus>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        let mut statuses = HashMap::new();
        statuses.insert(AgentKind::Support, AgentStatus::Idle);
        Self {
            statuses: RwLock::new(statuses),
        }
    }

    pub async fn status(&self, kind: AgentKind) -> AgentStatus {
        let statuses = self.statuses.read().await;
        statuses.get(&kind).copied().unwrap_or(AgentStatus::Disabled)
    }

    pub async fn set_status(&self, kind: AgentKind, status: AgentStatus) {
        let mut statuses = self.statuses.write().await;
        statuses.insert(kind, status);
        tracing::debug!(agent = kind.name(), ?status, "agent status updated");
    }

    /// (name, role, status) for every registered agent.
    pub async fn list(&self) -> Vec<(&'static str, &'static str, AgentStatus)> {
        let statuses = self.statuses.read().await;
        statuses
            .iter()
            .map(|(kind, status)| (kind.name(), kind.role(), *status))
            .collect()
    }
}

impl Default for AgentRegistry {
    fn default() -> Self {
        Self::new()
    }
}
