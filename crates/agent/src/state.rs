//! Pipeline state and outcome types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use webdesk_analysis::AnalysisResult;
use webdesk_core::message::SessionId;

/// Arbitrary caller-supplied context passed along with an invocation.
pub type ContextMap = HashMap<String, serde_json::Value>;

/// State threaded through the pipeline stages for one request.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub session_id: SessionId,

    /// The raw message as received
    pub original_input: String,

    /// The message after input-guardrail sanitization; later stages only
    /// see this
    pub input: String,

    /// Caller-supplied context (user id, channel, ...); opaque to the
    /// stages themselves
    pub context: ContextMap,

    pub analysis: Option<AnalysisResult>,

    /// Context block from knowledge retrieval, possibly empty
    pub retrieval_context: String,

    /// Formatted quote summary from the price tool, when stage 5 ran it
    pub tool_summary: Option<String>,

    pub should_escalate: bool,

    /// Observability notes (guardrail findings, ...)
    pub metadata: Vec<String>,
}

impl PipelineState {
    pub fn new(
        session_id: impl Into<String>,
        input: impl Into<String>,
        context: ContextMap,
    ) -> Self {
        let input = input.into();
        Self {
            session_id: SessionId(session_id.into()),
            original_input: input.clone(),
            input,
            context,
            analysis: None,
            retrieval_context: String::new(),
            tool_summary: None,
            should_escalate: false,
            metadata: Vec::new(),
        }
    }
}

/// How a stage left the pipeline.
///
/// `Done` short-circuits: the carried text is the final reply and no later
/// stage runs. Blocked input and escalation both end this way; neither is
/// an error.
#[derive(Debug, Clone)]
pub enum StageOutcome {
    Continue,
    Done(String),
}

/// Coarse agent status, for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Idle,
    Running,
    Error,
    Disabled,
}

/// The reply produced by a full pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReply {
    pub message: String,
    pub escalated: bool,
    pub blocked: bool,
}

/// The result shape of the invocation surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvokeOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    pub agent: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl InvokeOutcome {
    pub fn success(agent: &str, session_id: &str, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            agent: agent.to_string(),
            session_id: Some(session_id.to_string()),
            error: None,
        }
    }

    pub fn failure(agent: &str, error: String) -> Self {
        Self {
            success: false,
            message: None,
            agent: agent.to_string(),
            session_id: None,
            error: Some(error),
        }
    }
}
