//! # Webdesk Agent
//!
//! The support-agent pipeline and its invocation surface. The crate wires
//! everything the rest of the workspace provides: text analysis,
//! guardrails, retrieval, the price tool, the memory layers, and the
//! provider router, behind a single `Orchestrator::invoke` entry point.

pub mod orchestrator;
pub mod pipeline;
pub mod registry;
pub mod state;
pub mod support;

pub use orchestrator::Orchestrator;
pub use pipeline::Pipeline;
pub use registry::{AgentKind, AgentRegistry};
pub use state::{AgentStatus, InvokeOutcome, PipelineReply, PipelineState, StageOutcome};
