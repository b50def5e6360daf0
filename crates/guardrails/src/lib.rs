//! # Webdesk Guardrails
//!
//! Two independent safety checks with no shared state:
//!
//! - [`input::InputGuardrail`] runs before anything else in the pipeline.
//!   It can block a request outright (disallowed content), or pass it with
//!   a warning and PII masked out.
//! - [`output::OutputGuardrail`] inspects generated replies. It is advisory
//!   only: findings are recorded for observability but never withhold the
//!   response.

pub mod input;
pub mod output;

pub use input::InputGuardrail;
pub use output::OutputGuardrail;

use serde::{Deserialize, Serialize};

/// Severity of a safety finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Warning,
    Blocked,
}

/// The outcome of one guardrail check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyFinding {
    pub level: SafetyLevel,

    /// Whether the text may proceed (`level != Blocked`)
    pub passed: bool,

    /// Human-readable issue labels, for logs and metadata
    pub issues: Vec<String>,

    /// The text after PII masking; identical to the input unless the
    /// finding is a warning with PII present
    pub sanitized: String,
}

impl SafetyFinding {
    /// A clean pass-through finding.
    pub fn safe(text: &str) -> Self {
        Self {
            level: SafetyLevel::Safe,
            passed: true,
            issues: Vec::new(),
            sanitized: text.to_string(),
        }
    }
}
