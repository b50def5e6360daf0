//! Provider trait: the abstraction over text-generation backends.
//!
//! A Provider knows how to send a conversation plus a system prompt to a
//! language model and get text back, or fail with a `ProviderError`. The
//! pipeline never sees which backend answered; failover between a primary
//! and a fallback provider is handled by the router in `webdesk-providers`.

use crate::error::ProviderError;
use crate::message::ChatMessage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A request to the generation provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// The model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,

    /// The conversation messages, in order
    pub messages: Vec<ChatMessage>,

    /// The (possibly augmented) system prompt
    pub system_prompt: String,

    /// Temperature (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    512
}

/// The core Provider trait.
///
/// Every generation backend implements this trait. The pipeline calls
/// `generate()` without knowing which provider is being used.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "anthropic").
    fn name(&self) -> &str;

    /// Send a request and get the generated text back.
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, ProviderError>;
}

impl std::fmt::Debug for dyn Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider").field("name", &self.name()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_apply_on_deserialize() {
        let req: GenerationRequest = serde_json::from_str(
            r#"{"model": "test-model", "messages": [], "system_prompt": "Tu es MARIE."}"#,
        )
        .unwrap();
        assert!((req.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(req.max_tokens, 512);
    }

    #[test]
    fn request_serialization() {
        let req = GenerationRequest {
            model: "test-model".into(),
            messages: vec![ChatMessage::user("Bonjour")],
            system_prompt: "Tu es MARIE.".into(),
            temperature: 0.7,
            max_tokens: 500,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("Bonjour"));
        assert!(json.contains("MARIE"));
    }
}
