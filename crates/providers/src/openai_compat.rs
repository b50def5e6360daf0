//! OpenAI-compatible chat-completions provider.
//!
//! Covers any backend exposing the `/chat/completions` shape with Bearer
//! authentication. The fallback deployment targets Gemini's OpenAI
//! compatibility endpoint.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use webdesk_core::error::ProviderError;
use webdesk_core::message::Role;
use webdesk_core::provider::{GenerationRequest, Provider};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";
const GEMINI_DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Provider for OpenAI-compatible chat completion APIs.
pub struct OpenAiCompatProvider {
    name: String,
    base_url: String,
    api_key: String,
    /// When set, replaces the model requested upstream. The failover
    /// target rarely serves the primary's model names.
    model_override: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_override: None,
            client,
        })
    }

    /// Gemini via its OpenAI-compatible endpoint.
    pub fn gemini(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Ok(Self::new("gemini", GEMINI_BASE_URL, api_key)?
            .with_model_override(GEMINI_DEFAULT_MODEL))
    }

    pub fn with_model_override(mut self, model: impl Into<String>) -> Self {
        self.model_override = Some(model.into());
        self
    }

    fn to_api_messages(request: &GenerationRequest) -> Vec<serde_json::Value> {
        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        for m in &request.messages {
            let role = match m.role {
                Role::User => "user",
                Role::Assistant => "assistant",
                Role::System => "system",
            };
            messages.push(serde_json::json!({"role": role, "content": m.content}));
        }

        messages
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let model = self
            .model_override
            .clone()
            .unwrap_or_else(|| request.model.clone());

        let body = serde_json::json!({
            "model": model,
            "messages": Self::to_api_messages(&request),
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
        });

        debug!(provider = %self.name, %model, "sending generation request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProviderError::Timeout(e.to_string())
                } else {
                    ProviderError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: 5,
            });
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(format!(
                "Invalid API key for provider '{}'",
                self.name
            )));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            warn!(provider = %self.name, status, body = %error_body, "API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::MalformedResponse(e.to_string()))?;

        api_resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::MalformedResponse("response contained no choices".into()))
    }
}
