//! # Webdesk Providers
//!
//! Concrete generation backends and the failover router. The primary
//! deployment talks to Anthropic's Messages API with Gemini (via its
//! OpenAI-compatible endpoint) as the fallback.

pub mod anthropic;
pub mod openai_compat;
pub mod router;

pub use anthropic::AnthropicProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::ProviderRouter;

use std::sync::Arc;
use std::time::Duration;
use webdesk_config::AppConfig;
use webdesk_core::error::{Error, Result};
use webdesk_core::provider::Provider;

/// Build the failover router from configuration.
///
/// The Anthropic provider is primary when configured; the
/// OpenAI-compatible provider is used as fallback, or as primary when
/// Anthropic is absent. No configured provider at all is a configuration
/// error: the service must refuse to serve chat requests.
pub fn build_router(config: &AppConfig) -> Result<Arc<dyn Provider>> {
    let timeout = Duration::from_secs(config.agent.provider_timeout_secs);

    let anthropic: Option<Arc<dyn Provider>> = match &config.anthropic.api_key {
        Some(key) => Some(Arc::new(AnthropicProvider::new(key.clone())?)),
        None => None,
    };

    let compat: Option<Arc<dyn Provider>> = match &config.openai_compat.api_key {
        Some(key) => {
            let mut provider = match &config.openai_compat.api_url {
                Some(url) => OpenAiCompatProvider::new("openai_compat", url.clone(), key.clone())?,
                None => OpenAiCompatProvider::gemini(key.clone())?,
            };
            if let Some(model) = &config.openai_compat.model {
                provider = provider.with_model_override(model.clone());
            }
            Some(Arc::new(provider))
        }
        None => None,
    };

    let router = match (anthropic, compat) {
        (Some(primary), Some(fallback)) => {
            ProviderRouter::new(primary, timeout).with_fallback(fallback)
        }
        (Some(primary), None) => ProviderRouter::new(primary, timeout),
        (None, Some(primary)) => ProviderRouter::new(primary, timeout),
        (None, None) => {
            return Err(Error::Config {
                message: "no generation provider configured; set ANTHROPIC_API_KEY or GEMINI_API_KEY".into(),
            });
        }
    };

    Ok(Arc::new(router))
}
