//! Provider failover: primary first, then exactly one fallback.
//!
//! Each attempt runs under its own timeout. If both providers fail the
//! generation stage fails; there are no further retries and no partial
//! results.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use webdesk_core::error::ProviderError;
use webdesk_core::provider::{GenerationRequest, Provider};

/// A provider wrapping a primary and an optional fallback.
pub struct ProviderRouter {
    primary: Arc<dyn Provider>,
    fallback: Option<Arc<dyn Provider>>,
    timeout: Duration,
}

impl ProviderRouter {
    pub fn new(primary: Arc<dyn Provider>, timeout: Duration) -> Self {
        Self {
            primary,
            fallback: None,
            timeout,
        }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn Provider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    async fn attempt(
        &self,
        provider: &Arc<dyn Provider>,
        request: GenerationRequest,
    ) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.timeout, provider.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "provider '{}' timed out after {}s",
                provider.name(),
                self.timeout.as_secs()
            ))),
        }
    }
}

#[async_trait]
impl Provider for ProviderRouter {
    fn name(&self) -> &str {
        "router"
    }

    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> std::result::Result<String, ProviderError> {
        match self.attempt(&self.primary, request.clone()).await {
            Ok(text) => Ok(text),
            Err(primary_err) => {
                warn!(
                    provider = %self.primary.name(),
                    error = %primary_err,
                    "primary provider failed"
                );

                let Some(fallback) = &self.fallback else {
                    return Err(primary_err);
                };

                info!(provider = %fallback.name(), "trying fallback provider");
                match self.attempt(fallback, request).await {
                    Ok(text) => Ok(text),
                    Err(fallback_err) => {
                        warn!(
                            provider = %fallback.name(),
                            error = %fallback_err,
                            "fallback provider failed, generation exhausted"
                        );
                        Err(fallback_err)
                    }
                }
            }
        }
    }
}
