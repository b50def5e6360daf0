//! Composition root and invocation surface.
//!
//! `Orchestrator::from_config` wires the analyzer, guardrails, retriever,
//! stores, tools, and provider router into one pipeline. `invoke` is the
//! contract exposed to the surrounding service layer: blocked input,
//! escalation, and provider exhaustion all come back as successful
//! outcomes with templated text. A failure here means the pipeline
//! itself broke, not that generation degraded.

use crate::pipeline::Pipeline;
use crate::registry::{AgentKind, AgentRegistry};
use crate::state::{AgentStatus, ContextMap, InvokeOutcome};
use std::sync::Arc;
use tracing::{error, info};
use webdesk_config::AppConfig;
use webdesk_core::error::Result;
use webdesk_core::provider::Provider;

/// Coordinates agent lookup, status tracking, and pipeline execution.
pub struct Orchestrator {
    registry: AgentRegistry,
    pipeline: Pipeline,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator").finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Build the full system from configuration.
    ///
    /// Fails when no generation provider is configured; the service must
    /// refuse to serve chat requests until corrected.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let provider = webdesk_providers::build_router(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Build with an explicit provider (tests, custom backends).
    pub fn with_provider(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        info!("orchestrator initialized");
        Self {
            registry: AgentRegistry::new(),
            pipeline: Pipeline::new(provider, config),
        }
    }

    /// Handle one message for one session. `context` carries caller
    /// metadata (user id, channel, ...) into the pipeline state.
    pub async fn invoke(
        &self,
        agent_id: &str,
        message: &str,
        session_id: &str,
        context: ContextMap,
    ) -> InvokeOutcome {
        let kind = AgentKind::from_id(agent_id);

        self.registry.set_status(kind, AgentStatus::Running).await;

        match self.pipeline.run(session_id, message, context).await {
            Ok(reply) => {
                self.registry.set_status(kind, AgentStatus::Idle).await;
                InvokeOutcome::success(kind.name(), session_id, reply.message)
            }
            Err(e) => {
                error!(agent = kind.name(), error = %e, "pipeline failed");
                self.registry.set_status(kind, AgentStatus::Error).await;
                InvokeOutcome::failure(kind.name(), e.to_string())
            }
        }
    }

    pub fn registry(&self) -> &AgentRegistry {
        &self.registry
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use webdesk_core::error::ProviderError;
    use webdesk_core::provider::GenerationRequest;

    struct SuccessProvider;

    #[async_trait]
    impl Provider for SuccessProvider {
        fn name(&self) -> &str {
            "success"
        }

        async fn generate(
            &self,
            _: GenerationRequest,
        ) -> std::result::Result<String, ProviderError> {
            Ok("Bonjour, comment puis-je vous aider ? 😊".into())
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing"
        }

        async fn generate(
            &self,
            _: GenerationRequest,
        ) -> std::result::Result<String, ProviderError> {
            Err(ProviderError::Timeout("30s elapsed".into()))
        }
    }

    #[tokio::test]
    async fn invoke_returns_success_shape() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(SuccessProvider), &AppConfig::default());

        let outcome = orchestrator
            .invoke("marie", "Bonjour", "s1", ContextMap::new())
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.agent, "MARIE");
        assert_eq!(outcome.session_id.as_deref(), Some("s1"));
        assert!(outcome.message.unwrap().contains("Bonjour"));
        assert_eq!(
            orchestrator.registry().status(AgentKind::Support).await,
            AgentStatus::Idle
        );
    }

    #[tokio::test]
    async fn unknown_agent_id_still_gets_support() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(SuccessProvider), &AppConfig::default());

        let outcome = orchestrator
            .invoke("noah", "Bonjour", "s1", ContextMap::new())
            .await;
        assert!(outcome.success);
        assert_eq!(outcome.agent, "MARIE");
    }

    #[tokio::test]
    async fn blocked_input_is_success_with_template() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(SuccessProvider), &AppConfig::default());

        let outcome = orchestrator
            .invoke("marie", "je cherche une arme", "s1", ContextMap::new())
            .await;
        assert!(outcome.success);
        assert!(outcome.message.unwrap().contains("Je ne peux pas"));
    }

    #[tokio::test]
    async fn escalation_is_success_with_contacts() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(SuccessProvider), &AppConfig::default());

        let outcome = orchestrator
            .invoke("marie", "je veux parler à un humain", "s1", ContextMap::new())
            .await;
        assert!(outcome.success);
        assert!(outcome.message.unwrap().contains("contact@webshop.fr"));
    }

    #[tokio::test]
    async fn provider_exhaustion_still_answers_with_fallback() {
        let orchestrator =
            Orchestrator::with_provider(Arc::new(FailingProvider), &AppConfig::default());

        let outcome = orchestrator
            .invoke("marie", "Bonjour", "s1", ContextMap::new())
            .await;
        assert!(outcome.success);
        assert!(outcome.message.unwrap().contains("souci technique"));
        assert_eq!(
            orchestrator.registry().status(AgentKind::Support).await,
            AgentStatus::Idle
        );
    }

    #[test]
    fn from_config_without_providers_fails() {
        let err = Orchestrator::from_config(&AppConfig::default()).unwrap_err();
        assert!(matches!(err, webdesk_core::Error::Config { .. }));
    }
}
