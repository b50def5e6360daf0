//! The support pipeline: fixed stage sequence per request.
//!
//! 1. Input guardrail (blocked ⇒ templated reply, nothing else runs)
//! 2. Text analysis, results cached in short-term memory
//! 3. Escalation check (needs-human ⇒ templated reply, no generation)
//! 4. Knowledge retrieval
//! 5. Conditional price-tool dispatch
//! 6. Context assembly (history + augmented system prompt)
//! 7. Generation through the provider router, with a sentiment-adapted
//!    fallback reply when every provider is exhausted
//! 8. Output guardrail (advisory)
//! 9. Persist the reply into conversation memory
//!
//! Blocked input and escalation are normal terminal branches. Provider
//! exhaustion in stage 7 is absorbed: the user still gets an apology
//! with the agency's contact details, and that reply is persisted like
//! any other.

use crate::state::{ContextMap, PipelineReply, PipelineState, StageOutcome};
use crate::support;
use std::sync::Arc;
use tracing::{debug, info, warn};
use webdesk_analysis::{Intent, TextAnalyzer};
use webdesk_config::AppConfig;
use webdesk_core::error::Result;
use webdesk_core::message::Role;
use webdesk_core::provider::{GenerationRequest, Provider};
use webdesk_core::tool::ToolRegistry;
use webdesk_guardrails::{InputGuardrail, OutputGuardrail};
use webdesk_memory::{ConversationMemory, ShortTermMemory};
use webdesk_retrieval::Retriever;
use webdesk_tools::{DateTimeTool, PriceCalculatorTool};

/// How many raw history messages are sent to the provider.
const CONTEXT_WINDOW: usize = 6;

/// Short-term keys other stages and agents read.
pub const KEY_LAST_SENTIMENT: &str = "last_sentiment";
pub const KEY_LAST_INTENT: &str = "last_intent";

/// One configured support pipeline.
pub struct Pipeline {
    analyzer: TextAnalyzer,
    input_guard: InputGuardrail,
    output_guard: OutputGuardrail,
    retriever: Retriever,
    tools: ToolRegistry,
    short_term: ShortTermMemory,
    conversation: ConversationMemory,
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        let mut tools = ToolRegistry::new();
        tools.register(Box::new(PriceCalculatorTool));
        tools.register(Box::new(DateTimeTool));

        Self {
            analyzer: TextAnalyzer::new(),
            input_guard: InputGuardrail::new(),
            output_guard: OutputGuardrail::new(),
            retriever: Retriever::new(config.retrieval.top_k),
            tools,
            short_term: ShortTermMemory::new(config.memory.short_term_max),
            conversation: ConversationMemory::new(config.memory.conversation_max),
            provider,
            model: config.agent.model.clone(),
            temperature: config.agent.temperature,
            max_tokens: config.agent.max_tokens,
        }
    }

    /// Run all stages for one message and produce the reply.
    pub async fn run(
        &self,
        session_id: &str,
        message: &str,
        context: ContextMap,
    ) -> Result<PipelineReply> {
        let mut state = PipelineState::new(session_id, message, context);

        // Stage 1: input guardrail
        if let StageOutcome::Done(reply) = self.check_input(&mut state) {
            return Ok(PipelineReply {
                message: reply,
                escalated: false,
                blocked: true,
            });
        }

        // Stage 2: analysis over the sanitized input
        let analysis = self.analyzer.analyze(&state.input);
        self.short_term
            .store(
                session_id,
                KEY_LAST_SENTIMENT,
                serde_json::json!(analysis.sentiment),
                0.6,
            )
            .await;
        self.short_term
            .store(
                session_id,
                KEY_LAST_INTENT,
                serde_json::json!(analysis.intent),
                0.6,
            )
            .await;
        state.analysis = Some(analysis.clone());

        // Stage 3: escalation
        if let StageOutcome::Done(reply) = Self::check_escalation(&mut state, &analysis) {
            info!(%session_id, "escalating to human");
            return Ok(PipelineReply {
                message: reply,
                escalated: true,
                blocked: false,
            });
        }

        // Stage 4: knowledge retrieval
        let retrieval = self.retriever.retrieve(&state.input);
        state.retrieval_context = retrieval.context.clone();

        // Stage 5: conditional price-tool dispatch
        if analysis.intent == Intent::AskingPrice {
            state.tool_summary = self.quote_summary(&state.input).await;
        }

        // Stage 6: context assembly
        self.conversation
            .add_message(session_id, Role::User, &state.input)
            .await;
        let messages = self.conversation.get_messages(session_id, CONTEXT_WINDOW).await;

        let mut system_prompt = format!(
            "{}\n\n{}",
            support::MARIE_SYSTEM_PROMPT,
            support::sentiment_instruction(analysis.sentiment)
        );
        system_prompt = self.retriever.augment_prompt(&system_prompt, &retrieval);
        if let Some(summary) = &state.tool_summary {
            system_prompt = format!("{system_prompt}\n\n---\n{summary}");
        }

        // Stage 7: generation; exhaustion degrades to the fallback reply
        debug!(%session_id, intent = ?analysis.intent, "invoking generation");
        let reply = match self
            .provider
            .generate(GenerationRequest {
                model: self.model.clone(),
                messages,
                system_prompt,
                temperature: self.temperature,
                max_tokens: self.max_tokens,
            })
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(%session_id, error = %e, "generation exhausted, replying with fallback");
                support::fallback_response(analysis.sentiment)
            }
        };

        // Stage 8: output guardrail, advisory only
        let finding = self.output_guard.check(&reply);
        state.metadata.extend(finding.issues);

        // Stage 9: persist the reply
        self.conversation
            .add_message(session_id, Role::Assistant, &reply)
            .await;

        Ok(PipelineReply {
            message: reply,
            escalated: false,
            blocked: false,
        })
    }

    fn check_input(&self, state: &mut PipelineState) -> StageOutcome {
        let finding = self.input_guard.check(&state.original_input);
        state.metadata.extend(finding.issues.clone());

        if !finding.passed {
            warn!(session_id = %state.session_id, "input blocked");
            return StageOutcome::Done(support::blocked_response());
        }

        state.input = finding.sanitized;
        StageOutcome::Continue
    }

    fn check_escalation(
        state: &mut PipelineState,
        analysis: &webdesk_analysis::AnalysisResult,
    ) -> StageOutcome {
        if analysis.needs_human || support::wants_human(&state.input) {
            state.should_escalate = true;
            return StageOutcome::Done(support::escalation_response(analysis.sentiment));
        }

        StageOutcome::Continue
    }

    /// Run the price tool when a service type can be inferred; tool
    /// failures are skipped, never fatal.
    async fn quote_summary(&self, input: &str) -> Option<String> {
        let service = support::infer_service_type(input)?;

        let result = self
            .tools
            .execute(
                "price_calculator",
                serde_json::json!({"service_type": service}),
            )
            .await;

        match result {
            Ok(tool_result) => {
                let data = tool_result.data?;
                Some(format!(
                    "DEVIS INDICATIF (calculé par l'outil de tarification, à confirmer par devis officiel):\n\
                     Service: {}\nPrix de base: {}€\nTotal: {}€",
                    data["service_type"].as_str().unwrap_or(service),
                    data["base_price"],
                    data["total"]
                ))
            }
            Err(e) => {
                warn!(error = %e, "price tool failed, skipping its contribution");
                None
            }
        }
    }

    /// Read-only access to short-term memory (agents and tests).
    pub fn short_term(&self) -> &ShortTermMemory {
        &self.short_term
    }

    /// Read-only access to conversation memory (tests).
    pub fn conversation(&self) -> &ConversationMemory {
        &self.conversation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use webdesk_core::error::ProviderError;

    /// Records the last request and replies with a fixed message.
    struct RecordingProvider {
        reply: String,
        last_request: Mutex<Option<GenerationRequest>>,
    }

    impl RecordingProvider {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.into(),
                last_request: Mutex::new(None),
            })
        }

        fn last(&self) -> Option<GenerationRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Provider for RecordingProvider {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(
            &self,
            request: GenerationRequest,
        ) -> std::result::Result<String, ProviderError> {
            *self.last_request.lock().unwrap() = Some(request);
            Ok(self.reply.clone())
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
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    fn pipeline_with(provider: Arc<dyn Provider>) -> Pipeline {
        Pipeline::new(provider, &AppConfig::default())
    }

    #[tokio::test]
    async fn normal_flow_persists_both_sides() {
        let provider = RecordingProvider::new("Avec plaisir ! Que puis-je faire pour vous ?");
        let pipeline = pipeline_with(provider.clone());

        let reply = pipeline
            .run("s1", "Bonjour MARIE", ContextMap::new())
            .await
            .unwrap();
        assert!(!reply.blocked);
        assert!(!reply.escalated);
        assert_eq!(reply.message, "Avec plaisir ! Que puis-je faire pour vous ?");

        let history = pipeline.conversation().get_messages("s1", 10).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn blocked_input_never_reaches_the_provider() {
        let provider = RecordingProvider::new("ne devrait pas être appelé");
        let pipeline = pipeline_with(provider.clone());

        let reply = pipeline
            .run("s1", "je cherche une arme", ContextMap::new())
            .await
            .unwrap();
        assert!(reply.blocked);
        assert!(provider.last().is_none());
        // Nothing persisted for a blocked request
        assert!(pipeline.conversation().get_messages("s1", 10).await.is_empty());
    }

    #[tokio::test]
    async fn human_request_escalates_before_generation() {
        let provider = RecordingProvider::new("ne devrait pas être appelé");
        let pipeline = pipeline_with(provider.clone());

        let reply = pipeline
            .run("s1", "Je veux parler à un humain", ContextMap::new())
            .await
            .unwrap();
        assert!(reply.escalated);
        assert!(reply.message.contains("contact@webshop.fr"));
        assert!(provider.last().is_none());
    }

    #[tokio::test]
    async fn analysis_lands_in_short_term_memory() {
        let provider = RecordingProvider::new("Bonjour !");
        let pipeline = pipeline_with(provider.clone());

        pipeline
            .run("s1", "Quel est le prix d'un site vitrine ?", ContextMap::new())
            .await
            .unwrap();

        let intent = pipeline
            .short_term()
            .retrieve("s1", KEY_LAST_INTENT)
            .await
            .unwrap();
        assert_eq!(intent, serde_json::json!("asking_price"));
        assert!(pipeline
            .short_term()
            .retrieve("s1", KEY_LAST_SENTIMENT)
            .await
            .is_some());
    }

    #[tokio::test]
    async fn price_question_augments_prompt_with_quote_and_context() {
        let provider = RecordingProvider::new("Le site vitrine est à 299€.");
        let pipeline = pipeline_with(provider.clone());

        pipeline
            .run("s1", "Quel est le prix d'un site vitrine ?", ContextMap::new())
            .await
            .unwrap();

        let request = provider.last().unwrap();
        assert!(request.system_prompt.contains("Tu es MARIE"));
        assert!(request.system_prompt.contains("CONTEXTE SUPPLÉMENTAIRE"));
        assert!(request.system_prompt.contains("DEVIS INDICATIF"));
        assert!(request.system_prompt.contains("299"));
    }

    #[tokio::test]
    async fn unknown_service_keeps_pipeline_running() {
        let provider = RecordingProvider::new("Nos tarifs commencent à 299€.");
        let pipeline = pipeline_with(provider.clone());

        // Price intent without any service cue: stage 5 contributes nothing
        let reply = pipeline
            .run("s1", "Quels sont vos tarifs ?", ContextMap::new())
            .await
            .unwrap();
        assert!(!reply.blocked);

        let request = provider.last().unwrap();
        assert!(!request.system_prompt.contains("DEVIS INDICATIF"));
    }

    #[tokio::test]
    async fn pii_is_masked_before_generation() {
        let provider = RecordingProvider::new("Bien noté !");
        let pipeline = pipeline_with(provider.clone());

        pipeline
            .run(
                "s1",
                "Je voudrais un site, mon email est jean@example.fr",
                ContextMap::new(),
            )
            .await
            .unwrap();

        let request = provider.last().unwrap();
        let user_message = request
            .messages
            .iter()
            .find(|m| m.role == Role::User)
            .unwrap();
        assert!(user_message.content.contains("[EMAIL_HIDDEN]"));
        assert!(!user_message.content.contains("jean@example.fr"));
    }

    #[tokio::test]
    async fn provider_exhaustion_degrades_to_fallback_reply() {
        let pipeline = pipeline_with(Arc::new(FailingProvider));

        let reply = pipeline
            .run("s1", "Bonjour, une question", ContextMap::new())
            .await
            .unwrap();
        assert!(!reply.blocked);
        assert!(!reply.escalated);
        assert!(reply.message.contains("souci technique"));
        assert!(reply.message.contains("contact@webshop.fr"));

        // The fallback is persisted like any generated reply
        let history = pipeline.conversation().get_messages("s1", 10).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].role, Role::Assistant);
        assert!(history[1].content.contains("souci technique"));
    }

    #[tokio::test]
    async fn fallback_reply_adapts_to_negative_sentiment() {
        let pipeline = pipeline_with(Arc::new(FailingProvider));

        let reply = pipeline
            .run("s1", "Il y a un problème avec le site, c'est lent", ContextMap::new())
            .await
            .unwrap();
        assert!(reply.message.starts_with("Je suis sincèrement désolée"));
    }
}
