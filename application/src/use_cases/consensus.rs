//! Consensus Synthesizer use case
//!
//! Asks the primary provider to reconcile the successful answers of a
//! fan-out into one answer.

use super::invoke_model::ModelInvoker;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::{CompletionRequest, LlmGateway};
use crate::ports::progress::{NoProgress, Phase, ProgressNotifier};
use parallelai_domain::{
    ConsensusResult, DEFAULT_ANSWER_BUDGET, InvocationPolicy, InvocationResult, PromptTemplate,
    ProviderRegistry,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info};

/// Detail reported when there is nothing to reconcile.
pub const NOTHING_TO_RECONCILE: &str = "No successful answers to reconcile";

/// Use case producing one reconciled answer from many.
///
/// Failure is always soft: the result carries status error and a fixed
/// fallback text, never an `Err`.
pub struct ConsensusUseCase<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
    registry: Arc<ProviderRegistry>,
    policy: InvocationPolicy,
    answer_budget: usize,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> ConsensusUseCase<G> {
    pub fn new(invoker: ModelInvoker<G>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            invoker,
            registry,
            policy: InvocationPolicy::CONSENSUS,
            answer_budget: DEFAULT_ANSWER_BUDGET,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: InvocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Characters of each answer embedded in the synthesis prompt
    pub fn with_answer_budget(mut self, chars: usize) -> Self {
        self.answer_budget = chars;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub async fn synthesize(&self, question: &str, results: &[InvocationResult]) -> ConsensusResult {
        self.synthesize_with_progress(question, results, &NoProgress)
            .await
    }

    /// Issue exactly one synthesis call over the successful `results`.
    ///
    /// Failed results are left out of the prompt. With no successful result
    /// at all, no call is made and a failed consensus is returned.
    pub async fn synthesize_with_progress(
        &self,
        question: &str,
        results: &[InvocationResult],
        progress: &dyn ProgressNotifier,
    ) -> ConsensusResult {
        let primary = self.registry.primary();

        let usable = results.iter().filter(|r| r.is_success()).count();
        if usable == 0 {
            error!("Consensus requested without any successful answer");
            return ConsensusResult::failure(NOTHING_TO_RECONCILE);
        }

        info!("Synthesizing consensus from {} answers with {}", usable, primary.model);
        progress.on_phase_start(&Phase::Consensus, 1);

        let prompt = PromptTemplate::consensus_prompt(question, results, self.answer_budget);
        let request = CompletionRequest::for_provider(
            primary,
            PromptTemplate::consensus_system(),
            prompt,
            &self.policy,
        );

        let consensus = match self.invoker.complete(&request, &self.policy).await {
            Ok(answer) => ConsensusResult::success(answer),
            Err(e) => {
                error!("Consensus generation error: {}", e);
                ConsensusResult::failure(e.to_string())
            }
        };

        progress.on_task_complete(&Phase::Consensus, &primary.model, consensus.is_success());
        progress.on_phase_complete(&Phase::Consensus);

        self.logger.log(ConversationEvent::new(
            "consensus_result",
            json!({
                "question": question,
                "synthesizer": primary.model.as_str(),
                "inputs": usable,
                "success": consensus.is_success(),
                "error": consensus.error_detail(),
            }),
        ));

        consensus
    }
}
