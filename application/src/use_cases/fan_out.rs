//! Fan-Out use case
//!
//! Sends one question to every configured provider at once and collects
//! the results in registry order.

use super::invoke_model::ModelInvoker;
use crate::ports::conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, Phase, ProgressNotifier};
use futures::future::join_all;
use parallelai_domain::{FanOutResult, InvocationPolicy, ProviderRegistry, Question};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur during a fan-out
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FanOutError {
    #[error("No providers available: all {attempted} models failed to respond")]
    AllProvidersFailed { attempted: usize },
}

/// Use case answering "what do all configured models say about this?"
///
/// Every call is a fresh, independent dispatch; nothing is cached between
/// calls.
pub struct FanOutUseCase<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
    registry: Arc<ProviderRegistry>,
    policy: InvocationPolicy,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> FanOutUseCase<G> {
    pub fn new(invoker: ModelInvoker<G>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            invoker,
            registry,
            policy: InvocationPolicy::FAN_OUT,
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_policy(mut self, policy: InvocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute the use case with default (no-op) progress
    pub async fn execute(&self, question: &Question) -> Result<FanOutResult, FanOutError> {
        self.execute_with_progress(question, &NoProgress).await
    }

    /// Execute the use case with progress callbacks.
    ///
    /// All providers are in flight together; one slow or failing provider
    /// never delays or cancels the others. The result lists every provider
    /// in registry order, whatever order the answers arrived in.
    pub async fn execute_with_progress(
        &self,
        question: &Question,
        progress: &dyn ProgressNotifier,
    ) -> Result<FanOutResult, FanOutError> {
        let providers = self.registry.list_providers();
        info!("Fanning out to {} models", providers.len());
        progress.on_phase_start(&Phase::FanOut, providers.len());

        let calls = providers.iter().map(|provider| async move {
            let result = self
                .invoker
                .invoke(provider, question.content(), &self.policy)
                .await;
            progress.on_task_complete(&Phase::FanOut, &result.model, result.is_success());
            result
        });
        let results = join_all(calls).await;

        progress.on_phase_complete(&Phase::FanOut);

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        self.logger.log(ConversationEvent::new(
            "fan_out_complete",
            json!({
                "question": question.content(),
                "models": results.iter().map(|r| r.model.as_str()).collect::<Vec<_>>(),
                "succeeded": succeeded,
                "failed": results.len() - succeeded,
            }),
        ));

        let attempted = results.len();
        FanOutResult::from_results(results).map_err(|_| {
            error!("All {} models failed to respond", attempted);
            FanOutError::AllProvidersFailed { attempted }
        })
    }
}
