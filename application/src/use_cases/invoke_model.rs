//! Model Invoker
//!
//! Executes exactly one completion for one provider under an
//! [`InvocationPolicy`]: a hard per-attempt deadline, and bounded retries
//! with linear backoff when the provider reports a rate limit.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use parallelai_domain::{InvocationPolicy, InvocationResult, ProviderConfig};
use serde_json::json;
use std::sync::Arc;
use tokio::time::{Instant, sleep, timeout};
use tracing::{debug, warn};

/// Runs single provider calls with timeout and rate-limit retry.
///
/// Cheap to clone; clones share the gateway and transcript logger.
pub struct ModelInvoker<G: LlmGateway + 'static> {
    gateway: Arc<G>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: LlmGateway + 'static> Clone for ModelInvoker<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            logger: Arc::clone(&self.logger),
        }
    }
}

impl<G: LlmGateway + 'static> ModelInvoker<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            logger: Arc::new(NoConversationLogger),
        }
    }

    /// Record every settled call in a transcript
    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Ask one provider one question.
    ///
    /// Never fails: any error (timeout, exhausted retries, anything else)
    /// comes back as an error-status [`InvocationResult`].
    pub async fn invoke(
        &self,
        provider: &ProviderConfig,
        question: &str,
        policy: &InvocationPolicy,
    ) -> InvocationResult {
        let request =
            CompletionRequest::for_provider(provider, &provider.prompt_preamble, question, policy);

        match self.complete(&request, policy).await {
            Ok(answer) => InvocationResult::success(provider.model.clone(), answer),
            Err(e) => {
                warn!("Model {} failed: {}", provider.model, e);
                InvocationResult::failure(provider.model.clone(), e.to_string())
            }
        }
    }

    /// Send a prepared request, applying the policy's deadline and retries.
    ///
    /// A timed-out attempt ends the call at once; only rate-limit responses
    /// are retried, waiting `n * base_delay` before retry `n`.
    pub async fn complete(
        &self,
        request: &CompletionRequest,
        policy: &InvocationPolicy,
    ) -> Result<String, GatewayError> {
        let started = Instant::now();
        let mut retries = 0;

        let outcome = loop {
            self.logger.log(ConversationEvent::new(
                "invocation_attempt",
                json!({
                    "model": request.model.as_str(),
                    "attempt": retries + 1,
                    "max_tokens": request.max_tokens,
                    "temperature": request.temperature,
                }),
            ));

            let attempt = match timeout(policy.timeout, self.gateway.complete(request)).await {
                Ok(result) => result,
                Err(_) => Err(GatewayError::Timeout),
            };

            match attempt {
                Err(e) if e.is_rate_limited() && retries < policy.max_retries => {
                    retries += 1;
                    warn!(
                        "Rate limit hit for {}, retrying ({}/{})...",
                        request.model, retries, policy.max_retries
                    );
                    sleep(policy.backoff(retries)).await;
                }
                other => break other,
            }
        };

        debug!(
            "Model {} settled after {} attempt(s) in {:?}",
            request.model,
            retries + 1,
            started.elapsed()
        );

        self.logger.log(ConversationEvent::new(
            "invocation_result",
            json!({
                "model": request.model.as_str(),
                "success": outcome.is_ok(),
                "attempts": retries + 1,
                "elapsed_ms": started.elapsed().as_millis() as u64,
                "error": outcome.as_ref().err().map(|e| e.to_string()),
            }),
        ));

        outcome
    }
}
