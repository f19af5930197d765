//! Ask Model use case
//!
//! Single-model mode: one chosen provider, a longer deadline and a larger
//! token request than the fan-out path.

use super::invoke_model::ModelInvoker;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, Phase, ProgressNotifier};
use parallelai_domain::{InvocationPolicy, InvocationResult, Model, ProviderRegistry, Question};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AskError {
    #[error("Invalid model specified: {0}")]
    UnknownModel(String),

    #[error("Model {model} failed: {detail}")]
    ModelFailed { model: String, detail: String },
}

/// Input for the AskModel use case
#[derive(Debug, Clone)]
pub struct AskModelInput {
    pub model: Model,
    pub question: Question,
    /// Overrides the policy's token request
    pub max_tokens: Option<u32>,
}

impl AskModelInput {
    pub fn new(model: impl Into<Model>, question: Question) -> Self {
        Self {
            model: model.into(),
            question,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

pub struct AskModelUseCase<G: LlmGateway + 'static> {
    invoker: ModelInvoker<G>,
    registry: Arc<ProviderRegistry>,
    policy: InvocationPolicy,
}

impl<G: LlmGateway + 'static> AskModelUseCase<G> {
    pub fn new(invoker: ModelInvoker<G>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            invoker,
            registry,
            policy: InvocationPolicy::SINGLE,
        }
    }

    pub fn with_policy(mut self, policy: InvocationPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn execute(&self, input: AskModelInput) -> Result<InvocationResult, AskError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    /// Ask the selected model.
    ///
    /// The model must be in the registry. With only one provider involved,
    /// its failure is the request's failure.
    pub async fn execute_with_progress(
        &self,
        input: AskModelInput,
        progress: &dyn ProgressNotifier,
    ) -> Result<InvocationResult, AskError> {
        let provider = self
            .registry
            .find_provider(&input.model)
            .map_err(|_| AskError::UnknownModel(input.model.to_string()))?;

        let policy = match input.max_tokens {
            Some(max_tokens) => self.policy.with_max_tokens(max_tokens),
            None => self.policy,
        };

        info!("Asking {} (max {} tokens)", provider.model, policy.max_tokens);
        progress.on_phase_start(&Phase::Single, 1);

        let result = self
            .invoker
            .invoke(provider, input.question.content(), &policy)
            .await;

        progress.on_task_complete(&Phase::Single, &result.model, result.is_success());
        progress.on_phase_complete(&Phase::Single);

        if result.is_success() {
            Ok(result)
        } else {
            Err(AskError::ModelFailed {
                model: result.model.to_string(),
                detail: result.error_detail.unwrap_or_default(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::testing::{ScriptedGateway, Step, registry, reply};
    use std::time::Duration;
    use tokio::time::Instant;

    fn use_case(gateway: &Arc<ScriptedGateway>) -> AskModelUseCase<ScriptedGateway> {
        AskModelUseCase::new(ModelInvoker::new(Arc::clone(gateway)), registry(&["a", "b"]))
    }

    fn question() -> Question {
        Question::parse("q?").unwrap()
    }

    #[tokio::test]
    async fn test_asks_only_the_selected_model() {
        let gateway = Arc::new(
            ScriptedGateway::new()
                .script("a", vec![reply("A")])
                .script("b", vec![reply("B")]),
        );

        let result = use_case(&gateway)
            .execute(AskModelInput::new("b", question()))
            .await
            .unwrap();

        assert_eq!(result.answer_text, "B");
        assert_eq!(gateway.call_count(), 1);
        assert_eq!(gateway.calls()[0].max_tokens, 4000);
    }

    #[tokio::test]
    async fn test_max_tokens_override() {
        let gateway = Arc::new(ScriptedGateway::new().script("a", vec![reply("A")]));

        use_case(&gateway)
            .execute(AskModelInput::new("a", question()).with_max_tokens(5000))
            .await
            .unwrap();

        assert_eq!(gateway.calls()[0].max_tokens, 5000);
    }

    #[tokio::test]
    async fn test_unknown_model() {
        let gateway = Arc::new(ScriptedGateway::new());

        let err = use_case(&gateway)
            .execute(AskModelInput::new("gpt-9", question()))
            .await
            .unwrap_err();

        assert_eq!(err, AskError::UnknownModel("gpt-9".to_string()));
        assert_eq!(gateway.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_path_uses_longer_deadline() {
        let gateway = Arc::new(ScriptedGateway::new().script(
            "a",
            vec![Step::ReplyAfter(Duration::from_secs(20), "late but fine".into())],
        ));

        let result = use_case(&gateway)
            .execute(AskModelInput::new("a", question()))
            .await
            .unwrap();
        assert_eq!(result.answer_text, "late but fine");

        let gateway = Arc::new(ScriptedGateway::new().script("a", vec![Step::Hang]));
        let started = Instant::now();
        let err = use_case(&gateway)
            .execute(AskModelInput::new("a", question()))
            .await
            .unwrap_err();
        assert!(matches!(err, AskError::ModelFailed { .. }));
        assert!(started.elapsed() < Duration::from_secs(31));
    }

    #[tokio::test]
    async fn test_failure_surfaces() {
        let gateway = Arc::new(ScriptedGateway::new().script(
            "a",
            vec![Step::Fail(GatewayError::InvalidResponse("no choices".into()))],
        ));

        let err = use_case(&gateway)
            .execute(AskModelInput::new("a", question()))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AskError::ModelFailed {
                model: "a".to_string(),
                detail: "Invalid response: no choices".to_string(),
            }
        );
    }
}
