//! LLM Gateway port
//!
//! Defines the interface for sending one completion request to a provider.

use async_trait::async_trait;
use parallelai_domain::{InvocationPolicy, Model, ProviderConfig};
use secrecy::SecretString;
use thiserror::Error;

/// Marker some providers put in the error body instead of (or as well as)
/// answering with HTTP 429.
pub const RATE_LIMIT_MARKER: &str = "rate_limit_exceeded";

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),
}

impl GatewayError {
    /// Whether the provider asked us to slow down and try again later.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            GatewayError::RateLimited(_) => true,
            GatewayError::RequestFailed { status, message } => {
                *status == 429 || message.contains(RATE_LIMIT_MARKER)
            }
            GatewayError::ConnectionError(message) | GatewayError::InvalidResponse(message) => {
                message.contains(RATE_LIMIT_MARKER)
            }
            GatewayError::Timeout => false,
        }
    }
}

/// One chat completion, fully resolved for a single provider.
///
/// Built per call from the provider's own configuration, so concurrent
/// calls never share request state.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: Model,
    pub credential: SecretString,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn for_provider(
        provider: &ProviderConfig,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        policy: &InvocationPolicy,
    ) -> Self {
        Self {
            model: provider.model.clone(),
            credential: provider.credential.clone(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            max_tokens: provider.effective_max_tokens(policy.max_tokens),
            temperature: policy.temperature.unwrap_or(provider.temperature),
        }
    }
}

/// Gateway for LLM communication
///
/// This port defines how the application layer talks to model providers.
/// Implementations (adapters) live in the infrastructure layer. A gateway
/// performs exactly one network attempt per call; timeouts and retries are
/// the invoker's job.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Send the request and return the raw answer text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_detection() {
        assert!(GatewayError::RateLimited("slow down".into()).is_rate_limited());
        assert!(
            GatewayError::RequestFailed {
                status: 429,
                message: String::new()
            }
            .is_rate_limited()
        );
        assert!(
            GatewayError::RequestFailed {
                status: 400,
                message: "error code: rate_limit_exceeded".into()
            }
            .is_rate_limited()
        );
        assert!(
            !GatewayError::RequestFailed {
                status: 500,
                message: "internal".into()
            }
            .is_rate_limited()
        );
        assert!(!GatewayError::Timeout.is_rate_limited());
    }

    #[test]
    fn test_request_for_provider() {
        let provider = ProviderConfig::new("qwen/qwen3-32b", "key".to_string(), "Return ONLY JSON")
            .with_token_budget(1200);

        let request =
            CompletionRequest::for_provider(&provider, "sys", "q?", &InvocationPolicy::SINGLE);
        assert_eq!(request.model, Model::Qwen3);
        assert_eq!(request.max_tokens, 1200);
        assert_eq!(request.temperature, provider.temperature);

        let request =
            CompletionRequest::for_provider(&provider, "sys", "q?", &InvocationPolicy::CONSENSUS);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 1200);
    }
}
