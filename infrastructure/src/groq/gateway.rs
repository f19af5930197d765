//! LLM Gateway implementation for Groq's OpenAI-compatible API

use super::protocol::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ErrorEnvelope, ResponseFormat,
};
use crate::config::FileGatewayConfig;
use async_trait::async_trait;
use parallelai_application::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use reqwest::{Client, StatusCode};
use secrecy::ExposeSecret;
use std::time::Duration;
use tracing::debug;

/// Gateway that sends each completion as one HTTPS request.
///
/// The underlying client pools connections and is shared by concurrent
/// calls; deadlines are applied by the caller, not here.
pub struct GroqGateway {
    client: Client,
    endpoint: String,
}

impl GroqGateway {
    pub fn new(config: &FileGatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LlmGateway for GroqGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: request.model.as_str(),
            messages: vec![
                ChatMessage::system(&request.system_prompt),
                ChatMessage::user(&request.user_prompt),
            ],
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            response_format: ResponseFormat::json_object(),
        };

        debug!("POST {} model={}", self.endpoint, request.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(request.credential.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else {
                    GatewayError::ConnectionError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = ErrorEnvelope::describe(&text);
            return Err(if status == StatusCode::TOO_MANY_REQUESTS {
                GatewayError::RateLimited(message)
            } else {
                GatewayError::RequestFailed {
                    status: status.as_u16(),
                    message,
                }
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;

        Ok(completion.into_answer())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use parallelai_application::ports::llm_gateway::CompletionRequest;
    use parallelai_domain::{InvocationPolicy, ProviderConfig};
    use serde_json::json;

    fn gateway(server: &mockito::ServerGuard) -> GroqGateway {
        GroqGateway::new(&FileGatewayConfig {
            base_url: format!("{}/", server.url()),
            connect_timeout_secs: 5,
        })
        .unwrap()
    }

    fn request() -> CompletionRequest {
        let provider = ProviderConfig::new("qwen/qwen3-32b", "secret-key".to_string(), "preamble");
        CompletionRequest::for_provider(&provider, "preamble", "What is 2+2?", &InvocationPolicy::FAN_OUT)
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer secret-key")
            .match_body(Matcher::PartialJson(json!({
                "model": "qwen/qwen3-32b",
                "max_tokens": 1000,
                "response_format": {"type": "json_object"},
                "messages": [
                    {"role": "system", "content": "preamble"},
                    {"role": "user", "content": "What is 2+2?"}
                ]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "choices": [{"message": {"role": "assistant", "content": "{\"short_ans\":\"4\"}"}}]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let answer = gateway(&server).complete(&request()).await.unwrap();

        assert_eq!(answer, r#"{"short_ans":"4"}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_choices_is_no_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices": []}"#)
            .create_async()
            .await;

        let answer = gateway(&server).complete(&request()).await.unwrap();
        assert_eq!(answer, "No response");
    }

    #[tokio::test]
    async fn test_429_is_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .with_body(r#"{"error":{"message":"Rate limit reached","code":"rate_limit_exceeded"}}"#)
            .create_async()
            .await;

        let err = gateway(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::RateLimited(_)));
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_rate_limit_marker_in_other_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(400)
            .with_body(r#"{"error":{"message":"try later","code":"rate_limit_exceeded"}}"#)
            .create_async()
            .await;

        let err = gateway(&server).complete(&request()).await.unwrap_err();
        assert_eq!(
            err,
            GatewayError::RequestFailed {
                status: 400,
                message: "try later (rate_limit_exceeded)".to_string(),
            }
        );
        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_server_error_not_retryable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;

        let err = gateway(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::RequestFailed { status: 500, .. }));
        assert!(!err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_malformed_body_is_invalid_response() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body("<html>")
            .create_async()
            .await;

        let err = gateway(&server).complete(&request()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let gateway = GroqGateway::new(&FileGatewayConfig::default()).unwrap();
        assert_eq!(
            gateway.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }
}
