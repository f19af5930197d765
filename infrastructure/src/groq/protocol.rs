//! OpenAI-compatible chat completion wire types

use serde::{Deserialize, Serialize};

/// Answer text when the provider returns no message content
pub const EMPTY_CONTENT_TEXT: &str = "No response";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

impl<'a> ChatMessage<'a> {
    pub fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    pub fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            kind: "json_object",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, or [`EMPTY_CONTENT_TEXT`] when there is none
    pub fn into_answer(self) -> String {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .unwrap_or_else(|| EMPTY_CONTENT_TEXT.to_string())
    }
}

/// Error envelope: `{"error": {"message": ..., "code": ...}}`
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
    pub code: Option<String>,
}

impl ErrorEnvelope {
    /// Human-readable detail for an error body, keeping the provider's
    /// error code when present.
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => match envelope.error.code {
                Some(code) => format!("{} ({})", envelope.error.message, code),
                None => envelope.error.message,
            },
            Err(_) => body.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_shape() {
        let request = ChatCompletionRequest {
            model: "qwen/qwen3-32b",
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("q?")],
            max_tokens: 1000,
            temperature: 0.2,
            response_format: ResponseFormat::json_object(),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(value["messages"][1]["role"], "user");
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
    }

    #[test]
    fn test_missing_content_becomes_no_response() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.into_answer(), EMPTY_CONTENT_TEXT);

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(null.into_answer(), EMPTY_CONTENT_TEXT);
    }

    #[test]
    fn test_describe_error_body() {
        let body = r#"{"error":{"message":"Slow down","type":"tokens","code":"rate_limit_exceeded"}}"#;
        assert_eq!(
            ErrorEnvelope::describe(body),
            "Slow down (rate_limit_exceeded)"
        );
        assert_eq!(ErrorEnvelope::describe(" upstream down \n"), "upstream down");
    }
}
