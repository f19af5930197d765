//! Invocation value objects - immutable result types for one request.
//!
//! - [`InvocationResult`] - one model's answer (or failure)
//! - [`FanOutResult`] - every provider's result, in registry order
//! - [`ConsensusResult`] - the reconciled answer from the synthesis call

use crate::core::error::DomainError;
use crate::core::model::Model;
use serde::{Deserialize, Serialize};

/// Identifier reported for synthesized answers.
pub const CONSENSUS_MODEL_ID: &str = "consensus-engine";

/// Answer text carried by a failed consensus call.
pub const CONSENSUS_FALLBACK_TEXT: &str = "Failed to generate consensus due to a technical error.";

/// Answer text carried by a failed provider call.
pub const UNAVAILABLE_ANSWER_TEXT: &str = "Model unavailable";

/// Outcome of one model call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvocationStatus {
    Success,
    Error,
}

/// Result of one model call
///
/// `answer_text` is kept exactly as the provider returned it (normally a
/// JSON object encoded as text); the core never parses it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResult {
    /// The model that produced this result
    pub model: Model,
    /// Raw answer payload
    pub answer_text: String,
    pub status: InvocationStatus,
    /// Human-readable failure reason
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl InvocationResult {
    pub fn success(model: impl Into<Model>, answer_text: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            answer_text: answer_text.into(),
            status: InvocationStatus::Success,
            error_detail: None,
        }
    }

    pub fn failure(model: impl Into<Model>, error_detail: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            answer_text: UNAVAILABLE_ANSWER_TEXT.to_string(),
            status: InvocationStatus::Error,
            error_detail: Some(error_detail.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }
}

/// Every provider's result for one question, in registry order.
///
/// Can only be built from a list containing at least one success; an
/// all-error list is [`DomainError::AllProvidersFailed`] instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FanOutResult {
    results: Vec<InvocationResult>,
}

impl FanOutResult {
    pub fn from_results(results: Vec<InvocationResult>) -> Result<Self, DomainError> {
        if !results.iter().any(InvocationResult::is_success) {
            return Err(DomainError::AllProvidersFailed);
        }
        Ok(Self { results })
    }

    pub fn results(&self) -> &[InvocationResult] {
        &self.results
    }

    pub fn into_results(self) -> Vec<InvocationResult> {
        self.results
    }

    pub fn successful(&self) -> impl Iterator<Item = &InvocationResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &InvocationResult> {
        self.results.iter().filter(|r| !r.is_success())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Reconciled answer produced by the consensus synthesizer.
///
/// Shaped like an [`InvocationResult`] under the fixed id
/// [`CONSENSUS_MODEL_ID`]. A failed synthesis is still a value (status
/// error, fallback text) so callers can tell "not requested" (no value)
/// from "attempted and failed".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsensusResult(InvocationResult);

impl ConsensusResult {
    pub fn success(answer_text: impl Into<String>) -> Self {
        Self(InvocationResult::success(CONSENSUS_MODEL_ID, answer_text))
    }

    pub fn failure(error_detail: impl Into<String>) -> Self {
        Self(InvocationResult {
            model: Model::from(CONSENSUS_MODEL_ID),
            answer_text: CONSENSUS_FALLBACK_TEXT.to_string(),
            status: InvocationStatus::Error,
            error_detail: Some(error_detail.into()),
        })
    }

    pub fn as_result(&self) -> &InvocationResult {
        &self.0
    }

    pub fn answer_text(&self) -> &str {
        &self.0.answer_text
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.0.error_detail.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.0.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fan_out_requires_a_success() {
        let all_failed = vec![
            InvocationResult::failure("a", "boom"),
            InvocationResult::failure("b", "timeout"),
        ];
        assert_eq!(
            FanOutResult::from_results(all_failed).unwrap_err(),
            DomainError::AllProvidersFailed
        );
        assert_eq!(
            FanOutResult::from_results(vec![]).unwrap_err(),
            DomainError::AllProvidersFailed
        );
    }

    #[test]
    fn test_fan_out_partial_success() {
        let result = FanOutResult::from_results(vec![
            InvocationResult::failure("a", "boom"),
            InvocationResult::success("b", "{\"short_ans\":\"4\"}"),
        ])
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result.successful().count(), 1);
        assert_eq!(result.failed().next().unwrap().model.as_str(), "a");
    }

    #[test]
    fn test_failure_carries_detail() {
        let r = InvocationResult::failure("a", "Request timed out");
        assert!(!r.is_success());
        assert_eq!(r.answer_text, UNAVAILABLE_ANSWER_TEXT);
        assert_eq!(r.error_detail.as_deref(), Some("Request timed out"));
    }

    #[test]
    fn test_consensus_failure_is_reportable() {
        let c = ConsensusResult::failure("rate limited");
        assert!(!c.is_success());
        assert_eq!(c.answer_text(), CONSENSUS_FALLBACK_TEXT);
        assert_eq!(c.as_result().model.as_str(), CONSENSUS_MODEL_ID);
        assert_eq!(c.error_detail(), Some("rate limited"));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(InvocationResult::success("qwen/qwen3-32b", "{}")).unwrap();
        assert_eq!(json["model"], "qwen/qwen3-32b");
        assert_eq!(json["status"], "success");
        assert!(json.get("error_detail").is_none());

        let consensus = serde_json::to_value(ConsensusResult::success("{}")).unwrap();
        assert_eq!(consensus["model"], CONSENSUS_MODEL_ID);
    }
}
