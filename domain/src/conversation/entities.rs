//! Conversation history entities.

use crate::core::model::Model;
use crate::invocation::{ConsensusResult, FanOutResult, InvocationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a recorded exchange.
///
/// Handed back from every recorded fan-out so a later consensus can be
/// attached to exactly the entry it was computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for EntryId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// How the question was asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// One chosen model
    Single,
    /// Every configured model
    Multi,
}

impl ChatMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatMode::Single => "single",
            ChatMode::Multi => "multi",
        }
    }
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed exchange as stored in a caller's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: EntryId,
    pub question: String,
    pub mode: ChatMode,
    /// Set in single mode only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_model: Option<Model>,
    /// Fan-out results in registry order, or the lone single-mode result
    pub results: Vec<InvocationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus: Option<ConsensusResult>,
    pub created_at: DateTime<Utc>,
}

impl ConversationEntry {
    pub fn multi(question: impl Into<String>, results: &FanOutResult) -> Self {
        Self::multi_from_results(question, results.results().to_vec())
    }

    /// Multi-mode entry over results that did not come from a fresh fan-out
    /// (e.g. supplied by the caller for a follow-up consensus).
    pub fn multi_from_results(question: impl Into<String>, results: Vec<InvocationResult>) -> Self {
        Self {
            id: EntryId::new(),
            question: question.into(),
            mode: ChatMode::Multi,
            selected_model: None,
            results,
            consensus: None,
            created_at: Utc::now(),
        }
    }

    pub fn single(question: impl Into<String>, result: InvocationResult) -> Self {
        Self {
            id: EntryId::new(),
            question: question.into(),
            mode: ChatMode::Single,
            selected_model: Some(result.model.clone()),
            results: vec![result],
            consensus: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_consensus(mut self, consensus: ConsensusResult) -> Self {
        self.consensus = Some(consensus);
        self
    }

    /// Whether a follow-up consensus for `question` belongs on this entry.
    pub fn is_multi_for(&self, question: &str) -> bool {
        self.mode == ChatMode::Multi && self.question == question
    }
}
