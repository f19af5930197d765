//! Scripted gateway and in-memory recorder shared by the use case tests.

use crate::ports::conversation_recorder::{ConversationRecorder, RecorderError};
use crate::ports::llm_gateway::{CompletionRequest, GatewayError, LlmGateway};
use async_trait::async_trait;
use parallelai_domain::{
    CallerId, ConsensusResult, ConversationEntry, EntryId, ProviderConfig, ProviderRegistry,
};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake provider does on one call
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Reply(String),
    ReplyAfter(Duration, String),
    Fail(GatewayError),
    /// Never answers
    Hang,
}

pub(crate) fn reply(text: &str) -> Step {
    Step::Reply(text.to_string())
}

pub(crate) fn rate_limited() -> Step {
    Step::Fail(GatewayError::RequestFailed {
        status: 429,
        message: "rate_limit_exceeded".to_string(),
    })
}

/// Gateway whose answers are scripted per model.
///
/// Steps are consumed in order; the last step of a model repeats forever.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    scripts: Mutex<HashMap<String, VecDeque<Step>>>,
    calls: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGateway {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn script(self, model: &str, steps: Vec<Step>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(model.to_string(), steps.into());
        self
    }

    pub(crate) fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub(crate) fn calls_for(&self, model: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.model.as_str() == model)
            .count()
    }

    fn next_step(&self, model: &str) -> Step {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(model) {
            Some(steps) if steps.len() > 1 => steps.pop_front().unwrap(),
            Some(steps) => steps.front().cloned().unwrap_or(Step::Hang),
            None => Step::Fail(GatewayError::InvalidResponse(format!(
                "no script for {}",
                model
            ))),
        }
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        self.calls.lock().unwrap().push(request.clone());
        let step = self.next_step(request.model.as_str());
        match step {
            Step::Reply(text) => Ok(text),
            Step::ReplyAfter(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            Step::Fail(error) => Err(error),
            Step::Hang => std::future::pending::<Result<String, GatewayError>>().await,
        }
    }
}

pub(crate) fn registry(ids: &[&str]) -> Arc<ProviderRegistry> {
    let providers = ids
        .iter()
        .map(|id| ProviderConfig::new(*id, format!("key-{}", id), format!("preamble for {}", id)))
        .collect();
    Arc::new(ProviderRegistry::new(providers).unwrap())
}

/// Minimal recorder: one insertion-ordered list per caller.
#[derive(Default)]
pub(crate) struct MemoryRecorder {
    entries: Mutex<HashMap<CallerId, Vec<ConversationEntry>>>,
}

#[async_trait]
impl ConversationRecorder for MemoryRecorder {
    async fn record(
        &self,
        caller: &CallerId,
        entry: ConversationEntry,
    ) -> Result<EntryId, RecorderError> {
        let id = entry.id;
        self.entries
            .lock()
            .unwrap()
            .entry(caller.clone())
            .or_default()
            .push(entry);
        Ok(id)
    }

    async fn attach_consensus(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
        consensus: ConsensusResult,
    ) -> Result<(), RecorderError> {
        let mut entries = self.entries.lock().unwrap();
        let entry = entries
            .get_mut(caller)
            .and_then(|list| list.iter_mut().find(|e| e.id == entry_id))
            .ok_or(RecorderError::NotFound(entry_id))?;
        entry.consensus = Some(consensus);
        Ok(())
    }

    async fn find(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
    ) -> Result<Option<ConversationEntry>, RecorderError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(caller)
            .and_then(|list| list.iter().find(|e| e.id == entry_id).cloned()))
    }

    async fn history(&self, caller: &CallerId) -> Result<Vec<ConversationEntry>, RecorderError> {
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(caller)
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default())
    }
}
