//! In-process history store.
//!
//! Used when `[history] persist = false`; everything is gone when the
//! process exits.

use async_trait::async_trait;
use parallelai_application::ports::conversation_recorder::{ConversationRecorder, RecorderError};
use parallelai_domain::{CallerId, ConsensusResult, ConversationEntry, EntryId, InvocationResult};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-lifetime history store
#[derive(Default)]
pub struct InMemoryConversationStore {
    entries: RwLock<HashMap<CallerId, Vec<ConversationEntry>>>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRecorder for InMemoryConversationStore {
    async fn record(
        &self,
        caller: &CallerId,
        entry: ConversationEntry,
    ) -> Result<EntryId, RecorderError> {
        let id = entry.id;
        self.entries
            .write()
            .await
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
        let mut entries = self.entries.write().await;
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
            .read()
            .await
            .get(caller)
            .and_then(|list| list.iter().find(|e| e.id == entry_id).cloned()))
    }

    async fn history(&self, caller: &CallerId) -> Result<Vec<ConversationEntry>, RecorderError> {
        Ok(self
            .entries
            .read()
            .await
            .get(caller)
            .map(|list| list.iter().rev().cloned().collect())
            .unwrap_or_default())
    }

    async fn attach_consensus_to_latest(
        &self,
        caller: &CallerId,
        question: &str,
        results: Vec<InvocationResult>,
        consensus: ConsensusResult,
    ) -> Result<EntryId, RecorderError> {
        let mut entries = self.entries.write().await;
        let list = entries.entry(caller.clone()).or_default();

        if let Some(latest) = list.last_mut()
            && latest.is_multi_for(question)
        {
            latest.consensus = Some(consensus);
            return Ok(latest.id);
        }

        let entry =
            ConversationEntry::multi_from_results(question, results).with_consensus(consensus);
        let id = entry.id;
        list.push(entry);
        Ok(id)
    }
}
