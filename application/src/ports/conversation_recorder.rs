//! Conversation Recorder port
//!
//! Persistence of completed exchanges, keyed by caller identity. The core
//! writes through this port and reads history back; storage details belong
//! to the adapters.

use async_trait::async_trait;
use parallelai_domain::{CallerId, ConsensusResult, ConversationEntry, EntryId, InvocationResult};
use thiserror::Error;

/// Errors raised by recorder adapters
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Conversation entry not found: {0}")]
    NotFound(EntryId),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[async_trait]
pub trait ConversationRecorder: Send + Sync {
    /// Append an entry to the caller's history
    async fn record(&self, caller: &CallerId, entry: ConversationEntry)
    -> Result<EntryId, RecorderError>;

    /// Attach (or replace) the consensus of a specific entry, in place
    async fn attach_consensus(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
        consensus: ConsensusResult,
    ) -> Result<(), RecorderError>;

    async fn find(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
    ) -> Result<Option<ConversationEntry>, RecorderError>;

    /// The caller's entries, newest first
    async fn history(&self, caller: &CallerId) -> Result<Vec<ConversationEntry>, RecorderError>;

    /// Most recently recorded entry
    async fn latest(&self, caller: &CallerId) -> Result<Option<ConversationEntry>, RecorderError> {
        Ok(self.history(caller).await?.into_iter().next())
    }

    /// Store a consensus computed without an entry id.
    ///
    /// When the caller's most recent entry is a multi-mode entry for the
    /// same question, the consensus is attached to it in place; otherwise a
    /// new multi-mode entry holding `results` and the consensus is appended.
    /// Only the latest entry is considered.
    ///
    /// The default runs the check and the write as separate calls; shared
    /// stores override it to do both under one lock.
    async fn attach_consensus_to_latest(
        &self,
        caller: &CallerId,
        question: &str,
        results: Vec<InvocationResult>,
        consensus: ConsensusResult,
    ) -> Result<EntryId, RecorderError> {
        if let Some(latest) = self.latest(caller).await?
            && latest.is_multi_for(question)
        {
            self.attach_consensus(caller, latest.id, consensus).await?;
            return Ok(latest.id);
        }

        let entry =
            ConversationEntry::multi_from_results(question, results).with_consensus(consensus);
        self.record(caller, entry).await
    }
}
