//! Chat Service
//!
//! Request-handling facade: runs the fan-out, single-model and consensus
//! use cases for a caller and keeps that caller's conversation history.

use super::ask_model::{AskError, AskModelInput, AskModelUseCase};
use super::consensus::ConsensusUseCase;
use super::fan_out::{FanOutError, FanOutUseCase};
use super::invoke_model::ModelInvoker;
use crate::config::OrchestrationParams;
use crate::ports::conversation_logger::ConversationLogger;
use crate::ports::conversation_recorder::{ConversationRecorder, RecorderError};
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, ProgressNotifier};
use parallelai_domain::{
    CallerId, ChatMode, ConsensusResult, ConversationEntry, DomainError, EntryId, HistoryQuery,
    InvocationResult, Model, ProviderRegistry, Question,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error(transparent)]
    FanOut(#[from] FanOutError),

    #[error(transparent)]
    Ask(#[from] AskError),

    #[error("Conversation entry not found: {0}")]
    EntryNotFound(EntryId),

    #[error("Entry {0} is not a multi-model exchange")]
    NotMultiEntry(EntryId),

    #[error("Failed to record conversation: {0}")]
    Recorder(#[from] RecorderError),
}

impl ChatError {
    /// Whether the request failed because no model could answer
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            ChatError::FanOut(FanOutError::AllProvidersFailed { .. })
                | ChatError::Ask(AskError::ModelFailed { .. })
        )
    }
}

impl From<DomainError> for ChatError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::InvalidQuestion(msg) => ChatError::InvalidQuestion(msg),
            DomainError::ProviderNotFound(model) => ChatError::Ask(AskError::UnknownModel(model)),
            other => ChatError::InvalidQuestion(other.to_string()),
        }
    }
}

/// Outcome of a multi-model request
#[derive(Debug, Clone)]
pub struct MultiChatOutcome {
    pub entry_id: EntryId,
    /// One result per provider, in registry order
    pub results: Vec<InvocationResult>,
    pub consensus: Option<ConsensusResult>,
}

/// Outcome of a single-model request
#[derive(Debug, Clone)]
pub struct SingleChatOutcome {
    pub entry_id: EntryId,
    pub result: InvocationResult,
}

/// Outcome of a follow-up consensus
#[derive(Debug, Clone)]
pub struct ConsensusOutcome {
    pub entry_id: EntryId,
    pub consensus: ConsensusResult,
}

pub struct ChatService<G: LlmGateway + 'static> {
    fan_out: FanOutUseCase<G>,
    ask: AskModelUseCase<G>,
    consensus: ConsensusUseCase<G>,
    recorder: Arc<dyn ConversationRecorder>,
}

impl<G: LlmGateway + 'static> ChatService<G> {
    pub fn new(
        gateway: Arc<G>,
        registry: Arc<ProviderRegistry>,
        recorder: Arc<dyn ConversationRecorder>,
        params: OrchestrationParams,
    ) -> Self {
        Self::build(ModelInvoker::new(gateway), registry, recorder, params, None)
    }

    /// Same as [`ChatService::new`], with a transcript of every model call
    pub fn with_logger(
        gateway: Arc<G>,
        registry: Arc<ProviderRegistry>,
        recorder: Arc<dyn ConversationRecorder>,
        params: OrchestrationParams,
        logger: Arc<dyn ConversationLogger>,
    ) -> Self {
        let invoker = ModelInvoker::new(gateway).with_logger(Arc::clone(&logger));
        Self::build(invoker, registry, recorder, params, Some(logger))
    }

    fn build(
        invoker: ModelInvoker<G>,
        registry: Arc<ProviderRegistry>,
        recorder: Arc<dyn ConversationRecorder>,
        params: OrchestrationParams,
        logger: Option<Arc<dyn ConversationLogger>>,
    ) -> Self {
        let mut fan_out =
            FanOutUseCase::new(invoker.clone(), Arc::clone(&registry)).with_policy(params.fan_out);
        let ask =
            AskModelUseCase::new(invoker.clone(), Arc::clone(&registry)).with_policy(params.single);
        let mut consensus = ConsensusUseCase::new(invoker, registry)
            .with_policy(params.consensus)
            .with_answer_budget(params.answer_budget);

        if let Some(logger) = logger {
            fan_out = fan_out.with_logger(Arc::clone(&logger));
            consensus = consensus.with_logger(logger);
        }

        Self {
            fan_out,
            ask,
            consensus,
            recorder,
        }
    }

    pub async fn multi(
        &self,
        caller: &CallerId,
        question: &str,
        with_consensus: bool,
    ) -> Result<MultiChatOutcome, ChatError> {
        self.multi_with_progress(caller, question, with_consensus, &NoProgress)
            .await
    }

    /// Ask every model, record the exchange and optionally reconcile it.
    ///
    /// The consensus, when requested, is attached to the entry just
    /// recorded.
    pub async fn multi_with_progress(
        &self,
        caller: &CallerId,
        question: &str,
        with_consensus: bool,
        progress: &dyn ProgressNotifier,
    ) -> Result<MultiChatOutcome, ChatError> {
        let question = Question::parse(question)?;

        let fan_out = self
            .fan_out
            .execute_with_progress(&question, progress)
            .await?;

        let entry = ConversationEntry::multi(question.content(), &fan_out);
        let entry_id = self
            .recorder
            .record(caller, entry)
            .await
            .inspect_err(|e| error!("Failed to record exchange for {}: {}", caller, e))?;

        let consensus = if with_consensus {
            let consensus = self
                .consensus
                .synthesize_with_progress(question.content(), fan_out.results(), progress)
                .await;
            self.recorder
                .attach_consensus(caller, entry_id, consensus.clone())
                .await
                .inspect_err(|e| error!("Failed to store consensus for {}: {}", caller, e))?;
            Some(consensus)
        } else {
            None
        };

        Ok(MultiChatOutcome {
            entry_id,
            results: fan_out.into_results(),
            consensus,
        })
    }

    pub async fn single(
        &self,
        caller: &CallerId,
        question: &str,
        model: Model,
    ) -> Result<SingleChatOutcome, ChatError> {
        self.single_with_progress(caller, question, model, None, &NoProgress)
            .await
    }

    /// Ask one chosen model and record the exchange
    pub async fn single_with_progress(
        &self,
        caller: &CallerId,
        question: &str,
        model: Model,
        max_tokens: Option<u32>,
        progress: &dyn ProgressNotifier,
    ) -> Result<SingleChatOutcome, ChatError> {
        let question = Question::parse(question)?;

        let mut input = AskModelInput::new(model, question.clone());
        if let Some(max_tokens) = max_tokens {
            input = input.with_max_tokens(max_tokens);
        }
        let result = self.ask.execute_with_progress(input, progress).await?;

        let entry = ConversationEntry::single(question.content(), result.clone());
        let entry_id = self
            .recorder
            .record(caller, entry)
            .await
            .inspect_err(|e| error!("Failed to record exchange for {}: {}", caller, e))?;

        Ok(SingleChatOutcome { entry_id, result })
    }

    pub async fn consensus_for_entry(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
    ) -> Result<ConsensusOutcome, ChatError> {
        self.consensus_for_entry_with_progress(caller, entry_id, &NoProgress)
            .await
    }

    /// Reconcile the stored answers of an earlier multi-model exchange.
    ///
    /// Any previous consensus on that entry is replaced.
    pub async fn consensus_for_entry_with_progress(
        &self,
        caller: &CallerId,
        entry_id: EntryId,
        progress: &dyn ProgressNotifier,
    ) -> Result<ConsensusOutcome, ChatError> {
        let entry = self
            .recorder
            .find(caller, entry_id)
            .await?
            .ok_or(ChatError::EntryNotFound(entry_id))?;

        if entry.mode != ChatMode::Multi {
            return Err(ChatError::NotMultiEntry(entry_id));
        }

        info!("Follow-up consensus for entry {}", entry_id);
        let consensus = self
            .consensus
            .synthesize_with_progress(&entry.question, &entry.results, progress)
            .await;

        self.recorder
            .attach_consensus(caller, entry_id, consensus.clone())
            .await
            .inspect_err(|e| error!("Failed to store consensus for {}: {}", caller, e))?;

        Ok(ConsensusOutcome {
            entry_id,
            consensus,
        })
    }

    /// Reconcile answers supplied by the caller rather than loaded from
    /// history.
    ///
    /// Stored on the caller's latest entry when that entry is a multi-model
    /// exchange for the same question, otherwise as a new entry.
    pub async fn consensus_for_question(
        &self,
        caller: &CallerId,
        question: &str,
        results: Vec<InvocationResult>,
    ) -> Result<ConsensusOutcome, ChatError> {
        let question = Question::parse(question)?;

        let consensus = self
            .consensus
            .synthesize(question.content(), &results)
            .await;

        let entry_id = self
            .recorder
            .attach_consensus_to_latest(caller, question.content(), results, consensus.clone())
            .await
            .inspect_err(|e| error!("Failed to store consensus for {}: {}", caller, e))?;

        Ok(ConsensusOutcome {
            entry_id,
            consensus,
        })
    }

    /// The caller's exchanges matching `query`, in its order
    pub async fn history(
        &self,
        caller: &CallerId,
        query: &HistoryQuery,
    ) -> Result<Vec<ConversationEntry>, ChatError> {
        let entries = self.recorder.history(caller).await?;
        Ok(query.apply(entries))
    }
}
