//! Application layer for parallelai
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::OrchestrationParams;
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    conversation_recorder::{ConversationRecorder, RecorderError},
    llm_gateway::{CompletionRequest, GatewayError, LlmGateway},
    progress::{NoProgress, Phase, ProgressNotifier},
};
pub use use_cases::ask_model::{AskError, AskModelInput, AskModelUseCase};
pub use use_cases::chat_service::{
    ChatError, ChatService, ConsensusOutcome, MultiChatOutcome, SingleChatOutcome,
};
pub use use_cases::consensus::ConsensusUseCase;
pub use use_cases::fan_out::{FanOutError, FanOutUseCase};
pub use use_cases::invoke_model::ModelInvoker;
