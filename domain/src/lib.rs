//! Domain layer for parallelai
//!
//! This crate contains the core business types: which models exist, how a
//! call to one of them is governed, what its result looks like, and what a
//! recorded conversation contains. It has no dependencies on infrastructure
//! or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Fan-out
//!
//! One question goes to every provider in the [`ProviderRegistry`] at once.
//! The answers come back as a [`FanOutResult`], in registry order, and the
//! whole fan-out only fails when no provider answered.
//!
//! ## Consensus
//!
//! An optional follow-up call in which the primary provider reconciles the
//! successful answers into one [`ConsensusResult`].

pub mod conversation;
pub mod core;
pub mod invocation;
pub mod prompt;
pub mod provider;

// Re-export commonly used types
pub use conversation::{ChatMode, ConversationEntry, EntryId, HistoryQuery, SortOrder};
pub use core::{
    caller::CallerId, error::DomainError, model::Model, question::Question,
    string::{truncate_chars, truncate_with_ellipsis},
};
pub use invocation::{
    CONSENSUS_FALLBACK_TEXT, CONSENSUS_MODEL_ID, ConsensusResult, FanOutResult,
    InvocationPolicy, InvocationResult, InvocationStatus, UNAVAILABLE_ANSWER_TEXT,
};
pub use prompt::{DEFAULT_ANSWER_BUDGET, PromptTemplate};
pub use provider::{ProviderConfig, ProviderRegistry};
