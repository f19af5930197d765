//! Conversation history as seen by the core.
//!
//! Storage itself lives behind the `ConversationRecorder` port in the
//! application layer; this module only defines what gets stored.

pub mod entities;
pub mod query;

pub use entities::{ChatMode, ConversationEntry, EntryId};
pub use query::{HistoryQuery, SortOrder};
