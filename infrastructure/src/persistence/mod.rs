//! Conversation history adapters for the
//! [`ConversationRecorder`](parallelai_application::ConversationRecorder) port.

mod json_file;
mod memory;

pub use json_file::JsonFileConversationStore;
pub use memory::InMemoryConversationStore;
