//! Groq adapter for the [`LlmGateway`](parallelai_application::LlmGateway) port

mod gateway;
mod protocol;

pub use gateway::GroqGateway;
pub use protocol::EMPTY_CONTENT_TEXT;
