//! Infrastructure layer for parallelai
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod groq;
pub mod logging;
pub mod persistence;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigIssue, ConfigLoader, FileConfig, FileGatewayConfig, FileModelConfig,
    RegistryBuilder,
};
pub use groq::GroqGateway;
pub use logging::JsonlConversationLogger;
pub use persistence::{InMemoryConversationStore, JsonFileConversationStore};
