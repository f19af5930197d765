//! Provider configuration and the registry that owns it.

pub mod config;
pub mod registry;

pub use config::{DEFAULT_TEMPERATURE, DEFAULT_TOKEN_BUDGET, ProviderConfig};
pub use registry::ProviderRegistry;
