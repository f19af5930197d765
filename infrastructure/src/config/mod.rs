//! Configuration file loading for parallelai
//!
//! This module handles file I/O and merging of configuration from multiple
//! sources, validation, and building the provider registry. The priority
//! order (highest to lowest):
//!
//! 1. `PARALLELAI_*` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./parallelai.toml` or `./.parallelai.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/parallelai/config.toml`
//! 5. Default values

mod error;
mod file_config;
mod issue;
mod loader;
mod registry;

pub use error::ConfigError;
pub use file_config::{
    DEFAULT_BASE_URL, FileConfig, FileGatewayConfig, FileHistoryConfig, FileLoggingConfig,
    FileModelConfig, FileOrchestrationConfig, default_api_key_env, default_model_configs,
};
pub use issue::{ConfigIssue, ConfigIssueCode, Severity};
pub use loader::{ConfigLoader, ENV_PREFIX};
pub use registry::RegistryBuilder;
