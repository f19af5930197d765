use thiserror::Error;

/// Errors raised while turning configuration into a runnable registry
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A provider has no usable credential. Fatal at startup.
    #[error("Model {model} is unavailable: credential {env} is not set")]
    ProviderUnavailable { model: String, env: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
