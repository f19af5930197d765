//! Provider list from TOML (`[[models]]` array)

use parallelai_domain::Model;
use serde::{Deserialize, Serialize};

/// One provider entry.
///
/// # Example
///
/// ```toml
/// [[models]]
/// id = "llama-3.1-8b-instant"
/// api_key_env = "GROQ_API_KEY1"
/// max_tokens = 1000
/// ```
///
/// Omitted fields fall back to the built-in values for well-known models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Model identifier sent to the provider
    pub id: String,
    /// Environment variable holding the credential
    pub api_key_env: Option<String>,
    /// Inline credential (prefer `api_key_env`)
    pub api_key: Option<String>,
    /// System prompt preamble
    pub preamble: Option<String>,
    /// Upper bound on tokens requested from this provider
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl FileModelConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn model(&self) -> Model {
        Model::from(self.id.trim())
    }
}

/// Credential variable of a built-in provider: `GROQ_API_KEY1` for the
/// first default model through `GROQ_API_KEY5` for the fifth.
pub fn default_api_key_env(model: &Model) -> Option<String> {
    Model::default_models()
        .iter()
        .position(|m| m == model)
        .map(|i| format!("GROQ_API_KEY{}", i + 1))
}

/// Built-in provider list, in registry order
pub fn default_model_configs() -> Vec<FileModelConfig> {
    Model::default_models()
        .iter()
        .map(|model| FileModelConfig {
            api_key_env: default_api_key_env(model),
            ..FileModelConfig::new(model.as_str())
        })
        .collect()
}
