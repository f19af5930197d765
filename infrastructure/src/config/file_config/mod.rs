//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod gateway;
mod models;
mod orchestration;
mod storage;

pub use gateway::{DEFAULT_BASE_URL, FileGatewayConfig};
pub use models::{FileModelConfig, default_api_key_env, default_model_configs};
pub use orchestration::FileOrchestrationConfig;
pub use storage::{FileHistoryConfig, FileLoggingConfig};

use super::issue::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Provider endpoint
    pub gateway: FileGatewayConfig,
    /// Providers in registry order; empty means the built-in five
    pub models: Vec<FileModelConfig>,
    /// Per-call-site policy overrides
    pub orchestration: FileOrchestrationConfig,
    /// Conversation history storage
    pub history: FileHistoryConfig,
    /// Transcript settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Configured providers, or the built-in list when none are configured
    pub fn effective_models(&self) -> Vec<FileModelConfig> {
        if self.models.is_empty() {
            default_model_configs()
        } else {
            self.models.clone()
        }
    }

    /// Validate the entire configuration, returning all detected issues.
    ///
    /// Checks model ids (empty, duplicated), credentials set twice, zero
    /// timeouts and a zero answer budget.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for (index, model) in self.models.iter().enumerate() {
            let id = model.id.trim();
            if id.is_empty() {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyModelId { index },
                    format!("models[{}]: id cannot be empty", index),
                ));
                continue;
            }
            if !seen.insert(id.to_string()) {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::DuplicateModelId { id: id.to_string() },
                    format!("models[{}]: duplicate id '{}'", index, id),
                ));
            }
            if model.api_key.is_some() && model.api_key_env.is_some() {
                issues.push(ConfigIssue::warning(
                    ConfigIssueCode::AmbiguousCredential { id: id.to_string() },
                    format!(
                        "models[{}]: both api_key and api_key_env set, using api_key",
                        index
                    ),
                ));
            }
        }

        for (field, secs) in self.orchestration.timeouts() {
            if secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroTimeout {
                        field: field.to_string(),
                    },
                    format!("orchestration.{}: timeout cannot be 0", field),
                ));
            }
        }

        if self.orchestration.answer_budget_chars == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroAnswerBudget,
                "orchestration.answer_budget_chars cannot be 0",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[gateway]
base_url = "http://localhost:8080/v1"

[[models]]
id = "llama-3.1-8b-instant"
api_key_env = "MY_KEY"
max_tokens = 800

[[models]]
id = "my-org/custom"
api_key = "inline"
preamble = "Answer in JSON"
temperature = 0.7

[orchestration]
fan_out_timeout_secs = 5
answer_budget_chars = 250

[history]
dir = "/var/lib/parallelai"

[logging]
transcript = "t.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.base_url, "http://localhost:8080/v1");
        assert_eq!(config.gateway.connect_timeout_secs, 10);
        assert_eq!(config.models.len(), 2);
        assert_eq!(config.models[0].max_tokens, Some(800));
        assert_eq!(config.models[1].api_key.as_deref(), Some("inline"));
        assert_eq!(config.models[1].temperature, Some(0.7));
        assert_eq!(config.orchestration.fan_out_timeout_secs, 5);
        assert_eq!(config.orchestration.single_timeout_secs, 30);
        assert_eq!(config.orchestration.answer_budget_chars, 250);
        assert_eq!(config.history.dir, Some(PathBuf::from("/var/lib/parallelai")));
        assert!(config.history.persist);
        assert_eq!(config.logging.transcript, Some(PathBuf::from("t.jsonl")));
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = FileConfig::default();
        assert_eq!(config.gateway.base_url, DEFAULT_BASE_URL);
        assert!(config.models.is_empty());
        assert_eq!(config.effective_models().len(), 5);
        assert!(config.logging.transcript.is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_validate_model_ids() {
        let config = FileConfig {
            models: vec![
                FileModelConfig::new("a"),
                FileModelConfig::new("  "),
                FileModelConfig::new("a"),
            ],
            ..Default::default()
        };

        let codes: Vec<_> = config.validate().into_iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                ConfigIssueCode::EmptyModelId { index: 1 },
                ConfigIssueCode::DuplicateModelId { id: "a".into() },
            ]
        );
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = FileConfig::default();
        config.orchestration.consensus_timeout_secs = 0;

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].is_error());
        assert_eq!(
            issues[0].code,
            ConfigIssueCode::ZeroTimeout {
                field: "consensus_timeout_secs".into()
            }
        );
    }

    #[test]
    fn test_ambiguous_credential_is_warning() {
        let config = FileConfig {
            models: vec![FileModelConfig {
                api_key: Some("k".into()),
                api_key_env: Some("K".into()),
                ..FileModelConfig::new("a")
            }],
            ..Default::default()
        };

        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
