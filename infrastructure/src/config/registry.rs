//! Registry construction: configuration plus credentials.
//!
//! Every provider must resolve a credential before anything is served; a
//! single missing key stops startup.

use super::error::ConfigError;
use super::file_config::{FileConfig, FileModelConfig, default_api_key_env};
use parallelai_domain::{PromptTemplate, ProviderConfig, ProviderRegistry};
use secrecy::SecretString;
use tracing::debug;

/// Builds the [`ProviderRegistry`] from a [`FileConfig`].
///
/// Credential lookup is injectable so tests never touch the process
/// environment.
pub struct RegistryBuilder<F> {
    lookup: F,
}

impl RegistryBuilder<fn(&str) -> Option<String>> {
    /// Resolve credentials from the process environment
    pub fn from_env() -> Self {
        Self {
            lookup: |name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()),
        }
    }
}

impl<F> RegistryBuilder<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    pub fn build(&self, config: &FileConfig) -> Result<ProviderRegistry, ConfigError> {
        let errors: Vec<String> = config
            .validate()
            .into_iter()
            .filter(|issue| issue.is_error())
            .map(|issue| issue.message)
            .collect();
        if !errors.is_empty() {
            return Err(ConfigError::Invalid(errors.join("; ")));
        }

        let providers = config
            .effective_models()
            .iter()
            .map(|entry| self.provider(entry))
            .collect::<Result<Vec<_>, _>>()?;

        ProviderRegistry::new(providers).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    fn provider(&self, entry: &FileModelConfig) -> Result<ProviderConfig, ConfigError> {
        let model = entry.model();
        let credential = self.credential(entry)?;

        let preamble = entry
            .preamble
            .clone()
            .unwrap_or_else(|| PromptTemplate::default_preamble(&model).to_string());

        let mut provider = ProviderConfig::new(model, credential, preamble);
        if let Some(max_tokens) = entry.max_tokens {
            provider = provider.with_token_budget(max_tokens);
        }
        if let Some(temperature) = entry.temperature {
            provider = provider.with_temperature(temperature);
        }

        debug!("Registered provider {}", provider.model);
        Ok(provider)
    }

    fn credential(&self, entry: &FileModelConfig) -> Result<SecretString, ConfigError> {
        if let Some(key) = entry.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Ok(SecretString::from(key.clone()));
        }

        let model = entry.model();
        let env = entry
            .api_key_env
            .clone()
            .or_else(|| default_api_key_env(&model))
            .ok_or_else(|| ConfigError::ProviderUnavailable {
                model: model.to_string(),
                env: "(no api_key_env configured)".to_string(),
            })?;

        (self.lookup)(&env)
            .map(SecretString::from)
            .ok_or(ConfigError::ProviderUnavailable {
                model: model.to_string(),
                env,
            })
    }
}
