//! Per-provider configuration.

use crate::core::model::Model;
use secrecy::SecretString;

/// Upper bound on completion tokens when configuration gives none.
pub const DEFAULT_TOKEN_BUDGET: u32 = 8192;

/// Sampling temperature used by every default provider.
pub const DEFAULT_TEMPERATURE: f32 = 0.2;

/// One model endpoint: what to call, with which key, and how to steer it.
///
/// Immutable once the registry is built. The credential is a
/// [`SecretString`] so it never shows up in `Debug` output or logs.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Stable identifier, used as the key everywhere
    pub model: Model,
    /// API key for this model's endpoint
    pub credential: SecretString,
    /// System instruction that shapes the answer format
    pub prompt_preamble: String,
    /// Hard cap on completion tokens for this provider
    pub token_budget: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn new(
        model: impl Into<Model>,
        credential: impl Into<SecretString>,
        prompt_preamble: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            credential: credential.into(),
            prompt_preamble: prompt_preamble.into(),
            token_budget: DEFAULT_TOKEN_BUDGET,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_token_budget(mut self, token_budget: u32) -> Self {
        self.token_budget = token_budget;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Clamp a call-site token request to this provider's budget.
    pub fn effective_max_tokens(&self, requested: u32) -> u32 {
        requested.min(self.token_budget)
    }
}
