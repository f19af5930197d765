//! Invocation policy overrides from TOML (`[orchestration]` section)

use parallelai_application::OrchestrationParams;
use parallelai_domain::{DEFAULT_ANSWER_BUDGET, InvocationPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw orchestration configuration from TOML
///
/// Every field defaults to the built-in policy value.
///
/// # Example
///
/// ```toml
/// [orchestration]
/// fan_out_timeout_secs = 15
/// single_timeout_secs = 30
/// consensus_timeout_secs = 20
/// answer_budget_chars = 500
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestrationConfig {
    pub fan_out_timeout_secs: u64,
    pub single_timeout_secs: u64,
    pub consensus_timeout_secs: u64,
    pub fan_out_max_tokens: u32,
    pub single_max_tokens: u32,
    pub consensus_max_tokens: u32,
    /// Retries after a rate-limit response (all call sites)
    pub max_retries: u32,
    pub retry_base_delay_ms: u64,
    pub consensus_retry_base_delay_ms: u64,
    /// Characters of each answer embedded in the consensus prompt
    pub answer_budget_chars: usize,
}

impl Default for FileOrchestrationConfig {
    fn default() -> Self {
        let fan_out = InvocationPolicy::FAN_OUT;
        let single = InvocationPolicy::SINGLE;
        let consensus = InvocationPolicy::CONSENSUS;
        Self {
            fan_out_timeout_secs: fan_out.timeout.as_secs(),
            single_timeout_secs: single.timeout.as_secs(),
            consensus_timeout_secs: consensus.timeout.as_secs(),
            fan_out_max_tokens: fan_out.max_tokens,
            single_max_tokens: single.max_tokens,
            consensus_max_tokens: consensus.max_tokens,
            max_retries: fan_out.max_retries,
            retry_base_delay_ms: fan_out.base_delay.as_millis() as u64,
            consensus_retry_base_delay_ms: consensus.base_delay.as_millis() as u64,
            answer_budget_chars: DEFAULT_ANSWER_BUDGET,
        }
    }
}

impl FileOrchestrationConfig {
    /// Timeout fields paired with their TOML keys
    pub(super) fn timeouts(&self) -> [(&'static str, u64); 3] {
        [
            ("fan_out_timeout_secs", self.fan_out_timeout_secs),
            ("single_timeout_secs", self.single_timeout_secs),
            ("consensus_timeout_secs", self.consensus_timeout_secs),
        ]
    }

    pub fn to_orchestration_params(&self) -> OrchestrationParams {
        let base_delay = Duration::from_millis(self.retry_base_delay_ms);

        let fan_out = InvocationPolicy::FAN_OUT
            .with_timeout(Duration::from_secs(self.fan_out_timeout_secs))
            .with_max_tokens(self.fan_out_max_tokens)
            .with_max_retries(self.max_retries)
            .with_base_delay(base_delay);
        let single = InvocationPolicy::SINGLE
            .with_timeout(Duration::from_secs(self.single_timeout_secs))
            .with_max_tokens(self.single_max_tokens)
            .with_max_retries(self.max_retries)
            .with_base_delay(base_delay);
        let consensus = InvocationPolicy::CONSENSUS
            .with_timeout(Duration::from_secs(self.consensus_timeout_secs))
            .with_max_tokens(self.consensus_max_tokens)
            .with_max_retries(self.max_retries)
            .with_base_delay(Duration::from_millis(self.consensus_retry_base_delay_ms));

        OrchestrationParams::default()
            .with_fan_out(fan_out)
            .with_single(single)
            .with_consensus(consensus)
            .with_answer_budget(self.answer_budget_chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_policies() {
        let params = FileOrchestrationConfig::default().to_orchestration_params();
        assert_eq!(params, OrchestrationParams::default());
    }

    #[test]
    fn test_overrides_keep_consensus_temperature() {
        let config = FileOrchestrationConfig {
            consensus_timeout_secs: 45,
            max_retries: 0,
            ..Default::default()
        };

        let params = config.to_orchestration_params();
        assert_eq!(params.consensus.timeout, Duration::from_secs(45));
        assert_eq!(params.consensus.max_retries, 0);
        assert_eq!(params.consensus.temperature, Some(0.1));
        assert_eq!(params.fan_out.timeout, Duration::from_secs(15));
    }
}
