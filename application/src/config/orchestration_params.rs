//! Orchestration parameters: per-call-site invocation tuning.
//!
//! [`OrchestrationParams`] groups the static parameters the chat use cases
//! run with. Defaults are the built-in [`InvocationPolicy`] constants; the
//! configuration file may override individual values.

use parallelai_domain::{DEFAULT_ANSWER_BUDGET, InvocationPolicy};

#[derive(Debug, Clone, PartialEq)]
pub struct OrchestrationParams {
    /// Policy for each member of a fan-out
    pub fan_out: InvocationPolicy,
    /// Policy for the dedicated single-model path
    pub single: InvocationPolicy,
    /// Policy for the consensus synthesis call
    pub consensus: InvocationPolicy,
    /// Characters of each answer embedded in the consensus prompt
    pub answer_budget: usize,
}

impl Default for OrchestrationParams {
    fn default() -> Self {
        Self {
            fan_out: InvocationPolicy::FAN_OUT,
            single: InvocationPolicy::SINGLE,
            consensus: InvocationPolicy::CONSENSUS,
            answer_budget: DEFAULT_ANSWER_BUDGET,
        }
    }
}

impl OrchestrationParams {
    // ==================== Builder Methods ====================

    pub fn with_fan_out(mut self, policy: InvocationPolicy) -> Self {
        self.fan_out = policy;
        self
    }

    pub fn with_single(mut self, policy: InvocationPolicy) -> Self {
        self.single = policy;
        self
    }

    pub fn with_consensus(mut self, policy: InvocationPolicy) -> Self {
        self.consensus = policy;
        self
    }

    pub fn with_answer_budget(mut self, chars: usize) -> Self {
        self.answer_budget = chars;
        self
    }
}
