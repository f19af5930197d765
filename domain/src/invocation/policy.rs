//! Reliability policy for a single model call.

use std::time::Duration;

/// Timeout, token and retry settings applied to one model invocation.
///
/// Each call site has its own tuning: bulk fan-out is short and cheap,
/// the dedicated single-model path waits longer for a fuller answer, and
/// consensus backs off more gently because it runs right after a burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InvocationPolicy {
    /// Deadline for one attempt
    pub timeout: Duration,
    /// Requested completion tokens (clamped by the provider's budget)
    pub max_tokens: u32,
    /// Extra attempts allowed after a rate-limit response
    pub max_retries: u32,
    /// Backoff unit; retry `n` waits `n * base_delay`
    pub base_delay: Duration,
    /// Overrides the provider's temperature when set
    pub temperature: Option<f32>,
}

impl InvocationPolicy {
    /// Quick comparative answers from every provider.
    pub const FAN_OUT: Self = Self {
        timeout: Duration::from_secs(15),
        max_tokens: 1000,
        max_retries: 2,
        base_delay: Duration::from_millis(1000),
        temperature: None,
    };

    /// One model, fuller answer.
    pub const SINGLE: Self = Self {
        timeout: Duration::from_secs(30),
        max_tokens: 4000,
        max_retries: 2,
        base_delay: Duration::from_millis(1000),
        temperature: None,
    };

    /// Synthesis over the fan-out answers.
    pub const CONSENSUS: Self = Self {
        timeout: Duration::from_secs(20),
        max_tokens: 1500,
        max_retries: 2,
        base_delay: Duration::from_millis(1500),
        temperature: Some(0.1),
    };

    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        self.base_delay * retry
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }
}

impl Default for InvocationPolicy {
    fn default() -> Self {
        Self::FAN_OUT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_site_constants() {
        assert_eq!(InvocationPolicy::FAN_OUT.timeout, Duration::from_secs(15));
        assert_eq!(InvocationPolicy::SINGLE.timeout, Duration::from_secs(30));
        assert_eq!(InvocationPolicy::CONSENSUS.timeout, Duration::from_secs(20));
        assert_eq!(InvocationPolicy::FAN_OUT.max_tokens, 1000);
        assert_eq!(InvocationPolicy::CONSENSUS.max_tokens, 1500);
        assert_eq!(InvocationPolicy::SINGLE.max_tokens, 4000);
        assert_eq!(InvocationPolicy::CONSENSUS.temperature, Some(0.1));
    }

    #[test]
    fn test_linear_backoff() {
        let fan_out = InvocationPolicy::FAN_OUT;
        assert_eq!(fan_out.backoff(1), Duration::from_millis(1000));
        assert_eq!(fan_out.backoff(2), Duration::from_millis(2000));

        let consensus = InvocationPolicy::CONSENSUS;
        assert_eq!(consensus.backoff(1), Duration::from_millis(1500));
        assert_eq!(consensus.backoff(2), Duration::from_millis(3000));
    }

    #[test]
    fn test_builder() {
        let policy = InvocationPolicy::SINGLE
            .with_max_tokens(5000)
            .with_max_retries(0)
            .with_timeout(Duration::from_secs(1));
        assert_eq!(policy.max_tokens, 5000);
        assert_eq!(policy.max_retries, 0);
        assert_eq!(policy.timeout, Duration::from_secs(1));
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }
}
