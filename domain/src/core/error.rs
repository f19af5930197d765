//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No providers configured")]
    EmptyRegistry,

    #[error("Provider configured twice: {0}")]
    DuplicateProvider(String),

    #[error("Invalid model specified: {0}")]
    ProviderNotFound(String),

    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("All models failed to respond")]
    AllProvidersFailed,
}

impl DomainError {
    /// Whether the error means "nothing could answer" rather than bad input
    pub fn is_unavailable(&self) -> bool {
        matches!(self, DomainError::AllProvidersFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_failed_display() {
        assert_eq!(
            DomainError::AllProvidersFailed.to_string(),
            "All models failed to respond"
        );
    }

    #[test]
    fn test_is_unavailable_check() {
        assert!(DomainError::AllProvidersFailed.is_unavailable());
        assert!(!DomainError::EmptyRegistry.is_unavailable());
        assert!(!DomainError::ProviderNotFound("x".to_string()).is_unavailable());
    }
}
