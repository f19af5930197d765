//! Provider Registry: the ordered, read-only set of configured models.

use super::config::ProviderConfig;
use crate::core::error::DomainError;
use crate::core::model::Model;
use std::collections::HashSet;

/// Ordered collection of [`ProviderConfig`]s.
///
/// Built once at startup and shared read-only (behind an `Arc`) by every
/// use case. Enumeration order is the declaration order and is what
/// fan-out results are reported in. Never empty; model ids are unique.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<ProviderConfig>) -> Result<Self, DomainError> {
        if providers.is_empty() {
            return Err(DomainError::EmptyRegistry);
        }

        let mut seen = HashSet::new();
        for provider in &providers {
            if !seen.insert(provider.model.as_str()) {
                return Err(DomainError::DuplicateProvider(provider.model.to_string()));
            }
        }

        Ok(Self { providers })
    }

    /// All providers in registry order
    pub fn list_providers(&self) -> &[ProviderConfig] {
        &self.providers
    }

    pub fn find_provider(&self, model: &Model) -> Result<&ProviderConfig, DomainError> {
        self.providers
            .iter()
            .find(|p| &p.model == model)
            .ok_or_else(|| DomainError::ProviderNotFound(model.to_string()))
    }

    /// The provider that performs consensus synthesis (first entry).
    pub fn primary(&self) -> &ProviderConfig {
        &self.providers[0]
    }

    pub fn models(&self) -> impl Iterator<Item = &Model> {
        self.providers.iter().map(|p| &p.model)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(id: &str) -> ProviderConfig {
        ProviderConfig::new(id, format!("key-{}", id), "Return ONLY JSON")
    }

    #[test]
    fn test_list_preserves_order() {
        let registry =
            ProviderRegistry::new(vec![provider("b"), provider("a"), provider("c")]).unwrap();
        let ids: Vec<_> = registry.models().map(|m| m.to_string()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(registry.primary().model.as_str(), "b");
    }

    #[test]
    fn test_find_provider() {
        let registry = ProviderRegistry::new(vec![provider("a"), provider("b")]).unwrap();
        assert_eq!(
            registry.find_provider(&Model::from("b")).unwrap().model,
            Model::from("b")
        );
        assert_eq!(
            registry.find_provider(&Model::from("zzz")).unwrap_err(),
            DomainError::ProviderNotFound("zzz".to_string())
        );
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(
            ProviderRegistry::new(vec![]).unwrap_err(),
            DomainError::EmptyRegistry
        );
    }

    #[test]
    fn test_duplicate_rejected() {
        let err = ProviderRegistry::new(vec![provider("a"), provider("a")]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateProvider("a".to_string()));
    }
}
