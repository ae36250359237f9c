//! # Value Objects

use serde::{Deserialize, Serialize};

/// Resolver configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityIdConfig {
    /// Maximum cached alias and EVM address mappings (default: 100,000).
    pub cache_size: usize,
    /// Whether resolved mappings are cached at all (default: true).
    pub cache_enabled: bool,
}

impl Default for EntityIdConfig {
    fn default() -> Self {
        Self {
            cache_size: 100_000,
            cache_enabled: true,
        }
    }
}

impl EntityIdConfig {
    pub fn with_cache_size(mut self, cache_size: usize) -> Self {
        self.cache_size = cache_size;
        self
    }

    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = EntityIdConfig::default();
        assert_eq!(config.cache_size, 100_000);
        assert!(config.cache_enabled);
    }

    #[test]
    fn test_config_builders() {
        let config = EntityIdConfig::default()
            .with_cache_size(8)
            .with_cache_enabled(false);
        assert_eq!(config.cache_size, 8);
        assert!(!config.cache_enabled);
    }
}
