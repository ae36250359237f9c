//! # Resolver Cache
//!
//! Bounded map from alias and EVM address bytes to resolved ids.
//!
//! Only hits are cached. A miss may become a hit once the entity is created,
//! so misses always go back to the repository.

use lru::LruCache;
use parking_lot::Mutex;
use shared_types::{EntityId, EVM_ADDRESS_LENGTH};
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CacheKey {
    Alias(Vec<u8>),
    EvmAddress([u8; EVM_ADDRESS_LENGTH]),
}

/// Thread-safe LRU of resolved identifiers.
pub struct ResolverCache {
    entries: Option<Mutex<LruCache<CacheKey, EntityId>>>,
}

impl ResolverCache {
    /// A cache holding at most `capacity` mappings. Zero disables caching.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
        }
    }

    pub fn disabled() -> Self {
        Self { entries: None }
    }

    pub fn get_alias(&self, alias: &[u8]) -> Option<EntityId> {
        self.get(&CacheKey::Alias(alias.to_vec()))
    }

    pub fn put_alias(&self, alias: &[u8], id: EntityId) {
        self.put(CacheKey::Alias(alias.to_vec()), id);
    }

    pub fn get_evm_address(&self, address: &[u8; EVM_ADDRESS_LENGTH]) -> Option<EntityId> {
        self.get(&CacheKey::EvmAddress(*address))
    }

    pub fn put_evm_address(&self, address: &[u8; EVM_ADDRESS_LENGTH], id: EntityId) {
        self.put(CacheKey::EvmAddress(*address), id);
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map(|e| e.lock().len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn get(&self, key: &CacheKey) -> Option<EntityId> {
        self.entries.as_ref()?.lock().get(key).copied()
    }

    fn put(&self, key: CacheKey, id: EntityId) {
        if id.is_empty() {
            return;
        }
        if let Some(entries) = &self.entries {
            entries.lock().put(key, id);
        }
    }
}
