//! In-memory `EntityRepository` for tests and the demo network.

use crate::domain::errors::RepositoryError;
use crate::ports::outbound::EntityRepository;
use parking_lot::RwLock;
use shared_types::EntityId;
use std::collections::HashMap;

#[derive(Default)]
pub struct InMemoryEntityRepository {
    aliases: RwLock<HashMap<Vec<u8>, EntityId>>,
    evm_addresses: RwLock<HashMap<Vec<u8>, EntityId>>,
}

impl InMemoryEntityRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_alias(&self, alias: impl Into<Vec<u8>>, id: EntityId) {
        self.aliases.write().insert(alias.into(), id);
    }

    pub fn insert_evm_address(&self, address: impl Into<Vec<u8>>, id: EntityId) {
        self.evm_addresses.write().insert(address.into(), id);
    }
}

impl EntityRepository for InMemoryEntityRepository {
    fn find_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        Ok(self.aliases.read().get(alias).copied())
    }

    fn find_by_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        Ok(self.evm_addresses.read().get(address).copied())
    }
}
