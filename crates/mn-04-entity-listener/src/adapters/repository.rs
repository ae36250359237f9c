//! Alias and EVM address lookups served from a `MirrorStore`.

use crate::ports::outbound::MirrorStore;
use mn_01_entity_id::{EntityRepository, RepositoryError};
use shared_types::EntityId;

pub struct StoreEntityRepository<S> {
    store: S,
}

impl<S: MirrorStore> StoreEntityRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S: MirrorStore> EntityRepository for StoreEntityRepository<S> {
    fn find_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        self.store
            .find_entity_id_by_alias(alias)
            .map_err(|e| RepositoryError::new(e.to_string()))
    }

    fn find_by_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        self.store
            .find_entity_id_by_evm_address(address)
            .map_err(|e| RepositoryError::new(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryMirrorStore;
    use crate::domain::batch::Batch;
    use shared_types::{Entity, EntityType};
    use std::sync::Arc;

    #[test]
    fn test_lookups_read_committed_entities() {
        let store = Arc::new(InMemoryMirrorStore::new());
        let id = EntityId::of(0, 0, 2002).unwrap();
        let mut entity = Entity::new(id, EntityType::Account);
        entity.alias = Some(vec![9; 33]);
        entity.evm_address = Some(vec![0x11; 20]);
        let mut batch = Batch::new();
        batch.add_entity(entity);
        store.commit(batch).unwrap();

        let repository = StoreEntityRepository::new(store.clone());
        assert_eq!(repository.find_by_alias(&[9; 33]).unwrap(), Some(id));
        assert_eq!(repository.find_by_evm_address(&[0x11; 20]).unwrap(), Some(id));
        assert_eq!(repository.find_by_alias(&[1; 33]).unwrap(), None);
    }
}
