//! # Outbound Ports (Driven Ports)
//!
//! Read path into persisted entities.
//!
//! Production: the relational mirror store (mn-04)
//! Testing: `InMemoryEntityRepository`

use crate::domain::errors::RepositoryError;
use shared_types::EntityId;

/// Entity lookups by alternate identifier.
pub trait EntityRepository: Send + Sync {
    fn find_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, RepositoryError>;

    fn find_by_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, RepositoryError>;
}

impl<T: EntityRepository + ?Sized> EntityRepository for std::sync::Arc<T> {
    fn find_by_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        (**self).find_by_alias(alias)
    }

    fn find_by_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, RepositoryError> {
        (**self).find_by_evm_address(address)
    }
}
