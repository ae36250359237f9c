//! # Inbound Ports (Driving Ports)
//!
//! The resolver API consumed by the transaction handlers.

use crate::domain::errors::ResolverError;
use shared_types::proto::{AccountId, ContractId};
use shared_types::{Entity, EntityId};

/// Resolves ledger identifier structures to canonical ids.
///
/// Implementations must be safe to call from many threads.
pub trait EntityIdResolver: Send + Sync {
    /// Resolve an account id, which may carry a number or an alias.
    fn lookup_account(&self, account_id: &AccountId) -> Result<Option<EntityId>, ResolverError>;

    /// Resolve a contract id, which may carry a number or an EVM address.
    fn lookup_contract(&self, contract_id: &ContractId)
        -> Result<Option<EntityId>, ResolverError>;

    /// Resolve raw alias bytes.
    fn lookup_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, ResolverError>;

    /// Resolve a 20-byte EVM address.
    fn lookup_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, ResolverError>;

    /// Record the alias and EVM address of an entity seen during ingestion,
    /// so later items in the same file resolve before it is committed.
    fn notify(&self, entity: &Entity);
}
