//! # EntityId Service
//!
//! The resolver implementation, generic over the entity repository.

use crate::domain::cache::ResolverCache;
use crate::domain::errors::ResolverError;
use crate::domain::value_objects::EntityIdConfig;
use crate::ports::inbound::EntityIdResolver;
use crate::ports::outbound::EntityRepository;
use shared_types::proto::{account_id, contract_id, AccountId, ContractId};
use shared_types::{Entity, EntityId, EntityIdError, EVM_ADDRESS_LENGTH};
use tracing::debug;

/// Resolves identifiers against a repository with a bounded cache in front.
pub struct EntityIdService<R: EntityRepository> {
    repository: R,
    cache: ResolverCache,
}

impl<R: EntityRepository> EntityIdService<R> {
    pub fn new(repository: R, config: EntityIdConfig) -> Self {
        let cache = if config.cache_enabled {
            ResolverCache::new(config.cache_size)
        } else {
            ResolverCache::disabled()
        };
        Self { repository, cache }
    }

    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    fn to_address(address: &[u8]) -> Result<[u8; EVM_ADDRESS_LENGTH], ResolverError> {
        address
            .try_into()
            .map_err(|_| EntityIdError::InvalidEvmAddressLength(address.len()).into())
    }
}

impl<R: EntityRepository> EntityIdResolver for EntityIdService<R> {
    fn lookup_account(&self, account_id: &AccountId) -> Result<Option<EntityId>, ResolverError> {
        match &account_id.account {
            None => Ok(None),
            Some(account_id::Account::AccountNum(num)) => Ok(EntityId::from_parts(
                account_id.shard_num,
                account_id.realm_num,
                *num,
            )?
            .non_empty()),
            Some(account_id::Account::Alias(alias)) => self.lookup_alias(alias),
        }
    }

    fn lookup_contract(&self, contract_id: &ContractId) -> Result<Option<EntityId>, ResolverError> {
        match &contract_id.contract {
            None => Ok(None),
            Some(contract_id::Contract::ContractNum(num)) => Ok(EntityId::from_parts(
                contract_id.shard_num,
                contract_id.realm_num,
                *num,
            )?
            .non_empty()),
            Some(contract_id::Contract::EvmAddress(address)) => self.lookup_evm_address(address),
        }
    }

    fn lookup_alias(&self, alias: &[u8]) -> Result<Option<EntityId>, ResolverError> {
        if alias.is_empty() {
            return Err(ResolverError::EmptyAlias);
        }
        if let Some(id) = self.cache.get_alias(alias) {
            return Ok(Some(id));
        }

        if alias.len() == EVM_ADDRESS_LENGTH {
            if let Some(id) = EntityId::from_evm_address(alias)?.and_then(EntityId::non_empty) {
                return Ok(Some(id));
            }
        }

        let mut found = self.repository.find_by_alias(alias)?;
        if found.is_none() && alias.len() == EVM_ADDRESS_LENGTH {
            found = self.repository.find_by_evm_address(alias)?;
        }

        match found {
            Some(id) => self.cache.put_alias(alias, id),
            None => debug!("[mn-01] alias {} not found", hex::encode(alias)),
        }
        Ok(found)
    }

    fn lookup_evm_address(&self, address: &[u8]) -> Result<Option<EntityId>, ResolverError> {
        let key = Self::to_address(address)?;
        if let Some(id) = EntityId::from_evm_address(&key)?.and_then(EntityId::non_empty) {
            return Ok(Some(id));
        }
        if let Some(id) = self.cache.get_evm_address(&key) {
            return Ok(Some(id));
        }

        let found = self.repository.find_by_evm_address(&key)?;
        match found {
            Some(id) => self.cache.put_evm_address(&key, id),
            None => debug!("[mn-01] EVM address {} not found", hex::encode(key)),
        }
        Ok(found)
    }

    fn notify(&self, entity: &Entity) {
        if let Some(alias) = entity.alias.as_deref().filter(|a| !a.is_empty()) {
            self.cache.put_alias(alias, entity.id);
        }
        if let Some(Ok(address)) = entity.evm_address.as_deref().map(Self::to_address) {
            self.cache.put_evm_address(&address, entity.id);
        }
    }
}
