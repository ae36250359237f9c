//! Smart contract transactions.

use super::{account, affected, contract, SharedResolver};
use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::ids::{file_entity, key, nanos, seconds, string_value};
use crate::domain::value_objects::AffectedEntity;
use shared_types::proto::transaction_record::Body;
use shared_types::{Aggregate, EntityType, RecordItem, TransactionType};

pub struct ContractCallHandler {
    resolver: SharedResolver,
}

impl ContractCallHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ContractCallHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractCall
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let from_receipt = item.receipt().and_then(|r| r.contract_id.as_ref());
        let from_body = body!(item, ContractCall).and_then(|b| b.contract_id.as_ref());
        let id = contract(&self.resolver, from_receipt.or(from_body))?;
        Ok(affected(id, EntityType::Contract))
    }
}

pub struct ContractCreateHandler {
    resolver: SharedResolver,
}

impl ContractCreateHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ContractCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractCreateInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let id = contract(&self.resolver, item.receipt().and_then(|r| r.contract_id.as_ref()))?;
        Ok(affected(id, EntityType::Contract))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, ContractCreateInstance) else {
            return Ok(());
        };
        let proxy_account_id = account(&self.resolver, body.proxy_account_id.as_ref())?;
        let file_id = body.file_id.as_ref().map(file_entity).transpose()?;
        let evm_address = match &item.record().body {
            Some(Body::ContractCreateResult(result)) => {
                result.evm_address.as_ref().map(|a| a.value.clone())
            }
            _ => None,
        };

        let Some(contract) = aggregate.as_contract_mut() else {
            return Ok(());
        };
        contract.entity.created_timestamp = Some(item.consensus_timestamp());
        contract.entity.deleted = Some(false);
        contract.entity.auto_renew_period = seconds(&body.auto_renew_period);
        contract.entity.key = key(&body.admin_key);
        contract.entity.memo = Some(body.memo.clone());
        contract.entity.proxy_account_id = proxy_account_id;
        contract.entity.evm_address = evm_address.filter(|a| !a.is_empty());
        contract.file_id = file_id;
        if !body.initcode.is_empty() {
            contract.initcode = Some(body.initcode.clone());
        }
        Ok(())
    }
}

pub struct ContractUpdateHandler {
    resolver: SharedResolver,
}

impl ContractUpdateHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ContractUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractUpdateInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let from_receipt = item.receipt().and_then(|r| r.contract_id.as_ref());
        let from_body = body!(item, ContractUpdateInstance).and_then(|b| b.contract_id.as_ref());
        let id = contract(&self.resolver, from_body.or(from_receipt))?;
        Ok(affected(id, EntityType::Contract))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, ContractUpdateInstance) else {
            return Ok(());
        };
        let proxy_account_id = account(&self.resolver, body.proxy_account_id.as_ref())?;

        let entity = aggregate.entity_mut();
        entity.expiration_timestamp = nanos(&body.expiration_time);
        entity.auto_renew_period = seconds(&body.auto_renew_period);
        entity.key = key(&body.admin_key);
        entity.memo = string_value(&body.memo_wrapper);
        entity.proxy_account_id = proxy_account_id;
        Ok(())
    }
}

pub struct ContractDeleteHandler {
    resolver: SharedResolver,
}

impl ContractDeleteHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ContractDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ContractDeleteInstance
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let from_body = body!(item, ContractDeleteInstance).and_then(|b| b.contract_id.as_ref());
        let from_receipt = item.receipt().and_then(|r| r.contract_id.as_ref());
        let id = contract(&self.resolver, from_body.or(from_receipt))?;
        Ok(affected(id, EntityType::Contract))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, ContractDeleteInstance) else {
            return Ok(());
        };
        let obtainer_id = match account(&self.resolver, body.transfer_account_id.as_ref())? {
            Some(id) => Some(id),
            None => contract(&self.resolver, body.transfer_contract_id.as_ref())?,
        };

        aggregate.entity_mut().deleted = Some(true);
        if let Some(contract) = aggregate.as_contract_mut() {
            contract.obtainer_id = obtainer_id;
            contract.permanent_removal = Some(body.permanent_removal);
        }
        Ok(())
    }
}
