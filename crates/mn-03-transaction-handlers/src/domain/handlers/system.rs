//! Administrative delete and undelete of files and contracts.
//!
//! The target is a oneof. A contract target is resolved and produces a
//! contract aggregate; a file target is taken as-is and produces a plain
//! entity.

use super::{affected, contract, SharedResolver};
use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::ids::file_entity;
use crate::domain::value_objects::AffectedEntity;
use shared_types::proto::{
    system_delete_transaction_body, system_undelete_transaction_body, ContractId, FileId,
};
use shared_types::{Aggregate, EntityType, RecordItem, TransactionType};

fn target(
    resolver: &SharedResolver,
    file_id: Option<&FileId>,
    contract_id: Option<&ContractId>,
) -> Result<Option<AffectedEntity>, HandlerError> {
    if let Some(id) = contract_id {
        return Ok(affected(contract(resolver, Some(id))?, EntityType::Contract));
    }
    match file_id {
        Some(id) => Ok(affected(Some(file_entity(id)?), EntityType::File)),
        None => Ok(None),
    }
}

pub struct SystemDeleteHandler {
    resolver: SharedResolver,
}

impl SystemDeleteHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for SystemDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SystemDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        use system_delete_transaction_body::Id;
        match body!(item, SystemDelete).and_then(|b| b.id.as_ref()) {
            Some(Id::ContractId(id)) => target(&self.resolver, None, Some(id)),
            Some(Id::FileId(id)) => target(&self.resolver, Some(id), None),
            None => Ok(None),
        }
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        aggregate.entity_mut().deleted = Some(true);
        Ok(())
    }
}

pub struct SystemUndeleteHandler {
    resolver: SharedResolver,
}

impl SystemUndeleteHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for SystemUndeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::SystemUndelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        use system_undelete_transaction_body::Id;
        match body!(item, SystemUndelete).and_then(|b| b.id.as_ref()) {
            Some(Id::ContractId(id)) => target(&self.resolver, None, Some(id)),
            Some(Id::FileId(id)) => target(&self.resolver, Some(id), None),
            None => Ok(None),
        }
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        aggregate.entity_mut().deleted = Some(false);
        Ok(())
    }
}
