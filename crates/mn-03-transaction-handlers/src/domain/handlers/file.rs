//! File service transactions.

use super::affected;
use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::ids::{file_entity, key_list, nanos, string_value};
use crate::domain::value_objects::AffectedEntity;
use shared_types::proto::FileId;
use shared_types::{Aggregate, EntityType, RecordItem, TransactionType};

fn file(id: Option<&FileId>) -> Result<Option<AffectedEntity>, HandlerError> {
    let id = id.map(file_entity).transpose()?;
    Ok(affected(id, EntityType::File))
}

/// Appends change contents only, which are not kept on the entity.
pub struct FileAppendHandler;

impl TransactionHandler for FileAppendHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileAppend
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        file(body!(item, FileAppend).and_then(|b| b.file_id.as_ref()))
    }
}

pub struct FileCreateHandler;

impl TransactionHandler for FileCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileCreate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        file(item.receipt().and_then(|r| r.file_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, FileCreate) else {
            return Ok(());
        };
        let entity = aggregate.entity_mut();
        entity.created_timestamp = Some(item.consensus_timestamp());
        entity.deleted = Some(false);
        entity.expiration_timestamp = nanos(&body.expiration_time);
        entity.key = key_list(&body.keys);
        entity.memo = Some(body.memo.clone());
        Ok(())
    }
}

pub struct FileDeleteHandler;

impl TransactionHandler for FileDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        file(body!(item, FileDelete).and_then(|b| b.file_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        aggregate.entity_mut().deleted = Some(true);
        Ok(())
    }
}

pub struct FileUpdateHandler;

impl TransactionHandler for FileUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::FileUpdate
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        file(body!(item, FileUpdate).and_then(|b| b.file_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, FileUpdate) else {
            return Ok(());
        };
        let entity = aggregate.entity_mut();
        entity.expiration_timestamp = nanos(&body.expiration_time);
        entity.key = key_list(&body.keys);
        entity.memo = string_value(&body.memo);
        Ok(())
    }
}
