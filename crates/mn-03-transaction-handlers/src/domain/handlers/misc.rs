//! Network freeze and transactions whose body the decoder does not know.

use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::value_objects::AffectedEntity;
use shared_types::{RecordItem, TransactionType};

pub struct FreezeHandler;

impl TransactionHandler for FreezeHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::Freeze
    }

    fn get_entity(&self, _item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        Ok(None)
    }
}

/// Keeps the transaction row for bodies newer than this decoder.
pub struct UnknownDataHandler;

impl TransactionHandler for UnknownDataHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::Unknown
    }

    fn get_entity(&self, _item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        Ok(None)
    }
}
