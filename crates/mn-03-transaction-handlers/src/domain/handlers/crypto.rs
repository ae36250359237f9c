//! Account transactions.

use super::{account, affected, SharedResolver};
use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::ids::{key, nanos, seconds, string_value};
use crate::domain::value_objects::AffectedEntity;
use shared_types::{Aggregate, EntityType, RecordItem, TransactionType};

pub struct CryptoCreateHandler {
    resolver: SharedResolver,
}

impl CryptoCreateHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for CryptoCreateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoCreateAccount
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let id = account(&self.resolver, item.receipt().and_then(|r| r.account_id.as_ref()))?;
        Ok(affected(id, EntityType::Account))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, CryptoCreateAccount) else {
            return Ok(());
        };
        let proxy_account_id = account(&self.resolver, body.proxy_account_id.as_ref())?;

        let entity = aggregate.entity_mut();
        entity.created_timestamp = Some(item.consensus_timestamp());
        entity.deleted = Some(false);
        entity.key = key(&body.key);
        entity.auto_renew_period = seconds(&body.auto_renew_period);
        entity.max_automatic_token_associations = Some(body.max_automatic_token_associations);
        entity.memo = Some(body.memo.clone());
        entity.proxy_account_id = proxy_account_id;
        entity.receiver_sig_required = Some(body.receiver_sig_required);
        if !body.alias.is_empty() {
            entity.alias = Some(body.alias.clone());
        }
        Ok(())
    }
}

pub struct CryptoDeleteHandler {
    resolver: SharedResolver,
}

impl CryptoDeleteHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for CryptoDeleteHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoDelete
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let from_body = body!(item, CryptoDelete).and_then(|b| b.delete_account_id.as_ref());
        Ok(affected(account(&self.resolver, from_body)?, EntityType::Account))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        aggregate.entity_mut().deleted = Some(true);
        Ok(())
    }
}

/// Transfers become crypto transfer rows in the processor; no entity changes.
pub struct CryptoTransferHandler;

impl TransactionHandler for CryptoTransferHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoTransfer
    }

    fn get_entity(&self, _item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        Ok(None)
    }
}

pub struct CryptoUpdateHandler {
    resolver: SharedResolver,
}

impl CryptoUpdateHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for CryptoUpdateHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::CryptoUpdateAccount
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        let from_body = body!(item, CryptoUpdateAccount)
            .and_then(|b| b.account_id_to_update.as_ref());
        Ok(affected(account(&self.resolver, from_body)?, EntityType::Account))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, CryptoUpdateAccount) else {
            return Ok(());
        };
        let proxy_account_id = account(&self.resolver, body.proxy_account_id.as_ref())?;

        let entity = aggregate.entity_mut();
        entity.key = key(&body.key);
        entity.expiration_timestamp = nanos(&body.expiration_time);
        entity.auto_renew_period = seconds(&body.auto_renew_period);
        entity.memo = string_value(&body.memo);
        entity.proxy_account_id = proxy_account_id;
        entity.receiver_sig_required = body.receiver_sig_required_wrapper.as_ref().map(|w| w.value);
        Ok(())
    }
}
