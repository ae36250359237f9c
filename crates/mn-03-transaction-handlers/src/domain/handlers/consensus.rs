//! Consensus topic transactions.

use super::{account, affected, SharedResolver};
use crate::domain::errors::HandlerError;
use crate::domain::handler::TransactionHandler;
use crate::domain::ids::{key, nanos, seconds, string_value, topic_entity};
use crate::domain::value_objects::AffectedEntity;
use shared_types::proto::TopicId;
use shared_types::{Aggregate, EntityType, RecordItem, TransactionType};

fn topic(id: Option<&TopicId>) -> Result<Option<AffectedEntity>, HandlerError> {
    let id = id.map(topic_entity).transpose()?;
    Ok(affected(id, EntityType::Topic))
}

pub struct ConsensusCreateTopicHandler {
    resolver: SharedResolver,
}

impl ConsensusCreateTopicHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ConsensusCreateTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusCreateTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        topic(item.receipt().and_then(|r| r.topic_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, ConsensusCreateTopic) else {
            return Ok(());
        };
        let auto_renew_account_id = account(&self.resolver, body.auto_renew_account.as_ref())?;

        let entity = aggregate.entity_mut();
        entity.created_timestamp = Some(item.consensus_timestamp());
        entity.deleted = Some(false);
        entity.key = key(&body.admin_key);
        entity.submit_key = key(&body.submit_key);
        entity.auto_renew_period = seconds(&body.auto_renew_period);
        entity.auto_renew_account_id = auto_renew_account_id;
        entity.memo = Some(body.memo.clone());
        Ok(())
    }
}

pub struct ConsensusUpdateTopicHandler {
    resolver: SharedResolver,
}

impl ConsensusUpdateTopicHandler {
    pub fn new(resolver: SharedResolver) -> Self {
        Self { resolver }
    }
}

impl TransactionHandler for ConsensusUpdateTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusUpdateTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        topic(body!(item, ConsensusUpdateTopic).and_then(|b| b.topic_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, item: &RecordItem) -> Result<(), HandlerError> {
        let Some(body) = body!(item, ConsensusUpdateTopic) else {
            return Ok(());
        };
        let auto_renew_account_id = account(&self.resolver, body.auto_renew_account.as_ref())?;

        let entity = aggregate.entity_mut();
        entity.expiration_timestamp = nanos(&body.expiration_time);
        entity.key = key(&body.admin_key);
        entity.submit_key = key(&body.submit_key);
        entity.auto_renew_period = seconds(&body.auto_renew_period);
        entity.auto_renew_account_id = auto_renew_account_id;
        entity.memo = string_value(&body.memo);
        Ok(())
    }
}

pub struct ConsensusDeleteTopicHandler;

impl TransactionHandler for ConsensusDeleteTopicHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusDeleteTopic
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        topic(body!(item, ConsensusDeleteTopic).and_then(|b| b.topic_id.as_ref()))
    }

    fn updates_entity(&self) -> bool {
        true
    }

    fn apply(&self, aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        aggregate.entity_mut().deleted = Some(true);
        Ok(())
    }
}

/// Messages become topic message rows in the processor.
pub struct ConsensusSubmitMessageHandler;

impl TransactionHandler for ConsensusSubmitMessageHandler {
    fn transaction_type(&self) -> TransactionType {
        TransactionType::ConsensusSubmitMessage
    }

    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError> {
        topic(body!(item, ConsensusSubmitMessage).and_then(|b| b.topic_id.as_ref()))
    }
}
