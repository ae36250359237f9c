//! # Transaction Handler
//!
//! One implementation per transaction type. A handler is a pair of
//! functions: `get_entity` names the entity a transaction affects, `apply`
//! sets the fields it changes on a fresh aggregate. Handlers never write;
//! the processor hands the aggregate to the listener.

use super::errors::HandlerError;
use super::value_objects::AffectedEntity;
use shared_types::{Aggregate, EntityListener, ListenerError, RecordItem, TransactionType};

pub trait TransactionHandler: Send + Sync {
    fn transaction_type(&self) -> TransactionType;

    /// The affected entity, `Ok(None)` when there is none or it does not resolve.
    fn get_entity(&self, item: &RecordItem) -> Result<Option<AffectedEntity>, HandlerError>;

    /// Whether a successful transaction of this type mutates its entity.
    fn updates_entity(&self) -> bool {
        false
    }

    /// Set the fields this transaction changes.
    ///
    /// Only called for successful items that affect an entity. Must assign
    /// values, never accumulate, so replaying an item is harmless.
    fn apply(&self, _aggregate: &mut Aggregate, _item: &RecordItem) -> Result<(), HandlerError> {
        Ok(())
    }
}

/// Build the aggregate for a successful item. `None` if the handler does not
/// update entities.
pub fn build_aggregate(
    handler: &dyn TransactionHandler,
    affected: AffectedEntity,
    item: &RecordItem,
) -> Result<Option<Aggregate>, HandlerError> {
    if !handler.updates_entity() || affected.id.is_empty() {
        return Ok(None);
    }
    let mut aggregate = Aggregate::new(affected.id, affected.kind);
    aggregate.entity_mut().timestamp_range_start = Some(item.consensus_timestamp());
    handler.apply(&mut aggregate, item)?;
    Ok(Some(aggregate))
}

/// Route an aggregate to the listener method for its shape.
pub fn do_update_entity(
    aggregate: Aggregate,
    listener: &mut dyn EntityListener,
) -> Result<(), ListenerError> {
    match aggregate {
        Aggregate::Contract(contract) => listener.on_contract(contract),
        Aggregate::Entity(entity) => listener.on_entity(entity),
    }
}
