//! # Handlers
//!
//! One struct per transaction type, grouped by service.
//!
//! | Group | Types |
//! |-------|-------|
//! | `contract` | call, create, update, delete |
//! | `crypto` | create, delete, transfer, update |
//! | `file` | append, create, delete, update |
//! | `consensus` | create, update, delete topic, submit message |
//! | `system` | system delete, system undelete |
//! | `misc` | freeze, unknown |
//!
//! Create handlers find their entity in the receipt, everything else in the
//! body. Deletes only flip `deleted`.

use super::errors::HandlerError;
use super::value_objects::AffectedEntity;
use mn_01_entity_id::EntityIdResolver;
use shared_types::proto::{AccountId, ContractId};
use shared_types::{EntityId, EntityType};
use std::sync::Arc;

/// The body of `$item` if it carries the `$variant` data.
macro_rules! body {
    ($item:expr, $variant:ident) => {
        match &$item.transaction_body().data {
            Some(shared_types::proto::transaction_body::Data::$variant(body)) => Some(body),
            _ => None,
        }
    };
}

mod consensus;
mod contract;
mod crypto;
mod file;
mod misc;
mod system;

pub use consensus::{
    ConsensusCreateTopicHandler, ConsensusDeleteTopicHandler, ConsensusSubmitMessageHandler,
    ConsensusUpdateTopicHandler,
};
pub use contract::{
    ContractCallHandler, ContractCreateHandler, ContractDeleteHandler, ContractUpdateHandler,
};
pub use crypto::{
    CryptoCreateHandler, CryptoDeleteHandler, CryptoTransferHandler, CryptoUpdateHandler,
};
pub use file::{FileAppendHandler, FileCreateHandler, FileDeleteHandler, FileUpdateHandler};
pub use misc::{FreezeHandler, UnknownDataHandler};
pub use system::{SystemDeleteHandler, SystemUndeleteHandler};

/// Resolver shared by every handler that needs one.
pub type SharedResolver = Arc<dyn EntityIdResolver>;

fn account(
    resolver: &SharedResolver,
    id: Option<&AccountId>,
) -> Result<Option<EntityId>, HandlerError> {
    match id {
        Some(id) => Ok(resolver.lookup_account(id)?),
        None => Ok(None),
    }
}

fn contract(
    resolver: &SharedResolver,
    id: Option<&ContractId>,
) -> Result<Option<EntityId>, HandlerError> {
    match id {
        Some(id) => Ok(resolver.lookup_contract(id)?),
        None => Ok(None),
    }
}

fn affected(id: Option<EntityId>, kind: EntityType) -> Option<AffectedEntity> {
    id.and_then(EntityId::non_empty)
        .map(|id| AffectedEntity::new(id, kind))
}
