//! # Domain Errors
//!
//! Resolution misses are not errors; a handler reports them as "no entity".

use mn_01_entity_id::ResolverError;
use shared_types::{EntityIdError, ListenerError, TransactionType};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// No handler for a type the decoder understands.
    #[error("no handler registered for transaction type {0}")]
    Unregistered(TransactionType),

    /// Registry built without a handler for every known type.
    #[error("handler registry is missing {0:?}")]
    IncompleteRegistry(Vec<TransactionType>),

    #[error("more than one handler registered for {0}")]
    DuplicateHandler(TransactionType),

    #[error(transparent)]
    Resolver(#[from] ResolverError),

    #[error("invalid entity id: {0}")]
    InvalidEntityId(#[from] EntityIdError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}
