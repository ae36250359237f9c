//! # Transaction Handlers (mn-03)
//!
//! Dispatches every record item to the handler for its transaction type and
//! turns it into rows for the entity listener.
//!
//! ## Dispatch
//!
//! ```text
//! RecordItem ──→ HandlerRegistry::get(type) ──→ handler.get_entity()
//!                                                   │
//!     Transaction / CryptoTransfer / ContractResult / TopicMessage rows
//!                                                   │
//!        successful + entity ──→ handler.apply(Aggregate) ──→ on_entity | on_contract
//! ```
//!
//! The registry is checked at construction: every [`TransactionType`]
//! must have a handler, even if it is a no-op.
//!
//! ## Hexagonal Architecture
//!
//! - `domain/` - handler trait, handlers, registry, errors
//! - `ports/` - `RecordItemListener` (inbound); listener and resolver (outbound)
//! - `service/` - `RecordItemProcessor`
//!
//! [`TransactionType`]: shared_types::TransactionType

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::HandlerError;
pub use domain::handler::{build_aggregate, do_update_entity, TransactionHandler};
pub use domain::handlers::SharedResolver;
pub use domain::registry::HandlerRegistry;
pub use domain::value_objects::{AffectedEntity, ProcessorConfig};
pub use ports::inbound::RecordItemListener;
pub use service::RecordItemProcessor;
