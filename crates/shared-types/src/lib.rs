//! # Shared Types Crate
//!
//! Ledger identifiers, protobuf messages, record items, persisted rows and the
//! listener seams used by every mirror node subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: all cross-subsystem types are defined here.
//! - **Immutable inputs**: a `RecordItem` is only built by parsing bytes.
//! - **Merge, not replace**: aggregates carry only the fields a handler set.

pub mod entities;
pub mod entity_id;
pub mod errors;
pub mod listener;
pub mod proto;
pub mod record_item;

pub use entities::*;
pub use entity_id::{EntityId, EntityType, EVM_ADDRESS_LENGTH};
pub use errors::*;
pub use listener::{BalanceStreamFileListener, EntityListener, RecordStreamFileListener};
pub use record_item::{response_code, RecordItem, TransactionType};
