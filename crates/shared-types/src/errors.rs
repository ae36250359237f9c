//! # Error Types
//!
//! Errors shared across subsystems. Identifier and record item errors live
//! next to their types and are re-exported here.

use thiserror::Error;

pub use crate::entity_id::EntityIdError;
pub use crate::record_item::RecordItemError;

/// Failures surfaced through the listener seams.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListenerError {
    /// A row arrived outside an open unit of work.
    #[error("no file in progress for {operation}")]
    NoFileInProgress { operation: &'static str },

    /// `on_start` while a previous file is still open.
    #[error("a file is already in progress")]
    FileInProgress,

    /// The backing store rejected the write.
    #[error("persistence failure: {0}")]
    Persistence(String),
}
