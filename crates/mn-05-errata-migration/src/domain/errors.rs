//! # Domain Errors
//!
//! Every variant is fatal for the migration that raised it: a partially
//! applied historical correction is worse than none.

use mn_02_stream_reader::StreamFileError;
use mn_03_transaction_handlers::HandlerError;
use mn_04_entity_listener::StoreError;
use shared_types::ListenerError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MigrationError {
    /// An errata file could not be read or decoded.
    #[error("Error parsing errata file {file}")]
    FileOperation {
        file: String,
        #[source]
        source: StreamFileError,
    },

    /// The balance offset table could not be loaded.
    #[error("invalid balance offset table {source_name} at line {line}: {reason}")]
    OffsetTable {
        source_name: String,
        line: usize,
        reason: String,
    },

    #[error("invalid migration version {0:?}")]
    InvalidVersion(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Listener(#[from] ListenerError),
}
