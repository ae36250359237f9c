//! Ingestion errors.

use mn_02_stream_reader::StreamFileError;
use mn_03_transaction_handlers::HandlerError;
use mn_04_entity_listener::StoreError;
use mn_06_date_range_filter::DateRangeError;
use shared_types::ListenerError;
use thiserror::Error;

/// Why a pass over a stream stopped early.
///
/// Files committed before the failing one stay committed; the failing file
/// contributes nothing.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error(transparent)]
    Stream(#[from] StreamFileError),

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    DateRange(#[from] DateRangeError),

    /// The last committed record file carries a hash that is not 48 hex bytes.
    #[error("last record file {file} has unreadable hash '{hash}'")]
    CorruptTip { file: String, hash: String },
}
