//! # Value Objects
//!
//! Format constants and reader configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for a serialized transaction.
pub const MAX_TRANSACTION_LENGTH: usize = 6 * 1024;

/// Upper bound for a serialized transaction record.
pub const MAX_RECORD_LENGTH: usize = 64 * 1024;

/// Upper bound for a node signature.
pub const MAX_SIGNATURE_LENGTH: usize = 6 * 1024;

/// Marker preceding the previous-file hash in v1/v2 record and event files.
pub const MARKER_PREVIOUS_HASH: u8 = 1;
/// Marker preceding each item in v1/v2 record files.
pub const MARKER_RECORD: u8 = 2;
/// Marker preceding the signature in a signature file.
pub const MARKER_SIGNATURE: u8 = 3;
/// Marker preceding the signed file hash in a signature file.
pub const MARKER_FILE_HASH: u8 = 4;

/// Class id of a v5 hash object.
pub const HASH_OBJECT_CLASS_ID: i64 = 0xf422_da83_a251_741e_u64 as i64;
/// Class id of a v5 record stream object.
pub const RECORD_STREAM_OBJECT_CLASS_ID: i64 = 0xe370_929b_a542_9d8b_u64 as i64;
pub const OBJECT_CLASS_VERSION: i32 = 1;
/// Digest type tag of SHA-384 in a v5 hash object.
pub const SHA384_DIGEST_TYPE: i32 = 0x58ff_811b;
pub const OBJECT_STREAM_VERSION: i32 = 1;

/// Stream kinds written by consensus nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamType {
    Record,
    Balance,
    Event,
}

impl StreamType {
    /// Data file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            StreamType::Record => "rcd",
            StreamType::Balance => "csv",
            StreamType::Event => "evts",
        }
    }

    /// Directory name under the data root.
    pub fn path(&self) -> &'static str {
        match self {
            StreamType::Record => "recordstreams",
            StreamType::Balance => "accountBalances",
            StreamType::Event => "eventsStreams",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamType::Record => "record",
            StreamType::Balance => "balance",
            StreamType::Event => "event",
        })
    }
}

/// Field bounds used by the readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReaderConfig {
    pub max_transaction_length: usize,
    pub max_record_length: usize,
    pub max_signature_length: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_transaction_length: MAX_TRANSACTION_LENGTH,
            max_record_length: MAX_RECORD_LENGTH,
            max_signature_length: MAX_SIGNATURE_LENGTH,
        }
    }
}

impl ReaderConfig {
    pub fn with_max_transaction_length(mut self, length: usize) -> Self {
        self.max_transaction_length = length;
        self
    }

    pub fn with_max_record_length(mut self, length: usize) -> Self {
        self.max_record_length = length;
        self
    }

    pub fn with_max_signature_length(mut self, length: usize) -> Self {
        self.max_signature_length = length;
        self
    }
}
