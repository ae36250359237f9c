//! # Domain Errors
//!
//! Format violations raised while reading stream files.
//!
//! Every variant names the file, and positional failures carry the byte
//! offset where the bad field starts, so an operator can locate the problem
//! without re-running the importer.

use shared_types::RecordItemError;
use thiserror::Error;

/// A stream file could not be read.
///
/// All variants are fatal for the current file. Files committed earlier are
/// not affected.
#[derive(Debug, Error)]
pub enum StreamFileError {
    /// Fewer bytes remain than the field declares.
    #[error(
        "{file}: truncated {field} at offset {offset}: need {needed} bytes, {available} available"
    )]
    Truncated {
        file: String,
        offset: usize,
        field: &'static str,
        needed: usize,
        available: usize,
    },

    /// A length prefix outside the field's bounds.
    #[error("{file}: {field} length {length} at offset {offset} outside [{min}, {max}]")]
    LengthOutOfBounds {
        file: String,
        offset: usize,
        field: &'static str,
        length: i64,
        min: usize,
        max: usize,
    },

    /// A length checksum that does not match its length.
    #[error("{file}: {field} checksum at offset {offset} is {actual}, expected {expected}")]
    ChecksumMismatch {
        file: String,
        offset: usize,
        field: &'static str,
        expected: i32,
        actual: i32,
    },

    /// A type marker or class tag with the wrong value.
    #[error("{file}: unexpected {field} {actual:#x} at offset {offset}, expected {expected:#x}")]
    UnexpectedValue {
        file: String,
        offset: usize,
        field: &'static str,
        expected: i64,
        actual: i64,
    },

    /// Bytes left after the last field.
    #[error("{file}: {remaining} trailing bytes at offset {offset}")]
    TrailingBytes {
        file: String,
        offset: usize,
        remaining: usize,
    },

    #[error("{file}: unsupported {kind} file version {version}")]
    UnsupportedVersion {
        file: String,
        kind: &'static str,
        version: i32,
    },

    /// The folded running hash differs from the declared end hash.
    #[error("{file}: running hash mismatch, computed {actual} but file declares {expected}")]
    RunningHashMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// The declared previous hash does not link to the last accepted file.
    #[error(
        "{file}: hash chain broken, expected previous hash {expected} but file declares {actual}"
    )]
    ChainBroken {
        file: String,
        expected: String,
        actual: String,
    },

    /// The signed hash differs from the data file's hash.
    #[error("{file}: signed hash {signed} does not match file hash {actual}")]
    SignatureHashMismatch {
        file: String,
        signed: String,
        actual: String,
    },

    /// A transaction or record that does not decode.
    #[error("{file}: item {index} at offset {offset}: {source}")]
    Item {
        file: String,
        index: u64,
        offset: usize,
        #[source]
        source: RecordItemError,
    },

    /// A malformed balance file line.
    #[error("{file}: line {line}: {reason}")]
    Balance {
        file: String,
        line: usize,
        reason: String,
    },

    /// A malformed event file.
    #[error("{file}: invalid event file: {reason}")]
    InvalidEventFile { file: String, reason: String },

    /// The stream was used after it failed.
    #[error("{file}: stream already failed")]
    Aborted { file: String },

    #[error("{file}: I/O error: {source}")]
    Io {
        file: String,
        #[source]
        source: std::io::Error,
    },
}

impl StreamFileError {
    /// Name of the file the error refers to.
    pub fn file(&self) -> &str {
        match self {
            Self::Truncated { file, .. }
            | Self::LengthOutOfBounds { file, .. }
            | Self::ChecksumMismatch { file, .. }
            | Self::UnexpectedValue { file, .. }
            | Self::TrailingBytes { file, .. }
            | Self::UnsupportedVersion { file, .. }
            | Self::RunningHashMismatch { file, .. }
            | Self::ChainBroken { file, .. }
            | Self::SignatureHashMismatch { file, .. }
            | Self::Item { file, .. }
            | Self::Balance { file, .. }
            | Self::InvalidEventFile { file, .. }
            | Self::Aborted { file }
            | Self::Io { file, .. } => file,
        }
    }

    /// True for hash chain and running hash failures.
    pub fn is_consistency_failure(&self) -> bool {
        matches!(
            self,
            Self::ChainBroken { .. } | Self::RunningHashMismatch { .. }
        )
    }
}
