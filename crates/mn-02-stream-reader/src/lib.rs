//! # Stream File Reader (mn-02)
//!
//! Parses the binary artifacts consensus nodes write and verifies that they
//! link into an unbroken hash chain.
//!
//! ## Stream Files
//!
//! | Stream | Reader | Chain hash |
//! |--------|--------|------------|
//! | Record (`.rcd`) | [`RecordFileReader`] | v1 file digest, v2 split digest, v5 running hash |
//! | Signature (`.rcd_sig`) | [`SignatureFile`] | n/a |
//! | Balance (`.csv`) | [`read_balance_file`] | n/a |
//! | Event (`.evts`) | [`EventFile`] | file digest |
//!
//! ## Failure Model
//!
//! Every violation is a [`StreamFileError`] naming the file and, for field
//! errors, the byte offset. Violations are fatal for the file being read and
//! never for files committed before it.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - cursor, digests, readers, hash chain
//! - `ports/` - `StreamFileSource`
//! - `adapters/` - directory and in-memory sources
//! - `test_utils` - stream file writers (feature `test-utils`)

pub mod adapters;
pub mod domain;
pub mod ports;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use adapters::{DirectoryStreamSource, InMemoryStreamSource};
pub use domain::balance::{read_balance_file, ParsedBalanceFile};
pub use domain::chain::HashChainVerifier;
pub use domain::cursor::StreamCursor;
pub use domain::digest::{parse_hash, sha384, RunningHash, StreamHash, EMPTY_HASH, HASH_LENGTH};
pub use domain::errors::StreamFileError;
pub use domain::event::EventFile;
pub use domain::record_file::{
    HapiVersion, RecordFileHeader, RecordFileReader, RecordFileStream, RecordFileSummary,
};
pub use domain::signature::SignatureFile;
pub use domain::value_objects::{
    ReaderConfig, StreamType, MAX_RECORD_LENGTH, MAX_TRANSACTION_LENGTH,
};
pub use ports::outbound::StreamFileSource;
