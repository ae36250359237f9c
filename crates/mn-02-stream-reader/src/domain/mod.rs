//! # Domain Layer
//!
//! Pure parsing and verification logic; no filesystem access.
//!
//! - `cursor` - bounds-checked field reads
//! - `digest` - SHA-384 and running hash
//! - `record_file` - v1/v2/v5 record files
//! - `signature` - node signature files
//! - `balance` - account balance CSV files
//! - `event` - event files
//! - `chain` - hash chain verification
//! - `errors` - `StreamFileError`
//! - `value_objects` - format constants and `ReaderConfig`

pub mod balance;
pub mod chain;
pub mod cursor;
pub mod digest;
pub mod errors;
pub mod event;
pub mod record_file;
pub mod signature;
pub mod value_objects;
