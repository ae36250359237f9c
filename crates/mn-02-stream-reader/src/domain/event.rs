//! # Event Files
//!
//! `int version, 0x01, prev[48], body`; the file hash is `SHA384(file)`.
//! The body is opaque to the importer.

use super::cursor::StreamCursor;
use super::digest::{sha384, StreamHash, HASH_LENGTH};
use super::errors::StreamFileError;
use super::value_objects::MARKER_PREVIOUS_HASH;

const SUPPORTED_VERSIONS: [i32; 2] = [2, 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFile {
    pub name: String,
    pub version: i32,
    pub previous_hash: StreamHash,
    pub hash: StreamHash,
    pub body_length: usize,
}

impl EventFile {
    pub fn read(file: &str, bytes: &[u8]) -> Result<Self, StreamFileError> {
        let mut cursor = StreamCursor::new(file, bytes);
        let version = cursor.read_i32("event file version")?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(StreamFileError::InvalidEventFile {
                file: file.to_string(),
                reason: format!("version {version} is not one of {SUPPORTED_VERSIONS:?}"),
            });
        }
        cursor.read_marker(MARKER_PREVIOUS_HASH, "previous hash marker")?;
        let previous_hash = cursor.read_array::<HASH_LENGTH>("previous hash")?;

        Ok(Self {
            name: file.to_string(),
            version,
            previous_hash,
            hash: sha384(bytes),
            body_length: cursor.remaining(),
        })
    }
}
