//! # Signature Files
//!
//! `0x04, hash[48], 0x03, int length, signature`
//!
//! A node signs the hash of each data file it writes. Signature
//! verification itself is out of scope; the signed hash is compared with the
//! hash the reader computed for the data file.

use super::cursor::StreamCursor;
use super::digest::{StreamHash, HASH_LENGTH};
use super::errors::StreamFileError;
use super::value_objects::{ReaderConfig, MARKER_FILE_HASH, MARKER_SIGNATURE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureFile {
    pub name: String,
    pub file_hash: StreamHash,
    pub signature: Vec<u8>,
}

impl SignatureFile {
    pub fn read(file: &str, bytes: &[u8], config: &ReaderConfig) -> Result<Self, StreamFileError> {
        let mut cursor = StreamCursor::new(file, bytes);
        cursor.read_marker(MARKER_FILE_HASH, "file hash marker")?;
        let file_hash = cursor.read_array::<HASH_LENGTH>("file hash")?;
        cursor.read_marker(MARKER_SIGNATURE, "signature marker")?;
        let signature =
            cursor.read_length_and_bytes(1, config.max_signature_length, false, "signature")?;
        cursor.expect_end()?;

        Ok(Self {
            name: file.to_string(),
            file_hash,
            signature: signature.to_vec(),
        })
    }

    /// Check the signed hash against the computed hash of its data file.
    pub fn verify_file_hash(&self, actual: &StreamHash) -> Result<(), StreamFileError> {
        if &self.file_hash == actual {
            return Ok(());
        }
        Err(StreamFileError::SignatureHashMismatch {
            file: self.name.clone(),
            signed: hex::encode(self.file_hash),
            actual: hex::encode(actual),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::digest::sha384;
    use crate::test_utils::signature_file;

    #[test]
    fn test_read_and_verify() {
        let hash = sha384(b"record file");
        let bytes = signature_file(&hash, &[9u8; 256]);
        let sig = SignatureFile::read("a.rcd_sig", &bytes, &ReaderConfig::default()).unwrap();
        assert_eq!(sig.signature.len(), 256);
        assert!(sig.verify_file_hash(&hash).is_ok());
        assert!(matches!(
            sig.verify_file_hash(&sha384(b"other")),
            Err(StreamFileError::SignatureHashMismatch { .. })
        ));
    }

    #[test]
    fn test_oversized_signature_rejected() {
        let bytes = signature_file(&sha384(b"x"), &[1u8; 64]);
        let config = ReaderConfig::default().with_max_signature_length(32);
        assert!(matches!(
            SignatureFile::read("a.rcd_sig", &bytes, &config),
            Err(StreamFileError::LengthOutOfBounds { max: 32, .. })
        ));
    }

    #[test]
    fn test_trailing_garbage_rejected() {
        let mut bytes = signature_file(&sha384(b"x"), &[1u8; 16]);
        bytes.push(0);
        assert!(matches!(
            SignatureFile::read("a.rcd_sig", &bytes, &ReaderConfig::default()),
            Err(StreamFileError::TrailingBytes { remaining: 1, .. })
        ));
    }
}
