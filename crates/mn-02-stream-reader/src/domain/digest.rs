//! # Stream Digests
//!
//! SHA-384 helpers shared by the file readers and the hash chain.

use sha2::{Digest, Sha384};

pub const HASH_LENGTH: usize = 48;

/// A SHA-384 digest.
pub type StreamHash = [u8; HASH_LENGTH];

/// Hash of "no previous file".
pub const EMPTY_HASH: StreamHash = [0u8; HASH_LENGTH];

pub fn sha384(data: &[u8]) -> StreamHash {
    sha384_concat(&[data])
}

/// SHA-384 over several slices in order.
pub fn sha384_concat(parts: &[&[u8]]) -> StreamHash {
    let mut hasher = Sha384::new();
    for part in parts {
        hasher.update(part);
    }
    let mut out = EMPTY_HASH;
    out.copy_from_slice(&hasher.finalize());
    out
}

/// Running hash folded over record stream objects.
///
/// `h' = SHA384(h || SHA384(record || transaction))`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningHash {
    current: StreamHash,
}

impl RunningHash {
    pub fn new(start: StreamHash) -> Self {
        Self { current: start }
    }

    pub fn fold(&mut self, record: &[u8], transaction: &[u8]) {
        let item = sha384_concat(&[record, transaction]);
        self.current = sha384_concat(&[&self.current, &item]);
    }

    pub fn value(&self) -> StreamHash {
        self.current
    }
}

/// Parse a hex digest, as stored on committed file rows.
pub fn parse_hash(value: &str) -> Option<StreamHash> {
    hex::decode(value).ok()?.try_into().ok()
}

pub fn to_hex(hash: &StreamHash) -> String {
    hex::encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha384_known_vector() {
        assert_eq!(
            to_hex(&sha384(b"abc")),
            "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed\
             8086072ba1e7cc2358baeca134c825a7"
        );
    }

    #[test]
    fn test_concat_matches_single_buffer() {
        assert_eq!(sha384_concat(&[b"ab", b"c"]), sha384(b"abc"));
    }

    #[test]
    fn test_running_hash_order_matters() {
        let mut a = RunningHash::new(EMPTY_HASH);
        a.fold(b"r1", b"t1");
        a.fold(b"r2", b"t2");

        let mut b = RunningHash::new(EMPTY_HASH);
        b.fold(b"r2", b"t2");
        b.fold(b"r1", b"t1");
        assert_ne!(a.value(), b.value());
    }

    #[test]
    fn test_parse_hash_round_trip() {
        let hash = sha384(b"file");
        assert_eq!(parse_hash(&to_hex(&hash)), Some(hash));
        assert_eq!(parse_hash("abcd"), None);
        assert_eq!(parse_hash("not hex"), None);
    }
}
