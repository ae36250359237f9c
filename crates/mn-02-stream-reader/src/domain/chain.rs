//! # Hash Chain
//!
//! Each stream file declares the hash of its predecessor. The verifier keeps
//! the last accepted hash per stream and rejects any file whose declared
//! previous hash differs, unless the file is a known, authorised
//! discontinuity.

use super::digest::StreamHash;
use super::errors::StreamFileError;
use super::value_objects::StreamType;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Tracks the chain tip of every stream.
#[derive(Debug, Clone)]
pub struct HashChainVerifier {
    tips: HashMap<StreamType, (String, StreamHash)>,
    allowed_breaks: HashSet<String>,
    verify_hash_after: Option<String>,
    enabled: bool,
}

impl Default for HashChainVerifier {
    fn default() -> Self {
        Self {
            tips: HashMap::new(),
            allowed_breaks: HashSet::new(),
            verify_hash_after: None,
            enabled: true,
        }
    }
}

impl HashChainVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// File names whose declared previous hash may differ from the tip.
    pub fn with_allowed_breaks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_breaks.extend(names.into_iter().map(Into::into));
        self
    }

    /// Skip verification for files whose name sorts at or before `name`.
    pub fn with_verify_hash_after(mut self, name: Option<String>) -> Self {
        self.verify_hash_after = name;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn tip(&self, stream: StreamType) -> Option<(&str, &StreamHash)> {
        self.tips
            .get(&stream)
            .map(|(name, hash)| (name.as_str(), hash))
    }

    /// Check `declared_previous` against the tip of `stream`.
    pub fn verify(
        &self,
        stream: StreamType,
        file: &str,
        declared_previous: &StreamHash,
    ) -> Result<(), StreamFileError> {
        let Some((_, expected)) = self.tips.get(&stream) else {
            return Ok(());
        };
        if !self.enabled || expected == declared_previous {
            return Ok(());
        }
        if self
            .verify_hash_after
            .as_deref()
            .is_some_and(|after| file <= after)
        {
            return Ok(());
        }
        if self.allowed_breaks.contains(file) {
            warn!(
                "[mn-02] Accepting authorised {} hash chain break at {}",
                stream, file
            );
            return Ok(());
        }

        Err(StreamFileError::ChainBroken {
            file: file.to_string(),
            expected: hex::encode(expected),
            actual: hex::encode(declared_previous),
        })
    }

    /// Move the tip after a file has been committed.
    pub fn advance(&mut self, stream: StreamType, file: &str, hash: StreamHash) {
        self.tips.insert(stream, (file.to_string(), hash));
    }
}
