//! In-memory `StreamFileSource` for tests.

use crate::domain::errors::StreamFileError;
use crate::ports::outbound::StreamFileSource;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InMemoryStreamSource {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl InMemoryStreamSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.files.write().insert(name.into(), bytes.into());
    }
}

impl StreamFileSource for InMemoryStreamSource {
    fn list(&self, after: Option<&str>) -> Result<Vec<String>, StreamFileError> {
        Ok(self
            .files
            .read()
            .keys()
            .filter(|name| after.map_or(true, |after| name.as_str() > after))
            .cloned()
            .collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StreamFileError> {
        self.files
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| StreamFileError::Io {
                file: name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such stream file"),
            })
    }
}
