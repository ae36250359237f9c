//! # Outbound Ports (Driven Ports)
//!
//! Where stream files come from.
//!
//! Production: `DirectoryStreamSource` (a local directory per stream)
//! Testing: `InMemoryStreamSource`

use crate::domain::errors::StreamFileError;

/// An ordered collection of stream files.
pub trait StreamFileSource: Send + Sync {
    /// File names in consensus order (which is name order), strictly after
    /// `after` when given.
    fn list(&self, after: Option<&str>) -> Result<Vec<String>, StreamFileError>;

    /// Full contents of one file.
    fn read(&self, name: &str) -> Result<Vec<u8>, StreamFileError>;
}

impl<T: StreamFileSource + ?Sized> StreamFileSource for std::sync::Arc<T> {
    fn list(&self, after: Option<&str>) -> Result<Vec<String>, StreamFileError> {
        (**self).list(after)
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, StreamFileError> {
        (**self).read(name)
    }
}
