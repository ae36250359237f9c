//! # Domain Errors
//!
//! A resolution miss is not an error. These cover malformed input and a
//! failing backing store.

use shared_types::EntityIdError;
use thiserror::Error;

/// Failure of the backing entity store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("entity repository failure: {message}")]
pub struct RepositoryError {
    pub message: String,
}

impl RepositoryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Errors raised while resolving an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolverError {
    /// Wrong byte length or out-of-range component.
    #[error("malformed identifier: {0}")]
    Malformed(#[from] EntityIdError),

    /// Alias bytes were empty.
    #[error("empty alias")]
    EmptyAlias,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
