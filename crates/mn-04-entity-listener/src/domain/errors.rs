//! # Domain Errors

use shared_types::ListenerError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backend rejected an operation; nothing from it is visible.
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },

    /// A stored column that does not map back to its row type.
    #[error("corrupt value in column {column}: {message}")]
    Corrupt { column: usize, message: String },
}

impl StoreError {
    pub fn backend(operation: &'static str, message: impl ToString) -> Self {
        Self::Backend {
            operation,
            message: message.to_string(),
        }
    }
}

impl From<StoreError> for ListenerError {
    fn from(err: StoreError) -> Self {
        ListenerError::Persistence(err.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(column, _, source) => Self::Corrupt {
                column,
                message: source.to_string(),
            },
            other => Self::backend("sqlite", other),
        }
    }
}
