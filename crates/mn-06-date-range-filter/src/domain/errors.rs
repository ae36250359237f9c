//! # Domain Errors

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateRangeError {
    #[error("invalid date {value:?}: {reason}")]
    InvalidDate { value: String, reason: String },

    /// A date nanosecond timestamps cannot represent.
    #[error("date {0} is outside the representable consensus timestamp range")]
    OutOfRange(String),

    #[error("start date {start} is after end date {end}")]
    StartAfterEnd { start: String, end: String },

    #[error("unknown network {0:?}")]
    UnknownNetwork(String),
}
