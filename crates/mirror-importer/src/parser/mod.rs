//! Stream parsers: one pass over a stream directory per call.

pub mod balance;
pub mod record;

pub use balance::BalanceFileParser;
pub use record::RecordFileParser;

/// Outcome of one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseReport {
    /// Files committed.
    pub files: usize,
    /// Record items or balance rows committed.
    pub items: u64,
}
