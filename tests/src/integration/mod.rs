//! Cross-crate flows over the SQLite store.

pub mod errata;
pub mod ingestion;

#[cfg(test)]
pub(crate) mod fixtures;
