//! # Migration Services
//!
//! - `MigrationRunner` - applies migrations under a lock and records history
//! - `ErrataMigration` - the mainnet corrections

mod errata;
mod runner;

pub use errata::{ErrataDependencies, ErrataMigration, ERRATA_CHECKSUM, ERRATA_DESCRIPTION};
pub use runner::{MigrationReport, MigrationRunner};
