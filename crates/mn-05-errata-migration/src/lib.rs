//! # Errata Migration (mn-05)
//!
//! A small repeatable-migration framework and the errata migration that
//! patches known defects in mainnet history after ingestion.
//!
//! ## Corrections
//!
//! | Step | Effect | Idempotence guard |
//! |------|--------|-------------------|
//! | Balance file adjustment | `time_offset = -1` on listed files | offset differs |
//! | Spurious transfers | credit/debit pair tagged `DELETE` | row not already tagged |
//! | Missing transactions | replayed, rows tagged `INSERT` | timestamp absent from the store |
//!
//! Corrections apply to mainnet only. The runner serialises migrations and
//! reruns the errata whenever its checksum changes.
//!
//! ## Hexagonal Architecture
//!
//! - `domain/` - `Migration`, offset table, errata constants and config
//! - `ports/` - collaborators owned by other subsystems
//! - `service/` - `MigrationRunner`, `ErrataMigration`

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::MigrationError;
pub use domain::migration::{Migration, MigrationVersion};
pub use domain::offsets::{BalanceOffsets, OffsetSource};
pub use domain::value_objects::{
    mainnet_spurious_transfers, ErrataConfig, BALANCE_FILE_TIME_OFFSET, FEE_COLLECTION_ACCOUNT,
    NODE_ACCOUNTS, SELF_TRANSFER_EXCEPTIONS, SPURIOUS_TRANSFER_CUTOFF,
};
pub use service::{
    ErrataDependencies, ErrataMigration, MigrationReport, MigrationRunner, ERRATA_CHECKSUM,
    ERRATA_DESCRIPTION,
};
