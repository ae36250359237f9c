//! # Entity Listener (mn-04)
//!
//! Buffers the rows of one record file and commits them atomically to a
//! [`MirrorStore`].
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | File atomicity | one `Batch`, one `commit` per file |
//! | Re-ingest idempotence | upsert by key, merge by id |
//! | Errata preserved | `commit` never overwrites the `errata` column |
//! | One file at a time | `on_start` while open is `FileInProgress` |
//!
//! ## Hexagonal Architecture
//!
//! - `domain/` - `Batch`, errors, errata criteria
//! - `ports/` - `MirrorStore` (outbound)
//! - `adapters/` - in-memory and SQLite stores, store-backed entity repository
//! - `service.rs` - `BufferedEntityListener`

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryMirrorStore, StoreEntityRepository};
#[cfg(feature = "sqlite")]
pub use adapters::SqliteMirrorStore;
pub use domain::batch::Batch;
pub use domain::errors::StoreError;
pub use domain::value_objects::{MigrationHistoryEntry, SpuriousTransferCriteria};
pub use ports::outbound::MirrorStore;
pub use service::BufferedEntityListener;
