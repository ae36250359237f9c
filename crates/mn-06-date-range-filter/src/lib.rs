//! # Date Range Filter (mn-06)
//!
//! Gates ingestion and the errata backfill to a configured consensus
//! timestamp window and tells subsystems which network they mirror.
//!
//! ## Crate Structure
//!
//! - `domain/` - `DateRangeFilter`, `MirrorNetwork`, `DateRangeConfig`
//! - `service.rs` - effective window for a stream given what is committed

pub mod domain;
pub mod service;

pub use domain::errors::DateRangeError;
pub use domain::filter::{parse_date, to_nanos, DateRangeFilter};
pub use domain::network::MirrorNetwork;
pub use domain::value_objects::DateRangeConfig;
pub use service::effective_filter;
