//! Domain layer for the date range filter.

pub mod errors;
pub mod filter;
pub mod network;
pub mod value_objects;
