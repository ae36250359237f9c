//! Domain layer for migrations and the errata corrections.

pub mod errors;
pub mod migration;
pub mod offsets;
pub mod value_objects;
