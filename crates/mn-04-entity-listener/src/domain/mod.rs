//! Domain layer for the entity listener.

pub mod batch;
pub mod errors;
pub mod value_objects;
