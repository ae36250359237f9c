//! Domain layer for transaction handlers.

pub mod errors;
pub mod handler;
pub mod handlers;
pub mod ids;
pub mod registry;
pub mod value_objects;
