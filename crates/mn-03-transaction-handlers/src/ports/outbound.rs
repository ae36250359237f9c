//! # Outbound Ports
//!
//! The row sink and the resolver. Both are defined by the crates that own
//! them; the processor only depends on them through this module.

pub use mn_01_entity_id::EntityIdResolver;
pub use shared_types::EntityListener;
