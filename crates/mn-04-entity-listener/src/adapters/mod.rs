//! # Adapters
//!
//! - `memory` - `InMemoryMirrorStore`
//! - `sqlite` - `SqliteMirrorStore` (feature `sqlite`)
//! - `repository` - the store as the resolver's `EntityRepository`

pub mod memory;
pub mod repository;
#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
pub(crate) mod conformance;

pub use memory::InMemoryMirrorStore;
pub use repository::StoreEntityRepository;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMirrorStore;
