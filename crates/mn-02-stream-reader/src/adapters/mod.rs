//! # Adapters
//!
//! - `fs` - directory-backed stream source
//! - `memory` - in-memory stream source

pub mod fs;
pub mod memory;

pub use fs::DirectoryStreamSource;
pub use memory::InMemoryStreamSource;
