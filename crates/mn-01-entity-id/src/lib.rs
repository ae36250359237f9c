//! # EntityId Resolver (mn-01)
//!
//! Turns every external identifier form the ledger uses into the canonical
//! [`EntityId`](shared_types::EntityId).
//!
//! ## Lookup Order
//!
//! | Step | Input | Source |
//! |------|-------|--------|
//! | 1 | numeric triple, long-zero EVM address | decoded in place |
//! | 2 | alias bytes | cache, then `EntityRepository::find_by_alias` |
//! | 3 | EVM address | cache, then `EntityRepository::find_by_evm_address` |
//!
//! A miss is `Ok(None)`; callers pick their own default, usually `EMPTY`.
//! Only malformed input and repository failures are errors.
//!
//! ## Hexagonal Architecture
//!
//! - `domain/` - cache, config and errors
//! - `ports/` - `EntityIdResolver` (inbound), `EntityRepository` (outbound)
//! - `adapters/` - in-memory repository
//! - `service.rs` - `EntityIdService`, the resolver implementation

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::InMemoryEntityRepository;
pub use domain::cache::ResolverCache;
pub use domain::errors::{RepositoryError, ResolverError};
pub use domain::value_objects::EntityIdConfig;
pub use ports::inbound::EntityIdResolver;
pub use ports::outbound::EntityRepository;
pub use service::EntityIdService;
