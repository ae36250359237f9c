//! # Ports Layer
//!
//! - `inbound` - the resolver API offered to handlers
//! - `outbound` - the entity store the resolver reads from

pub mod inbound;
pub mod outbound;
