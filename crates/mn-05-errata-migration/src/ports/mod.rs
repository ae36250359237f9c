//! # Ports Layer
//!
//! `Migration` (in `domain`) is the inbound contract. Everything the errata
//! corrections drive is owned by other subsystems and re-exported here.

pub mod outbound;
