//! # Ports Layer
//!
//! - `inbound` - `RecordItemListener`, what the stream parsers call per item
//! - `outbound` - the listener and resolver this crate drives

pub mod inbound;
pub mod outbound;
