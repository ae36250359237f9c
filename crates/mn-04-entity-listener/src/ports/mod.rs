//! # Ports Layer
//!
//! The listener's inbound API is the pair of listener traits in
//! `shared-types`; the only port defined here is the store it writes to.

pub mod outbound;
