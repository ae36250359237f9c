//! # Domain Layer
//!
//! - `cache` - bounded alias/address cache
//! - `errors` - resolver errors
//! - `value_objects` - configuration

pub mod cache;
pub mod errors;
pub mod value_objects;
