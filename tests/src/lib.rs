//! # Mirror Node Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── benches/          # Stream reading and item processing throughput
//! └── src/integration/
//!     ├── ingestion.rs  # Record/balance streams into the SQLite store
//!     └── errata.rs     # Mainnet errata end to end
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p mn-tests
//! cargo test -p mn-tests integration::errata
//! cargo bench -p mn-tests
//! ```

pub mod integration;
