//! # Mirror Telemetry
//!
//! Structured logging for every mirror node binary and test harness.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mirror_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::from_env())?;
//!     mirror_telemetry::log_event!(info, "mn-04", "ready");
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `MIRROR_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `MIRROR_JSON_LOGS` | `true` in containers | JSON lines output |
//! | `MIRROR_LOG_LOCATION` | `false` | Source file and line |
//! | `MIRROR_SERVICE_NAME` | `mirror-importer` | Service name |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::env_filter;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Invalid log filter: {0}")]
    Filter(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber described by `config`.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    tracing_setup::init_tracing(config)
}
