//! # Migration Contract
//!
//! Versioned migrations run once. Repeatable migrations (no version) run
//! again whenever their checksum differs from the recorded one.

use super::errors::MigrationError;
use std::fmt;
use std::str::FromStr;

/// Dotted numeric version, ordered component-wise.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MigrationVersion(Vec<u32>);

impl FromStr for MigrationVersion {
    type Err = MigrationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split('.')
            .map(|part| part.parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| MigrationError::InvalidVersion(value.to_string()))?;
        Ok(Self(parts))
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for part in &self.0 {
            if !first {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
            first = false;
        }
        Ok(())
    }
}

pub trait Migration: Send + Sync {
    /// `None` for a repeatable migration.
    fn version(&self) -> Option<MigrationVersion>;

    /// Change this to make a repeatable migration run again.
    fn checksum(&self) -> i32;

    /// Unique name; the key of the migration history.
    fn description(&self) -> &str;

    fn migrate(&self) -> Result<(), MigrationError>;
}
