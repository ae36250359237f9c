//! # Balance Offset Table
//!
//! Consensus timestamps of the balance files whose declared time is one
//! second late. Loaded on first use, once per table.
//!
//! ## Initialization
//!
//! ```text
//! populated? ──yes──→ read set
//!     │no
//!     ↓
//! lock ──→ populated? ──yes──→ read set
//!              │no
//!              ↓
//!          parse source ──→ store set ──→ populated = true
//! ```
//!
//! A failed parse leaves the table unpopulated so the next caller retries.

use super::errors::MigrationError;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error};

const BUNDLED: &str = include_str!("../../resources/errata/mainnet/balance-offsets.txt");

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetSource {
    /// The table compiled into the binary.
    Bundled,
    File(PathBuf),
}

impl OffsetSource {
    fn name(&self) -> String {
        match self {
            OffsetSource::Bundled => "bundled balance-offsets.txt".to_string(),
            OffsetSource::File(path) => path.display().to_string(),
        }
    }

    fn read(&self) -> Result<String, MigrationError> {
        match self {
            OffsetSource::Bundled => Ok(BUNDLED.to_string()),
            OffsetSource::File(path) => {
                std::fs::read_to_string(path).map_err(|e| MigrationError::OffsetTable {
                    source_name: self.name(),
                    line: 0,
                    reason: e.to_string(),
                })
            }
        }
    }
}

pub struct BalanceOffsets {
    source: OffsetSource,
    populated: AtomicBool,
    init: Mutex<()>,
    timestamps: RwLock<BTreeSet<i64>>,
}

impl BalanceOffsets {
    pub fn new(source: OffsetSource) -> Self {
        Self {
            source,
            populated: AtomicBool::new(false),
            init: Mutex::new(()),
            timestamps: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn bundled() -> Self {
        Self::new(OffsetSource::Bundled)
    }

    pub fn contains(&self, consensus_timestamp: i64) -> Result<bool, MigrationError> {
        self.ensure_loaded()?;
        Ok(self.timestamps.read().contains(&consensus_timestamp))
    }

    /// Every listed timestamp in ascending order.
    pub fn timestamps(&self) -> Result<Vec<i64>, MigrationError> {
        self.ensure_loaded()?;
        Ok(self.timestamps.read().iter().copied().collect())
    }

    fn ensure_loaded(&self) -> Result<(), MigrationError> {
        if self.populated.load(Ordering::Acquire) {
            return Ok(());
        }

        let _guard = self.init.lock();
        if self.populated.load(Ordering::Acquire) {
            return Ok(());
        }

        let parsed = self
            .source
            .read()
            .and_then(|text| parse(&self.source.name(), &text))
            .inspect_err(|e| error!("[mn-05] Error processing balance offsets: {}", e))?;
        debug!(
            "[mn-05] Loaded {} balance offsets from {}",
            parsed.len(),
            self.source.name()
        );
        *self.timestamps.write() = parsed;
        self.populated.store(true, Ordering::Release);
        Ok(())
    }
}

fn parse(source_name: &str, text: &str) -> Result<BTreeSet<i64>, MigrationError> {
    let mut timestamps = BTreeSet::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let timestamp = line.parse::<i64>().map_err(|e| MigrationError::OffsetTable {
            source_name: source_name.to_string(),
            line: index + 1,
            reason: e.to_string(),
        })?;
        timestamps.insert(timestamp);
    }
    Ok(timestamps)
}
