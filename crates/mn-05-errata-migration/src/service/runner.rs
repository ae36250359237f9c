//! Migration runner.
//!
//! Versioned migrations run in version order, then repeatable ones in
//! description order. One run at a time per runner.

use crate::domain::errors::MigrationError;
use crate::domain::migration::Migration;
use crate::ports::outbound::MirrorStore;
use chrono::Utc;
use mn_04_entity_listener::MigrationHistoryEntry;
use parking_lot::Mutex;
use tracing::{error, info};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
    pub skipped: Vec<String>,
}

pub struct MigrationRunner<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S: MirrorStore> MigrationRunner<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    pub fn run(&self, migrations: &[&dyn Migration]) -> Result<MigrationReport, MigrationError> {
        let _guard = self.lock.lock();

        let mut ordered = migrations.to_vec();
        ordered.sort_by(|a, b| match (a.version(), b.version()) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => a.description().cmp(b.description()),
        });

        let mut report = MigrationReport::default();
        for migration in ordered {
            let description = migration.description().to_string();
            if !self.is_pending(migration)? {
                report.skipped.push(description);
                continue;
            }

            info!("[mn-05] Running migration: {}", description);
            let result = migration.migrate();
            self.store.record_migration(MigrationHistoryEntry {
                version: migration.version().map(|v| v.to_string()),
                description: description.clone(),
                checksum: migration.checksum(),
                installed_at: Utc::now().timestamp_millis(),
                success: result.is_ok(),
            })?;

            if let Err(err) = result {
                error!("[mn-05] Migration failed: {}: {}", description, err);
                return Err(err);
            }
            report.applied.push(description);
        }

        info!(
            "[mn-05] Migrations complete: {} applied, {} up to date",
            report.applied.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    fn is_pending(&self, migration: &dyn Migration) -> Result<bool, MigrationError> {
        let Some(history) = self.store.migration_history(migration.description())? else {
            return Ok(true);
        };
        if !history.success {
            return Ok(true);
        }
        Ok(migration.version().is_none() && history.checksum != migration.checksum())
    }
}
