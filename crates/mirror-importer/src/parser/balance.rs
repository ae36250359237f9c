//! # Balance Stream Parser
//!
//! Ingests `accountBalances/*.csv` in name order. Every registered
//! [`BalanceStreamFileListener`] sees a file before it is persisted and may
//! adjust it; the errata migration uses this to set the time offset of the
//! known-bad mainnet files.

use super::ParseReport;
use crate::errors::ParserError;
use chrono::Utc;
use mirror_telemetry::log_file_event;
use mn_02_stream_reader::{read_balance_file, ParsedBalanceFile, StreamFileSource};
use mn_04_entity_listener::MirrorStore;
use mn_06_date_range_filter::{effective_filter, DateRangeConfig};
use shared_types::{AccountBalanceFile, BalanceStreamFileListener, ListenerError};
use std::sync::Arc;
use tracing::{debug, info};

pub struct BalanceFileParser<S, F> {
    store: S,
    source: F,
    listeners: Vec<Arc<dyn BalanceStreamFileListener>>,
    date_range: DateRangeConfig,
}

impl<S, F> BalanceFileParser<S, F>
where
    S: MirrorStore,
    F: StreamFileSource,
{
    pub fn new(store: S, source: F) -> Self {
        Self {
            store,
            source,
            listeners: Vec::new(),
            date_range: DateRangeConfig::default(),
        }
    }

    pub fn with_listener(mut self, listener: Arc<dyn BalanceStreamFileListener>) -> Self {
        self.listeners.push(listener);
        self
    }

    pub fn with_date_range(mut self, date_range: DateRangeConfig) -> Self {
        self.date_range = date_range;
        self
    }

    /// Ingest every file after the last persisted one.
    pub fn parse(&self) -> Result<ParseReport, ParserError> {
        let last = self.store.last_balance_file()?;
        let filter = effective_filter(
            &self.date_range,
            "balance",
            last.as_ref().map(|file| file.consensus_timestamp),
        )?;

        let mut report = ParseReport::default();
        if filter.is_empty() {
            return Ok(report);
        }

        for name in self.source.list(last.as_ref().map(|file| file.name.as_str()))? {
            let bytes = self.source.read(&name)?;
            let ParsedBalanceFile { mut file, balances } = read_balance_file(&name, &bytes)?;
            let timestamp = file.consensus_timestamp;

            if filter.is_past_end(timestamp) {
                info!("[importer] Balance stream reached its end date at {}", name);
                break;
            }
            if !filter.filter(timestamp) || self.store.balance_file(timestamp)?.is_some() {
                debug!("[importer] Skipping balance file {}", name);
                continue;
            }

            file.load_start = Utc::now().timestamp();
            self.notify(&mut file)?;
            file.load_end = Utc::now().timestamp();

            let rows = balances.len() as u64;
            self.store.save_balance_file(file, balances)?;
            report.files += 1;
            report.items += rows;
            log_file_event!(info, "importer", "Balance file ingested", name, rows);
        }

        if report.files > 0 {
            info!(
                "[importer] Ingested {} balance files with {} rows",
                report.files, report.items
            );
        }
        Ok(report)
    }

    fn notify(&self, file: &mut AccountBalanceFile) -> Result<(), ListenerError> {
        for listener in &self.listeners {
            if let Err(e) = notify_one(listener.as_ref(), file) {
                for listener in &self.listeners {
                    listener.on_error();
                }
                log_file_event!(error, "importer", "Balance file rejected", file.name, error = %e);
                return Err(e);
            }
        }
        Ok(())
    }
}

fn notify_one(
    listener: &dyn BalanceStreamFileListener,
    file: &mut AccountBalanceFile,
) -> Result<(), ListenerError> {
    listener.on_start(file)?;
    listener.on_end(file)
}
