//! # Record Stream Parser
//!
//! Ingests `recordstreams/*.rcd` in name order, one unit of work per file.
//!
//! ## Per File
//!
//! 1. Open the file and check its declared previous hash against the chain tip
//! 2. `on_start`, then every item inside the date window through the processor
//! 3. Verify the trailer, `on_end` with the record file row, advance the tip
//!
//! A failure after `on_start` calls `on_error`, so nothing from the file is
//! committed, and stops the pass. Files before it stay committed.
//!
//! A file without items takes its consensus bounds from the file before it.

use super::ParseReport;
use crate::errors::ParserError;
use chrono::Utc;
use mirror_telemetry::log_file_event;
use mn_02_stream_reader::{
    parse_hash, HashChainVerifier, ReaderConfig, RecordFileReader, RecordFileStream,
    RecordFileSummary, StreamFileSource, StreamType,
};
use mn_03_transaction_handlers::RecordItemListener;
use mn_04_entity_listener::MirrorStore;
use mn_06_date_range_filter::{effective_filter, DateRangeConfig, DateRangeFilter};
use shared_types::{EntityListener, RecordFile, RecordStreamFileListener};
use tracing::{debug, info};

pub struct RecordFileParser<S, P, L, F> {
    store: S,
    processor: P,
    listener: L,
    source: F,
    reader: RecordFileReader,
    verifier: HashChainVerifier,
    date_range: DateRangeConfig,
}

impl<S, P, L, F> RecordFileParser<S, P, L, F>
where
    S: MirrorStore,
    P: RecordItemListener,
    L: EntityListener + RecordStreamFileListener,
    F: StreamFileSource,
{
    pub fn new(store: S, processor: P, listener: L, source: F) -> Self {
        Self {
            store,
            processor,
            listener,
            source,
            reader: RecordFileReader::new(ReaderConfig::default()),
            verifier: HashChainVerifier::new(),
            date_range: DateRangeConfig::default(),
        }
    }

    pub fn with_verifier(mut self, verifier: HashChainVerifier) -> Self {
        self.verifier = verifier;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRangeConfig) -> Self {
        self.date_range = date_range;
        self
    }

    pub fn with_reader_config(mut self, config: ReaderConfig) -> Self {
        self.reader = RecordFileReader::new(config);
        self
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Ingest every file after the last committed one.
    pub fn parse(&mut self) -> Result<ParseReport, ParserError> {
        let last = self.store.last_record_file()?;
        if let Some(last) = &last {
            self.resume_from(last)?;
        }
        let filter = effective_filter(
            &self.date_range,
            "record",
            last.as_ref().map(|file| file.consensus_end),
        )?;

        let mut report = ParseReport::default();
        if filter.is_empty() {
            return Ok(report);
        }

        let mut previous_end = last.as_ref().map_or(0, |file| file.consensus_end);
        for name in self.source.list(last.as_ref().map(|file| file.name.as_str()))? {
            let bytes = self.source.read(&name)?;
            let (summary, items) = self.parse_file(&name, &bytes, &filter, &mut previous_end)?;
            report.files += 1;
            report.items += items;

            if filter.is_past_end(summary.consensus_end) {
                info!("[importer] Record stream reached its end date at {}", name);
                break;
            }
        }

        if report.files > 0 {
            info!(
                "[importer] Ingested {} record files with {} items",
                report.files, report.items
            );
        }
        Ok(report)
    }

    fn resume_from(&mut self, last: &RecordFile) -> Result<(), ParserError> {
        let hash = parse_hash(&last.hash).ok_or_else(|| ParserError::CorruptTip {
            file: last.name.clone(),
            hash: last.hash.clone(),
        })?;
        self.verifier.advance(StreamType::Record, &last.name, hash);
        Ok(())
    }

    fn parse_file(
        &mut self,
        name: &str,
        bytes: &[u8],
        filter: &DateRangeFilter,
        previous_end: &mut i64,
    ) -> Result<(RecordFileSummary, u64), ParserError> {
        let load_start = Utc::now().timestamp();
        let stream = self.reader.open(name, bytes)?;
        self.verifier
            .verify(StreamType::Record, name, &stream.header().previous_hash)?;

        self.listener.on_start()?;
        let (summary, items) = match self.read_items(stream, filter) {
            Ok(read) => read,
            Err(e) => {
                self.listener.on_error();
                log_file_event!(error, "importer", "Record file rejected", name, error = %e);
                return Err(e);
            }
        };

        let mut record_file = summary.to_record_file(load_start, Utc::now().timestamp());
        if summary.count == 0 {
            record_file.consensus_start = *previous_end;
            record_file.consensus_end = *previous_end;
        }
        *previous_end = record_file.consensus_end;
        self.listener.on_end(Some(record_file))?;
        self.verifier.advance(StreamType::Record, name, summary.hash);

        log_file_event!(
            info,
            "importer",
            "Record file ingested",
            name,
            items,
            count = summary.count
        );
        Ok((summary, items))
    }

    fn read_items(
        &mut self,
        mut stream: RecordFileStream<'_>,
        filter: &DateRangeFilter,
    ) -> Result<(RecordFileSummary, u64), ParserError> {
        let mut items = 0;
        for item in stream.by_ref() {
            let item = item?;
            let timestamp = item.consensus_timestamp();
            if !filter.filter(timestamp) {
                debug!("[importer] Skipping item at {} outside the date range", timestamp);
                continue;
            }
            self.processor.on_item(&item, &mut self.listener)?;
            items += 1;
        }
        Ok((stream.finish()?, items))
    }
}
