//! # Record File Reader
//!
//! Parses record files into a lazy, single-pass sequence of `RecordItem`s.
//!
//! ## Formats
//!
//! - **v1**: `int version, int hapi, 0x01, prev[48], (0x02, tx, record)*`.
//!   The file hash is `SHA384(file)`.
//! - **v2**: same layout as v1, hashed as
//!   `SHA384(SHA384(header) || SHA384(body))`.
//! - **v5**: `int version, int major, int minor, int patch, int objectStream`,
//!   a start hash object, `(class id, class version, record, tx)*` and an end
//!   hash object. The file hash is the end running hash.
//!
//! The header is parsed by [`RecordFileReader::open`], so the declared
//! previous hash can be checked against the chain before any item is read.
//! Items are then pulled one at a time. [`RecordFileStream::finish`] verifies
//! the trailer and returns the file's summary.

use super::cursor::StreamCursor;
use super::digest::{sha384, sha384_concat, RunningHash, StreamHash, HASH_LENGTH};
use super::errors::StreamFileError;
use super::value_objects::*;
use shared_types::{RecordFile, RecordItem};
use tracing::debug;


/// HAPI version declared by a record file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HapiVersion {
    pub major: i32,
    pub minor: i32,
    pub patch: i32,
}

/// Parsed record file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFileHeader {
    pub version: i32,
    pub hapi_version: HapiVersion,
    /// Previous file hash (v1/v2) or start running hash (v5).
    pub previous_hash: StreamHash,
}

/// What a fully read record file amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFileSummary {
    pub name: String,
    pub header: RecordFileHeader,
    /// Hash the next file in the chain must declare.
    pub hash: StreamHash,
    pub count: u64,
    pub consensus_start: i64,
    pub consensus_end: i64,
}

impl RecordFileSummary {
    /// Row recorded once the file is committed.
    pub fn to_record_file(&self, load_start: i64, load_end: i64) -> RecordFile {
        RecordFile {
            name: self.name.clone(),
            consensus_start: self.consensus_start,
            consensus_end: self.consensus_end,
            count: self.count,
            hash: hex::encode(self.hash),
            previous_hash: hex::encode(self.header.previous_hash),
            version: self.header.version,
            hapi_version_major: self.header.hapi_version.major,
            load_start,
            load_end,
        }
    }
}

/// Opens record files with configured field bounds.
#[derive(Debug, Clone, Default)]
pub struct RecordFileReader {
    config: ReaderConfig,
}

impl RecordFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Parse the header and return a stream positioned at the first item.
    pub fn open<'a>(
        &self,
        file: &'a str,
        bytes: &'a [u8],
    ) -> Result<RecordFileStream<'a>, StreamFileError> {
        let mut cursor = StreamCursor::new(file, bytes);
        let version = cursor.read_i32("record file version")?;

        let (header, layout) = match version {
            1 | 2 => {
                let major = cursor.read_i32("hapi version")?;
                cursor.read_marker(MARKER_PREVIOUS_HASH, "previous hash marker")?;
                let previous_hash = cursor.read_array::<HASH_LENGTH>("previous hash")?;
                let header = RecordFileHeader {
                    version,
                    hapi_version: HapiVersion {
                        major,
                        ..Default::default()
                    },
                    previous_hash,
                };
                let layout = Layout::Legacy {
                    header_end: cursor.position(),
                };
                (header, layout)
            }
            5 => {
                let hapi_version = HapiVersion {
                    major: cursor.read_i32("hapi major version")?,
                    minor: cursor.read_i32("hapi minor version")?,
                    patch: cursor.read_i32("hapi patch version")?,
                };
                cursor.read_expected_i32(OBJECT_STREAM_VERSION, "object stream version")?;
                let start = read_hash_object(&mut cursor, "start running hash")?;
                let header = RecordFileHeader {
                    version,
                    hapi_version,
                    previous_hash: start,
                };
                let layout = Layout::V5 {
                    running: RunningHash::new(start),
                    end_hash: None,
                };
                (header, layout)
            }
            other => {
                return Err(StreamFileError::UnsupportedVersion {
                    file: file.to_string(),
                    kind: "record",
                    version: other,
                })
            }
        };

        debug!("[mn-02] Opened record file {} (v{})", file, version);

        Ok(RecordFileStream {
            cursor,
            header,
            layout,
            max_transaction_length: self.config.max_transaction_length,
            max_record_length: self.config.max_record_length,
            count: 0,
            consensus_start: None,
            consensus_end: None,
            state: StreamState::Open,
        })
    }

    /// Read a standalone item: a record then a transaction, each length
    /// prefixed and bounded by the transaction length limit.
    pub fn read_single_item(
        &self,
        file: &str,
        bytes: &[u8],
    ) -> Result<RecordItem, StreamFileError> {
        let mut cursor = StreamCursor::new(file, bytes);
        let max = self.config.max_transaction_length;
        let record = cursor.read_length_and_bytes(1, max, false, "record")?;
        let transaction = cursor.read_length_and_bytes(1, max, false, "transaction")?;
        cursor.expect_end()?;

        RecordItem::parse(transaction.to_vec(), record.to_vec()).map_err(|source| {
            StreamFileError::Item {
                file: file.to_string(),
                index: 0,
                offset: 0,
                source,
            }
        })
    }
}

/// Read a v5 hash object: class id, class version, digest type, length, bytes.
fn read_hash_object(
    cursor: &mut StreamCursor<'_>,
    field: &'static str,
) -> Result<StreamHash, StreamFileError> {
    cursor.read_expected_i64(HASH_OBJECT_CLASS_ID, field)?;
    cursor.read_expected_i32(OBJECT_CLASS_VERSION, field)?;
    cursor.read_expected_i32(SHA384_DIGEST_TYPE, field)?;
    cursor.read_expected_i32(HASH_LENGTH as i32, field)?;
    cursor.read_array::<HASH_LENGTH>(field)
}

#[derive(Debug)]
enum Layout {
    Legacy {
        header_end: usize,
    },
    V5 {
        running: RunningHash,
        end_hash: Option<StreamHash>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Open,
    Exhausted,
    Failed,
}

/// Items of one record file, read on demand.
///
/// Not restartable: once an item is yielded it is gone. After the first error
/// the stream yields nothing more.
#[derive(Debug)]
pub struct RecordFileStream<'a> {
    cursor: StreamCursor<'a>,
    header: RecordFileHeader,
    layout: Layout,
    max_transaction_length: usize,
    max_record_length: usize,
    count: u64,
    consensus_start: Option<i64>,
    consensus_end: Option<i64>,
    state: StreamState,
}

impl<'a> RecordFileStream<'a> {
    pub fn header(&self) -> &RecordFileHeader {
        &self.header
    }

    pub fn file(&self) -> &'a str {
        self.cursor.file()
    }

    /// Items yielded so far.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Consume the remaining items and verify the trailer.
    pub fn finish(mut self) -> Result<RecordFileSummary, StreamFileError> {
        for item in self.by_ref() {
            item?;
        }
        if self.state == StreamState::Failed {
            return Err(StreamFileError::Aborted {
                file: self.file().to_string(),
            });
        }

        let hash = match &self.layout {
            Layout::Legacy { header_end } => {
                let bytes = self.cursor.bytes();
                if self.header.version == 1 {
                    sha384(bytes)
                } else {
                    let (header, body) = bytes.split_at(*header_end);
                    sha384_concat(&[&sha384(header), &sha384(body)])
                }
            }
            Layout::V5 { running, end_hash } => {
                let end_hash = end_hash.ok_or_else(|| StreamFileError::Aborted {
                    file: self.file().to_string(),
                })?;
                if running.value() != end_hash {
                    return Err(StreamFileError::RunningHashMismatch {
                        file: self.file().to_string(),
                        expected: hex::encode(end_hash),
                        actual: hex::encode(running.value()),
                    });
                }
                end_hash
            }
        };

        Ok(RecordFileSummary {
            name: self.file().to_string(),
            header: self.header,
            hash,
            count: self.count,
            consensus_start: self.consensus_start.unwrap_or_default(),
            consensus_end: self.consensus_end.unwrap_or_default(),
        })
    }

    fn read_next(&mut self) -> Result<Option<RecordItem>, StreamFileError> {
        let offset = self.cursor.position();

        let (transaction, record) = match &mut self.layout {
            Layout::Legacy { .. } => {
                if self.cursor.is_exhausted() {
                    return Ok(None);
                }
                self.cursor.read_marker(MARKER_RECORD, "record marker")?;
                let transaction = self.cursor.read_length_and_bytes(
                    1,
                    self.max_transaction_length,
                    false,
                    "transaction",
                )?;
                let record =
                    self.cursor
                        .read_length_and_bytes(1, self.max_record_length, false, "record")?;
                (transaction, record)
            }
            Layout::V5 { running, end_hash } => {
                if self.cursor.peek_i64() == Some(HASH_OBJECT_CLASS_ID) {
                    *end_hash = Some(read_hash_object(&mut self.cursor, "end running hash")?);
                    self.cursor.expect_end()?;
                    return Ok(None);
                }
                self.cursor.read_expected_i64(
                    RECORD_STREAM_OBJECT_CLASS_ID,
                    "record stream object class id",
                )?;
                self.cursor
                    .read_expected_i32(OBJECT_CLASS_VERSION, "record stream object class version")?;
                let record =
                    self.cursor
                        .read_length_and_bytes(1, self.max_record_length, false, "record")?;
                let transaction = self.cursor.read_length_and_bytes(
                    1,
                    self.max_transaction_length,
                    false,
                    "transaction",
                )?;
                running.fold(record, transaction);
                (transaction, record)
            }
        };

        let item = RecordItem::parse(transaction.to_vec(), record.to_vec()).map_err(|source| {
            StreamFileError::Item {
                file: self.cursor.file().to_string(),
                index: self.count,
                offset,
                source,
            }
        })?;

        let timestamp = item.consensus_timestamp();
        self.consensus_start.get_or_insert(timestamp);
        self.consensus_end = Some(timestamp);
        self.count += 1;
        Ok(Some(item))
    }
}

impl Iterator for RecordFileStream<'_> {
    type Item = Result<RecordItem, StreamFileError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != StreamState::Open {
            return None;
        }
        match self.read_next() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.state = StreamState::Exhausted;
                None
            }
            Err(e) => {
                self.state = StreamState::Failed;
                Some(Err(e))
            }
        }
    }
}
