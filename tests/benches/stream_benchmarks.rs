//! # Mirror Node Stream Benchmarks
//!
//! | Subsystem | Path | Measured |
//! |-----------|------|----------|
//! | mn-02 Stream Reader | v2 and v5 record file read + hash | items/s |
//! | mn-03 Transaction Handlers | item to rows through a buffered listener | items/s |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mn_01_entity_id::{EntityIdConfig, EntityIdService};
use mn_02_stream_reader::test_utils::{RecordFileWriter, TestItem};
use mn_02_stream_reader::{RecordFileReader, EMPTY_HASH};
use mn_03_transaction_handlers::{ProcessorConfig, RecordItemListener, RecordItemProcessor};
use mn_04_entity_listener::{BufferedEntityListener, InMemoryMirrorStore, StoreEntityRepository};
use shared_types::{response_code, RecordStreamFileListener};
use std::sync::Arc;
use std::time::Duration;

const START: i64 = 1_600_000_000_000_000_000;

fn record_file(writer: RecordFileWriter, items: usize) -> RecordFileWriter {
    (0..items as i64).fold(writer, |writer, i| {
        writer.item(TestItem::crypto_transfer(
            START + i,
            1001,
            &[(1001, -15), (2002, 10), (98, 5)],
            response_code::SUCCESS,
        ))
    })
}

// ============================================================================
// MN-02: Record file reading
// ============================================================================

fn bench_record_file_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("mn-02-stream-reader");
    group.measurement_time(Duration::from_secs(5));
    let reader = RecordFileReader::default();

    for items in [100, 1_000] {
        for (version, writer) in [
            ("v2", RecordFileWriter::v2(EMPTY_HASH)),
            ("v5", RecordFileWriter::v5(EMPTY_HASH)),
        ] {
            let bytes = record_file(writer, items).build();
            group.throughput(Throughput::Elements(items as u64));
            group.bench_with_input(BenchmarkId::new(version, items), &bytes, |b, bytes| {
                b.iter(|| {
                    let stream = reader.open("bench.rcd", black_box(bytes)).unwrap();
                    black_box(stream.finish().unwrap())
                })
            });
        }
    }
    group.finish();
}

// ============================================================================
// MN-03: Item processing into a buffered listener
// ============================================================================

fn bench_item_processing(c: &mut Criterion) {
    let mut group = c.benchmark_group("mn-03-transaction-handlers");
    group.measurement_time(Duration::from_secs(5));

    let store = Arc::new(InMemoryMirrorStore::new());
    let resolver = Arc::new(EntityIdService::new(
        StoreEntityRepository::new(store.clone()),
        EntityIdConfig::default(),
    ));
    let processor =
        RecordItemProcessor::with_defaults(resolver, ProcessorConfig::default()).unwrap();
    let reader = RecordFileReader::default();
    let items: Vec<_> = reader
        .open("bench.rcd", &record_file(RecordFileWriter::v5(EMPTY_HASH), 1_000).build())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    group.throughput(Throughput::Elements(items.len() as u64));
    group.bench_function("process_1000_transfers", |b| {
        b.iter(|| {
            let mut listener = BufferedEntityListener::new(store.clone());
            listener.on_start().unwrap();
            for item in &items {
                processor.on_item(item, &mut listener).unwrap();
            }
            listener.on_error();
        })
    });
    group.finish();
}

criterion_group!(benches, bench_record_file_read, bench_item_processing);
criterion_main!(benches);
