//! Benchmarks for warcstore archive operations

use std::io::Cursor;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use warcstore::{Offset, Reader, Record, Writer};

const RECORDS: usize = 1_000;

fn sample_record(i: usize) -> Record {
    Record::new()
        .with_field("WARC-Type", "response")
        .with_field("WARC-Record-ID", format!("<urn:bench:{}>", i))
        .with_field("WARC-Date", "2024-01-01T00:00:00Z")
        .with_block(vec![b'x'; 512])
}

fn build_archive() -> (Vec<u8>, Vec<Offset>) {
    let mut writer = Writer::new(Vec::new());
    let offsets = (0..RECORDS)
        .map(|i| writer.write_record(&sample_record(i)).unwrap())
        .collect();
    (writer.into_inner().unwrap(), offsets)
}

fn archive_benchmarks(c: &mut Criterion) {
    let records: Vec<Record> = (0..RECORDS).map(sample_record).collect();
    let (archive, offsets) = build_archive();

    let mut group = c.benchmark_group("archive");
    group.throughput(Throughput::Elements(RECORDS as u64));

    group.bench_function("sequential_write", |b| {
        b.iter(|| {
            let mut writer = Writer::new(Vec::with_capacity(archive.len()));
            for record in &records {
                writer.write_record(record).unwrap();
            }
            black_box(writer.into_inner().unwrap())
        })
    });

    group.bench_function("sequential_read", |b| {
        b.iter(|| {
            let mut reader = Reader::new(Cursor::new(archive.as_slice()));
            let mut count = 0;
            while let Some(record) = reader.next_record().unwrap() {
                black_box(&record);
                count += 1;
            }
            assert_eq!(count, RECORDS);
        })
    });

    // Reverse order so every access is a real seek
    group.bench_function("random_access", |b| {
        b.iter_batched(
            || Reader::new(Cursor::new(archive.as_slice())),
            |mut reader| {
                for &offset in offsets.iter().rev() {
                    black_box(reader.record_at(offset).unwrap());
                }
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, archive_benchmarks);
criterion_main!(benches);
