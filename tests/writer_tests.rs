//! Tests for the archive writer
//!
//! These tests verify:
//! - One independent gzip member per record
//! - Strictly increasing offsets
//! - Offset overflow detection
//! - The positional offset log
//! - Resuming an existing archive

use std::fs::{File, OpenOptions};
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;

use flate2::read::GzDecoder;
use tempfile::TempDir;
use warcstore::index::{read_offsets, OffsetLog};
use warcstore::writer::OffsetWriter;
use warcstore::{Config, Framing, Offset, Reader, Record, WarcError, Writer};

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_dir() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().to_path_buf();
    (temp_dir, path)
}

fn record(i: usize) -> Record {
    Record::new()
        .with_field("WARC-Record-ID", format!("<urn:w:{}>", i))
        .with_block(vec![b'a' + (i % 26) as u8; 10 + i])
}

// =============================================================================
// Basic Writing Tests
// =============================================================================

#[test]
fn test_first_record_at_zero() {
    let mut writer = Writer::new(Vec::new());
    assert_eq!(writer.offset(), 0);
    assert_eq!(writer.write_record(&record(0)).unwrap(), 0);
    assert_eq!(writer.records_written(), 1);
}

#[test]
fn test_offsets_strictly_increase() {
    let mut writer = Writer::new(Vec::new());
    let offsets: Vec<Offset> = (0..10)
        .map(|i| writer.write_record(&record(i)).unwrap())
        .collect();

    for pair in offsets.windows(2) {
        assert!(pair[0] < pair[1]);
    }

    let total = writer.offset();
    let archive = writer.into_inner().unwrap();
    assert_eq!(archive.len() as Offset, total);
}

#[test]
fn test_each_record_is_its_own_member() {
    let mut writer = Writer::new(Vec::new());
    let first = writer.write_record(&record(0)).unwrap();
    let second = writer.write_record(&record(1)).unwrap();
    let archive = writer.into_inner().unwrap();

    // A plain single-member decoder sees exactly one record per slice
    let mut decoded = Vec::new();
    GzDecoder::new(&archive[first as usize..second as usize])
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, record(0).encode());

    let mut decoded = Vec::new();
    GzDecoder::new(&archive[second as usize..])
        .read_to_end(&mut decoded)
        .unwrap();
    assert_eq!(decoded, record(1).encode());
}

#[test]
fn test_empty_record_round_trip() {
    let mut writer = Writer::new(Vec::new());
    writer.write_record(&Record::new()).unwrap();
    let archive = writer.into_inner().unwrap();

    let mut reader = Reader::new(Cursor::new(archive));
    let decoded = reader.next_record().unwrap().unwrap();
    assert!(decoded.fields.is_empty());
}

#[test]
fn test_compression_levels_read_back() {
    for level in [0, 1, 9] {
        let config = Config::builder().compression_level(level).build();
        let mut writer = Writer::with_config(Vec::new(), &config).unwrap();
        writer.write_record(&record(3)).unwrap();
        let archive = writer.into_inner().unwrap();

        let mut reader = Reader::new(Cursor::new(archive));
        assert_eq!(reader.next_record().unwrap().unwrap(), record(3));
    }
}

#[test]
fn test_invalid_compression_level() {
    let config = Config::builder().compression_level(10).build();
    let result = Writer::with_config(Vec::new(), &config);
    assert!(matches!(result, Err(WarcError::Config(_))));
}

#[test]
fn test_plain_framing_unsupported() {
    let config = Config::builder().framing(Framing::Plain).build();
    let mut writer = Writer::with_config(Vec::new(), &config).unwrap();

    let result = writer.write_record(&record(0));
    assert!(matches!(result, Err(WarcError::Unsupported(_))));
    assert_eq!(writer.offset(), 0);
}

// =============================================================================
// Offset Overflow Tests
// =============================================================================

#[test]
fn test_offset_writer_counts_bytes() {
    let mut sink = OffsetWriter::new(Vec::new());
    sink.write_all(b"hello").unwrap();
    assert_eq!(sink.offset(), 5);
    assert_eq!(sink.into_inner(), b"hello".to_vec());
}

#[test]
fn test_offset_writer_rejects_overflow() {
    let mut sink = OffsetWriter::with_offset(Vec::new(), u64::MAX - 1);

    sink.write_all(b"x").unwrap();
    assert_eq!(sink.offset(), u64::MAX);

    assert!(sink.write(b"y").is_err());
    assert_eq!(sink.get_ref().len(), 1);
}

#[test]
fn test_writer_reports_offset_overflow() {
    let mut writer = Writer::resume(Vec::new(), u64::MAX - 4, &Config::default()).unwrap();

    match writer.write_record(&record(0)) {
        Err(WarcError::OffsetOverflow { offset, .. }) => assert_eq!(offset, u64::MAX - 4),
        other => panic!("expected OffsetOverflow, got {:?}", other),
    }
}

// =============================================================================
// Offset Log Tests
// =============================================================================

#[test]
fn test_offset_log_records_every_offset() {
    let (_temp, dir) = setup_temp_dir();
    let log_path = dir.join("archive.offsets");

    let mut writer = Writer::new(Vec::new()).with_offset_log(File::create(&log_path).unwrap());
    let offsets: Vec<Offset> = (0..5)
        .map(|i| writer.write_record(&record(i)).unwrap())
        .collect();
    writer.into_inner().unwrap();

    let logged = read_offsets(File::open(&log_path).unwrap()).unwrap();
    assert_eq!(logged, offsets);
}

#[test]
fn test_offset_log_is_little_endian() {
    let mut log = OffsetLog::new(Vec::new());
    log.append(1).unwrap();
    log.append(0x0102).unwrap();
    assert_eq!(log.entries(), 2);

    let bytes = log.into_inner();
    assert_eq!(&bytes[..8], &[1, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(&bytes[8..], &[2, 1, 0, 0, 0, 0, 0, 0]);
}

#[test]
fn test_offset_log_rejects_partial_entry() {
    let mut bytes = 7i64.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0]);

    let result = read_offsets(Cursor::new(bytes));
    assert!(matches!(result, Err(WarcError::CorruptIndex { position: 8, .. })));
}

#[test]
fn test_offset_log_rejects_negative_offset() {
    let bytes = (-1i64).to_le_bytes().to_vec();
    let result = read_offsets(Cursor::new(bytes));
    assert!(matches!(result, Err(WarcError::CorruptIndex { position: 0, .. })));
}

#[test]
fn test_offset_log_appends_across_opens() {
    let (_temp, dir) = setup_temp_dir();
    let log_path = dir.join("log");

    let mut log = OffsetLog::create(&log_path).unwrap();
    log.append(10).unwrap();
    log.flush().unwrap();
    drop(log);

    let mut log = OffsetLog::create(&log_path).unwrap();
    log.append(20).unwrap();
    log.flush().unwrap();
    drop(log);

    let logged = read_offsets(File::open(&log_path).unwrap()).unwrap();
    assert_eq!(logged, vec![10, 20]);
}

// =============================================================================
// Resume Tests
// =============================================================================

#[test]
fn test_resume_appends_to_existing_archive() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("archive.warc.gz");

    let mut writer = Writer::new(File::create(&path).unwrap());
    let first = writer.write_record(&record(0)).unwrap();
    let second = writer.write_record(&record(1)).unwrap();
    let length = writer.offset();
    writer.into_inner().unwrap();

    let file = OpenOptions::new().append(true).open(&path).unwrap();
    let mut writer = Writer::resume(file, length, &Config::default()).unwrap();
    let third = writer.write_record(&record(2)).unwrap();
    writer.into_inner().unwrap();
    assert_eq!(third, length);

    let mut reader = Reader::new(File::open(&path).unwrap());
    let read: Vec<(Offset, Record)> = std::iter::from_fn(|| reader.next_with_offset().unwrap())
        .collect();

    assert_eq!(
        read,
        vec![(first, record(0)), (second, record(1)), (third, record(2))]
    );
}
