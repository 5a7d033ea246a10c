//! Record codec
//!
//! Encoding and decoding between raw (decompressed) bytes and [`Record`]s.
//!
//! Decoding rules:
//! - header and block are split on the first blank line
//! - the first header line must be exactly [`MAGIC`]
//! - every other header line is `Name: Value`; both sides are trimmed
//! - a parsable `Content-Length` truncates the block to that many bytes

use std::io::Write;

use bytes::Bytes;

use super::{NamedField, Record};
use crate::error::{Result, WarcError};

/// First line of every record header
pub const MAGIC: &str = "WARC/1.0";

/// Line terminator used on the wire
const CRLF: &[u8] = b"\r\n";

/// Blank line separating header from block
const HEADER_END: &[u8] = b"\r\n\r\n";

/// Appended after the block
const RECORD_TRAILER: &[u8] = b"\r\n\r\n";

// =============================================================================
// Encoding
// =============================================================================

/// Encode a record to bytes
///
/// Format: magic line + field lines + blank line + block + trailer
pub fn encode_record(record: &Record) -> Vec<u8> {
    let len: usize = wire_pieces(record).map(<[u8]>::len).sum();
    let mut out = Vec::with_capacity(len);
    for piece in wire_pieces(record) {
        out.extend_from_slice(piece);
    }
    out
}

/// Stream an encoded record into a writer without building it in memory
pub fn encode_record_into<W: Write>(writer: &mut W, record: &Record) -> std::io::Result<()> {
    for piece in wire_pieces(record) {
        writer.write_all(piece)?;
    }
    Ok(())
}

/// The encoded record as a sequence of byte slices, in wire order
fn wire_pieces(record: &Record) -> impl Iterator<Item = &[u8]> + '_ {
    let fields = record.fields.iter().flat_map(|field| {
        [
            field.name.as_bytes(),
            b": ".as_slice(),
            field.value.as_bytes(),
            CRLF,
        ]
    });

    [MAGIC.as_bytes(), CRLF]
        .into_iter()
        .chain(fields)
        .chain([CRLF, &record.block[..], RECORD_TRAILER])
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a record from bytes
///
/// The block is a zero-copy slice of `raw`.
pub fn decode_record(raw: Bytes) -> Result<Record> {
    let split = find(&raw, HEADER_END).ok_or_else(|| {
        WarcError::MalformedRecord(format!(
            "no blank line between header and block in {} bytes",
            raw.len()
        ))
    })?;

    let header = std::str::from_utf8(&raw[..split]).map_err(|e| {
        WarcError::MalformedRecord(format!("header is not valid UTF-8: {}", e))
    })?;

    let mut lines = header.split("\r\n");

    // split() always yields at least one item
    let first = lines.next().unwrap_or_default();
    if first != MAGIC {
        return Err(WarcError::NotWarcRecord {
            found: first.to_string(),
        });
    }

    let fields = lines
        .enumerate()
        .map(|(i, line)| decode_field(i + 2, line))
        .collect::<Result<Vec<_>>>()?;

    let mut record = Record {
        fields,
        block: raw.slice(split + HEADER_END.len()..),
    };

    if let Some(declared) = record.content_length() {
        let available = record.block.len();
        match usize::try_from(declared) {
            Ok(len) if len <= available => record.block.truncate(len),
            _ => {
                return Err(WarcError::MalformedRecord(format!(
                    "Content-Length {} exceeds block of {} bytes",
                    declared, available
                )))
            }
        }
    }

    Ok(record)
}

/// Decode one `Name: Value` line (line numbers are 1-based)
fn decode_field(line_no: usize, line: &str) -> Result<NamedField> {
    let (name, value) = line.split_once(':').ok_or_else(|| {
        WarcError::MalformedRecord(format!(
            "header line {} has no colon: {:?}",
            line_no, line
        ))
    })?;

    Ok(NamedField::new(name.trim(), value.trim()))
}

/// Position of the first occurrence of `needle` in `haystack`
fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
