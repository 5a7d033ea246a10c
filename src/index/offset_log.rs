//! Positional offset log
//!
//! The writer-embedded index: one `i64` little-endian offset per record, in
//! write order, no identifiers. The N-th entry is the N-th record written.
//! Not interchangeable with the identifier-keyed format; never mix the two
//! in one file.

use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Result, WarcError};
use crate::Offset;

use super::entry::stored_offset;

/// Size of one offset log entry
pub const OFFSET_LOG_ENTRY_SIZE: usize = 8;

/// Appends record offsets to a sink
#[derive(Debug)]
pub struct OffsetLog<W> {
    inner: W,
    entries: u64,
}

impl OffsetLog<File> {
    /// Open or create an offset log file for appending
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> OffsetLog<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, entries: 0 }
    }

    /// Append one offset
    pub fn append(&mut self, offset: Offset) -> Result<()> {
        let stored = stored_offset(offset)?;
        self.inner.write_all(&stored.to_le_bytes())?;
        self.entries += 1;
        Ok(())
    }

    /// Entries appended through this handle
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Read every offset from an offset log
pub fn read_offsets<R: Read>(mut reader: R) -> Result<Vec<Offset>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;

    let chunks = data.chunks_exact(OFFSET_LOG_ENTRY_SIZE);
    if !chunks.remainder().is_empty() {
        return Err(WarcError::CorruptIndex {
            position: (data.len() - chunks.remainder().len()) as u64,
            reason: format!(
                "trailing partial entry of {} bytes",
                chunks.remainder().len()
            ),
        });
    }

    chunks
        .enumerate()
        .map(|(i, chunk)| {
            let mut raw = [0u8; OFFSET_LOG_ENTRY_SIZE];
            raw.copy_from_slice(chunk);
            let value = i64::from_le_bytes(raw);
            Offset::try_from(value).map_err(|_| WarcError::CorruptIndex {
                position: (i * OFFSET_LOG_ENTRY_SIZE) as u64,
                reason: format!("negative offset {}", value),
            })
        })
        .collect()
}
