//! Writer Module
//!
//! Sequential encoding of records, one gzip member per record.
//!
//! ## Responsibilities
//! - Encode each record and compress it as an independent member
//! - Finish every member so the next record starts a fresh one
//! - Report the offset at which each record's member begins
//! - Optionally log those offsets (positional offset log) or index them
//!   by identifier (`IndexedWriter`)

mod counting;
mod indexed;

use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::config::{Config, Framing};
use crate::error::{Result, WarcError};
use crate::index::OffsetLog;
use crate::record::{encode_record_into, Record};
use crate::Offset;

pub use counting::OffsetWriter;
pub use indexed::IndexedWriter;

use counting::lift;

/// Archive writer
///
/// Offsets returned by `write_record` are strictly increasing.
pub struct Writer<W: Write> {
    sink: OffsetWriter<W>,
    framing: Framing,
    level: Compression,
    offset_log: Option<OffsetLog<Box<dyn Write + Send>>>,
    records_written: u64,
}

impl<W: Write> Writer<W> {
    /// Create a gzip writer with default settings
    pub fn new(sink: W) -> Self {
        Self::build(OffsetWriter::new(sink), &Config::default())
    }

    /// Create a writer with an explicit configuration
    pub fn with_config(sink: W, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(OffsetWriter::new(sink), config))
    }

    /// Continue an archive that already holds `offset` bytes
    ///
    /// `sink` must append (e.g. a file opened in append mode); offsets are
    /// counted from `offset`.
    pub fn resume(sink: W, offset: Offset, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(OffsetWriter::with_offset(sink, offset), config))
    }

    fn build(sink: OffsetWriter<W>, config: &Config) -> Self {
        Self {
            sink,
            framing: config.framing,
            level: Compression::new(config.compression_level),
            offset_log: None,
            records_written: 0,
        }
    }

    /// Also append each record's offset (i64 little-endian) to `log`
    pub fn with_offset_log(mut self, log: impl Write + Send + 'static) -> Self {
        self.offset_log = Some(OffsetLog::new(Box::new(log)));
        self
    }

    /// Write one record as its own gzip member
    ///
    /// Returns the offset at which the member begins. No field validation
    /// is performed.
    pub fn write_record(&mut self, record: &Record) -> Result<Offset> {
        if self.framing == Framing::Plain {
            return Err(WarcError::Unsupported(
                "plain (uncompressed) framing is not implemented; \
                 records can only be written as gzip members"
                    .to_string(),
            ));
        }

        let offset = self.sink.offset();

        let mut encoder = GzEncoder::new(&mut self.sink, self.level);
        encode_record_into(&mut encoder, record).map_err(lift)?;
        encoder.finish().map_err(lift)?;

        if let Some(log) = self.offset_log.as_mut() {
            log.append(offset)?;
        }

        self.records_written += 1;
        tracing::trace!(
            "Wrote record {} at offset {} ({} compressed bytes)",
            self.records_written,
            offset,
            self.sink.offset() - offset
        );

        Ok(offset)
    }

    /// Offset at which the next record will begin
    pub fn offset(&self) -> Offset {
        self.sink.offset()
    }

    /// Records written through this writer
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Flush the archive sink and the offset log
    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush().map_err(lift)?;
        if let Some(log) = self.offset_log.as_mut() {
            log.flush()?;
        }
        Ok(())
    }

    pub fn get_ref(&self) -> &W {
        self.sink.get_ref()
    }

    /// Flush everything and return the archive sink
    pub fn into_inner(mut self) -> Result<W> {
        self.flush()?;
        tracing::debug!(
            "Writer finished: {} records, {} bytes",
            self.records_written,
            self.sink.offset()
        );
        Ok(self.sink.into_inner())
    }
}
