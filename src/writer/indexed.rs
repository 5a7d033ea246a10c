//! Writer that indexes every record by identifier as it goes.

use std::io::Write;

use crate::error::{Result, WarcError};
use crate::index::{check_storable, ArchiveIndex};
use crate::record::Record;
use crate::Offset;

use super::Writer;

/// A [`Writer`] paired with an [`ArchiveIndex`]
///
/// Every record written is `put` into the index under its identifier.
/// A duplicate identifier is rejected before anything reaches the archive.
pub struct IndexedWriter<W: Write> {
    writer: Writer<W>,
    index: ArchiveIndex,
}

impl<W: Write> IndexedWriter<W> {
    pub fn new(writer: Writer<W>, index: ArchiveIndex) -> Self {
        Self { writer, index }
    }

    /// Write `record` and index it under `id`
    ///
    /// An identifier the index would reject fails before the archive is
    /// touched.
    pub fn write_record(&mut self, id: &str, record: &Record) -> Result<Offset> {
        if self.index.contains(id) {
            return Err(WarcError::AlreadyExists(id.to_string()));
        }
        check_storable(id, self.writer.offset())?;

        let offset = self.writer.write_record(record)?;
        self.index.put(id, offset)?;
        Ok(offset)
    }

    /// Write `record` and index it under the value of its `field`
    /// (e.g. `WARC-Record-ID`)
    pub fn write_record_by_field(&mut self, field: &str, record: &Record) -> Result<Offset> {
        let id = record.field(field).ok_or_else(|| {
            WarcError::MalformedRecord(format!("record has no {} field to index by", field))
        })?;

        self.write_record(id, record)
    }

    pub fn writer(&self) -> &Writer<W> {
        &self.writer
    }

    pub fn index(&self) -> &ArchiveIndex {
        &self.index
    }

    /// Flush the archive, close the index, and return the archive sink
    pub fn finish(self) -> Result<W> {
        let sink = self.writer.into_inner()?;
        self.index.close()?;
        Ok(sink)
    }
}
