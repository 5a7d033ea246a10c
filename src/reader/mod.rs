//! Reader Module
//!
//! Sequential and random-access decoding of record-at-time compressed
//! archives.
//!
//! ## Layering
//! ```text
//!   Reader::next_record / record_at
//!            │
//!   record codec (header + block)
//!            │
//!   RecordFramer (one gzip member per call)
//!            │
//!   CountingReader (staging block + position)
//!            │
//!   inner source (File, Cursor, stdin, ...)
//! ```
//!
//! Offsets returned by `offset()` and accepted by `record_at()` are byte
//! positions in the compressed stream where a member begins.

mod framer;
mod source;

use std::io::{ErrorKind, Read, Seek, SeekFrom};

use bytes::Bytes;

use crate::config::{Config, Framing};
use crate::error::{Result, WarcError};
use crate::record::{decode_record, Record};
use crate::Offset;

pub use framer::{FrameState, RecordFramer};
pub use source::{CountingReader, Unseekable};

/// Archive reader
///
/// Owns its own source, decoder state and position; share nothing between
/// threads; give each worker its own `Reader` over its own handle.
pub struct Reader<R> {
    source: CountingReader<R>,
    framer: RecordFramer,
}

impl<R: Read> Reader<R> {
    /// Open a record-at-time gzip archive with default settings
    pub fn new(inner: R) -> Self {
        Self::build(inner, &Config::default())
    }

    /// Open with an explicit configuration
    pub fn with_config(inner: R, config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(inner, config))
    }

    pub(crate) fn build(inner: R, config: &Config) -> Self {
        Self {
            source: CountingReader::with_capacity(config.buffer_size, inner),
            framer: RecordFramer::new(config.framing),
        }
    }

    /// Offset at which the next record begins
    pub fn offset(&self) -> Offset {
        self.source.position()
    }

    pub fn framing(&self) -> Framing {
        self.framer.framing()
    }

    /// Next undecoded record, `Ok(None)` at end of archive
    ///
    /// For pipelines that fan raw units out and parse them elsewhere.
    pub fn next_raw(&mut self) -> Result<Option<Bytes>> {
        self.framer.decode_one(&mut self.source)
    }

    /// Next record, `Ok(None)` at end of archive
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        match self.next_raw()? {
            Some(raw) => decode_record(raw).map(Some),
            None => Ok(None),
        }
    }

    /// Next record together with the offset it started at
    pub fn next_with_offset(&mut self) -> Result<Option<(Offset, Record)>> {
        let offset = self.offset();
        Ok(self.next_record()?.map(|record| (offset, record)))
    }

    /// Iterate over the remaining records
    ///
    /// Iteration stops after the first error.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            done: false,
        }
    }

    pub fn get_ref(&self) -> &R {
        self.source.get_ref()
    }

    pub fn into_inner(self) -> R {
        self.source.into_inner()
    }
}

impl<R: Read> Reader<Unseekable<R>> {
    /// Open a source that can only be read front to back
    ///
    /// `record_at`/`raw_at` fail with `NotSeekable`.
    pub fn from_stream(inner: R) -> Self {
        Self::new(Unseekable(inner))
    }
}

impl<R: Read + Seek> Reader<R> {
    /// Move to the unit starting at `offset`
    ///
    /// Staged bytes are dropped; the next sequential call decodes the
    /// record at `offset`.
    pub fn seek_to(&mut self, offset: Offset) -> Result<()> {
        self.source
            .get_mut()
            .seek(SeekFrom::Start(offset))
            .map_err(|e| match e.kind() {
                ErrorKind::Unsupported => WarcError::NotSeekable { offset },
                _ => WarcError::Io(e),
            })?;

        self.source.discard_to(offset);
        self.framer.rearm(offset);

        tracing::trace!("Seeked to offset {}", offset);
        Ok(())
    }

    /// Undecoded record at `offset`
    ///
    /// Leaves the reader positioned right after that record.
    pub fn raw_at(&mut self, offset: Offset) -> Result<Bytes> {
        self.seek_to(offset)?;
        self.next_raw()?
            .ok_or(WarcError::EndOfArchive { offset })
    }

    /// Record at `offset`
    ///
    /// `offset` must be the start of a unit (as returned by a writer or an
    /// index); anything else decodes as a malformed record.
    pub fn record_at(&mut self, offset: Offset) -> Result<Record> {
        decode_record(self.raw_at(offset)?)
    }
}

// =============================================================================
// Iteration
// =============================================================================

/// Iterator over the remaining records of a [`Reader`]
pub struct Records<'a, R> {
    reader: &'a mut Reader<R>,
    done: bool,
}

impl<'a, R: Read> Iterator for Records<'a, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
