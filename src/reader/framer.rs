//! Record-at-time framing
//!
//! Each record is its own gzip member. The framer decodes exactly one member
//! per call and then re-arms for the member that starts at the current
//! source position.
//!
//! ```text
//!                 decode_one()
//!  AwaitingUnit ───────────────▶ DecodingUnit
//!   { start }                     { start }
//!       ▲                             │
//!       └──────── member done ────────┘
//!            (start = source.position())
//! ```

use std::io::{self, BufRead, ErrorKind, Read};

use bytes::Bytes;
use flate2::bufread::GzDecoder;

use super::source::CountingReader;
use crate::config::Framing;
use crate::error::{Result, WarcError};
use crate::Offset;

/// Framer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameState {
    /// Ready to decode the unit beginning at `start`
    AwaitingUnit { start: Offset },

    /// A unit beginning at `start` is being decoded
    DecodingUnit { start: Offset },
}

/// Splits an archive stream into independently compressed units
#[derive(Debug)]
pub struct RecordFramer {
    framing: Framing,
    state: FrameState,
}

impl RecordFramer {
    pub fn new(framing: Framing) -> Self {
        Self {
            framing,
            state: FrameState::AwaitingUnit { start: 0 },
        }
    }

    pub fn framing(&self) -> Framing {
        self.framing
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Position the framer at a unit boundary (after a seek)
    pub fn rearm(&mut self, position: Offset) {
        self.state = FrameState::AwaitingUnit { start: position };
    }

    /// Decode the next unit from `source`
    ///
    /// Returns:
    /// - `Ok(Some(bytes))`: the decompressed unit
    /// - `Ok(None)`: end of archive (the source did not advance)
    /// - `Err(MalformedRecord)`: the unit is corrupt or truncated
    pub fn decode_one<R: Read>(&mut self, source: &mut CountingReader<R>) -> Result<Option<Bytes>> {
        match self.framing {
            Framing::Gzip => self.decode_gzip_member(source),
            Framing::Plain => Err(WarcError::Unsupported(
                "plain (uncompressed) framing is not implemented; \
                 only record-at-time gzip archives can be read"
                    .to_string(),
            )),
        }
    }

    fn decode_gzip_member<R: Read>(
        &mut self,
        source: &mut CountingReader<R>,
    ) -> Result<Option<Bytes>> {
        if let FrameState::DecodingUnit { start } = self.state {
            tracing::debug!("Abandoning partially decoded unit at offset {}", start);
        }

        let start = source.position();
        self.state = FrameState::DecodingUnit { start };

        // Nothing left to frame
        if source.fill_buf()?.is_empty() {
            self.rearm(start);
            return Ok(None);
        }

        let mut unit = Vec::new();
        let decoded = GzDecoder::new(&mut *source).read_to_end(&mut unit);

        let end = source.position();
        self.rearm(end);

        if let Err(e) = decoded {
            tracing::warn!("Failed to decode unit at offset {}: {}", start, e);
            return Err(unit_error(start, e));
        }

        if end == start {
            return Ok(None);
        }

        tracing::trace!(
            "Decoded unit at offset {}: {} compressed bytes, {} decompressed",
            start,
            end - start,
            unit.len()
        );

        Ok(Some(Bytes::from(unit)))
    }
}

/// Corrupt gzip data becomes a malformed record; anything else is I/O
fn unit_error(start: Offset, e: io::Error) -> WarcError {
    match e.kind() {
        ErrorKind::InvalidData | ErrorKind::InvalidInput | ErrorKind::UnexpectedEof => {
            WarcError::MalformedRecord(format!(
                "corrupt compressed unit at offset {}: {}",
                start, e
            ))
        }
        _ => WarcError::Io(e),
    }
}
