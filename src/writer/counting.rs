//! Offset-tracking writer wrapper.

use std::io::{self, ErrorKind, Write};

use crate::error::WarcError;
use crate::Offset;

/// A writer wrapper that counts bytes written through it.
///
/// The running total is the archive offset of the next byte. A write that
/// would push it past `u64::MAX` fails before touching the inner writer.
#[derive(Debug)]
pub struct OffsetWriter<W> {
    inner: W,
    offset: Offset,
}

impl<W> OffsetWriter<W> {
    /// Start counting from zero.
    pub fn new(inner: W) -> Self {
        Self::with_offset(inner, 0)
    }

    /// Start counting from `offset`, e.g. when appending to an existing
    /// archive of that length.
    pub fn with_offset(inner: W, offset: Offset) -> Self {
        Self { inner, offset }
    }

    /// Offset of the next byte to be written.
    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Write for OffsetWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let attempted = buf.len() as u64;
        if self.offset.checked_add(attempted).is_none() {
            return Err(io::Error::new(
                ErrorKind::Other,
                WarcError::OffsetOverflow {
                    offset: self.offset,
                    attempted,
                    limit: u64::MAX,
                },
            ));
        }

        let n = self.inner.write(buf)?;
        self.offset += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Recover a `WarcError` that travelled through an `io::Error`
pub(crate) fn lift(e: io::Error) -> WarcError {
    let is_ours = e
        .get_ref()
        .map_or(false, |inner| inner.is::<WarcError>());

    if !is_ours {
        return WarcError::Io(e);
    }

    match e.into_inner().map(|inner| inner.downcast::<WarcError>()) {
        Some(Ok(ours)) => *ours,
        Some(Err(other)) => WarcError::Io(io::Error::new(ErrorKind::Other, other)),
        None => WarcError::Io(io::Error::from(ErrorKind::Other)),
    }
}
