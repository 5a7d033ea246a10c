//! Counting byte source
//!
//! Sits directly under the gzip decoder, so it does its own buffering in a
//! single fixed-size staging block instead of layering a `BufReader` over a
//! counter.

use std::io::{self, BufRead, ErrorKind, Read, Seek, SeekFrom};

use crate::config::DEFAULT_BUFFER_SIZE;

/// Buffered reader that counts every byte it hands out
///
/// `position()` is the number of bytes delivered to callers (through
/// `read`, `read_byte` or `consume`), not the number pulled from the inner
/// reader. Bytes still sitting in the staging block are not counted.
pub struct CountingReader<R> {
    inner: R,
    /// Staging block, allocated once
    buf: Box<[u8]>,
    /// Next unread byte in `buf`
    cursor: usize,
    /// Number of valid bytes in `buf`
    filled: usize,
    /// Total bytes delivered so far
    position: u64,
}

impl<R: Read> CountingReader<R> {
    /// Wrap a reader with the default staging block size
    pub fn new(inner: R) -> Self {
        Self::with_capacity(DEFAULT_BUFFER_SIZE, inner)
    }

    /// Wrap a reader with a staging block of `capacity` bytes (at least 1)
    pub fn with_capacity(capacity: usize, inner: R) -> Self {
        Self {
            inner,
            buf: vec![0u8; capacity.max(1)].into_boxed_slice(),
            cursor: 0,
            filled: 0,
            position: 0,
        }
    }

    /// Read a single byte, `Ok(None)` at end of input
    #[inline]
    pub fn read_byte(&mut self) -> io::Result<Option<u8>> {
        if self.cursor == self.filled && self.refill()? == 0 {
            return Ok(None);
        }

        let byte = self.buf[self.cursor];
        self.cursor += 1;
        self.position += 1;
        Ok(Some(byte))
    }

    /// Refill the staging block from the inner reader
    fn refill(&mut self) -> io::Result<usize> {
        loop {
            match self.inner.read(&mut self.buf) {
                Ok(n) => {
                    self.cursor = 0;
                    self.filled = n;
                    return Ok(n);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }
}

impl<R> CountingReader<R> {
    /// Total bytes delivered so far
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes staged but not yet delivered
    pub fn buffered(&self) -> usize {
        self.filled - self.cursor
    }

    /// Capacity of the staging block
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Drop staged bytes and rebase the counter.
    ///
    /// Call after repositioning the inner reader to `position`.
    pub fn discard_to(&mut self, position: u64) {
        self.cursor = 0;
        self.filled = 0;
        self.position = position;
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Reading from the inner reader directly desynchronizes `position()`
    /// until the next `discard_to`.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        let n = {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            n
        };

        self.consume(n);
        Ok(n)
    }
}

impl<R: Read> BufRead for CountingReader<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.cursor >= self.filled {
            self.refill()?;
        }
        Ok(&self.buf[self.cursor..self.filled])
    }

    #[inline]
    fn consume(&mut self, amt: usize) {
        let amt = amt.min(self.filled - self.cursor);
        self.cursor += amt;
        self.position += amt as u64;
    }
}

// =============================================================================
// Unseekable
// =============================================================================

/// Marks a source that cannot seek (stdin, sockets, decompressing pipes).
///
/// Its `Seek` impl always fails with `ErrorKind::Unsupported`, which the
/// reader reports as `WarcError::NotSeekable`. Sequential reads are
/// unaffected.
pub struct Unseekable<R>(pub R);

impl<R> Unseekable<R> {
    pub fn into_inner(self) -> R {
        self.0
    }
}

impl<R: Read> Read for Unseekable<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.read(buf)
    }
}

impl<R> Seek for Unseekable<R> {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(
            ErrorKind::Unsupported,
            "source does not support seeking",
        ))
    }
}
