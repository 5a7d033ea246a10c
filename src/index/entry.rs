//! Index entry encoding
//!
//! Layout of one identifier-keyed entry:
//! `[length: u32 BE][offset: i64 BE][identifier: length - 8 bytes]`
//! where `length` counts the offset and identifier bytes.

use std::io::{self, ErrorKind, Read};

use crate::error::{Result, WarcError};
use crate::Offset;

/// Size of the length prefix
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Size of the stored offset
pub const OFFSET_SIZE: usize = 8;

/// One identifier → offset mapping as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: String,
    pub offset: Offset,
}

impl IndexEntry {
    pub fn new(id: impl Into<String>, offset: Offset) -> Self {
        Self {
            id: id.into(),
            offset,
        }
    }

    /// Total bytes this entry occupies on disk
    pub fn encoded_len(&self) -> usize {
        LENGTH_PREFIX_SIZE + OFFSET_SIZE + self.id.len()
    }

    /// Encode to the on-disk layout
    pub fn encode(&self) -> Result<Vec<u8>> {
        let length = check_storable(&self.id, self.offset)?;
        let offset = stored_offset(self.offset)?;

        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&length.to_be_bytes());
        buf.extend_from_slice(&offset.to_be_bytes());
        buf.extend_from_slice(self.id.as_bytes());
        Ok(buf)
    }

    /// Read the entry starting at byte `position` of the index file
    ///
    /// Returns `Ok(None)` on a clean end of file (no bytes at all).
    pub fn read_from<R: Read>(reader: &mut R, position: u64) -> Result<Option<Self>> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        if !read_prefix(reader, &mut prefix)? {
            return Ok(None);
        }

        let length = u32::from_be_bytes(prefix) as u64;
        if length <= OFFSET_SIZE as u64 {
            return Err(WarcError::CorruptIndex {
                position,
                reason: format!(
                    "entry length {} leaves no room for an identifier",
                    length
                ),
            });
        }

        let mut offset = [0u8; OFFSET_SIZE];
        reader.read_exact(&mut offset)?;
        let offset = i64::from_be_bytes(offset);
        let offset = Offset::try_from(offset).map_err(|_| WarcError::CorruptIndex {
            position,
            reason: format!("negative offset {}", offset),
        })?;

        // Bounded read: a corrupt length must not size an allocation
        let id_len = length - OFFSET_SIZE as u64;
        let mut id = Vec::new();
        reader.by_ref().take(id_len).read_to_end(&mut id)?;
        if (id.len() as u64) < id_len {
            return Err(WarcError::Io(io::Error::new(
                ErrorKind::UnexpectedEof,
                format!(
                    "index entry at byte {} declares {} identifier bytes, found {}",
                    position,
                    id_len,
                    id.len()
                ),
            )));
        }

        let id = String::from_utf8(id).map_err(|e| WarcError::CorruptIndex {
            position,
            reason: format!("identifier is not valid UTF-8: {}", e),
        })?;

        Ok(Some(Self { id, offset }))
    }
}

/// Check that `(id, offset)` can be written as an entry that replays
///
/// Returns the entry's length prefix. An empty identifier would produce a
/// length of exactly 8, which replay rejects as degenerate.
pub(crate) fn check_storable(id: &str, offset: Offset) -> Result<u32> {
    if id.is_empty() {
        return Err(WarcError::Unsupported(
            "an empty identifier cannot be indexed".to_string(),
        ));
    }

    let length = u32::try_from(OFFSET_SIZE + id.len()).map_err(|_| {
        WarcError::Unsupported(format!(
            "identifier of {} bytes does not fit the index format",
            id.len()
        ))
    })?;

    stored_offset(offset)?;
    Ok(length)
}

/// Offsets are stored as signed 64-bit integers
pub(crate) fn stored_offset(offset: Offset) -> Result<i64> {
    i64::try_from(offset).map_err(|_| WarcError::OffsetOverflow {
        offset,
        attempted: 0,
        limit: i64::MAX as u64,
    })
}

/// Fill `buf` completely; `false` if the reader was already at end of file
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<bool> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) if read == 0 => return Ok(false),
            Ok(0) => {
                return Err(WarcError::Io(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    format!("truncated index length prefix ({} of {} bytes)", read, buf.len()),
                )))
            }
            Ok(n) => read += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(true)
}
