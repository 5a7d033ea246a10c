//! Identifier-keyed archive index
//!
//! Append-only file plus an in-memory `HashMap` mirror rebuilt on open.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use crate::config::{Config, IndexSyncStrategy};
use crate::error::{Result, WarcError};
use crate::Offset;

use super::entry::IndexEntry;

/// Persistent identifier → offset mapping
///
/// The file is the source of truth. Every `put` appends to the file before
/// touching the map, so the map is never ahead of disk.
///
/// ## Concurrency
/// Not synchronized. Concurrent `put`s need external locking (see
/// [`SharedIndex`](super::SharedIndex)); lookups from many threads are fine
/// once writes have stopped.
#[derive(Debug)]
pub struct ArchiveIndex {
    /// Path of the backing file
    path: PathBuf,
    /// Backing file, opened in append mode
    file: File,
    /// In-memory mirror of every entry in the file
    entries: HashMap<String, Offset>,
    /// When to fsync after appends
    sync_strategy: IndexSyncStrategy,
    /// Bytes in the backing file
    file_len: u64,
}

impl ArchiveIndex {
    /// Open or create an index with default settings
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, &Config::default())
    }

    /// Open or create an index
    ///
    /// On open:
    /// 1. Create the file if it does not exist
    /// 2. Replay every entry into memory
    /// 3. Fail on degenerate lengths, truncated entries or duplicates
    ///
    /// ## Errors
    /// - `CorruptIndex { position }`: an entry whose length prefix is 8 or
    ///   less (no identifier bytes), a negative offset, a non-UTF-8
    ///   identifier, or an identifier seen twice. A degenerate length is
    ///   reported here rather than as an end-of-file error.
    /// - `Io(UnexpectedEof)`: the file ends inside an entry.
    pub fn open_with_config(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        config.validate()?;
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(path)?;

        let (entries, file_len) = Self::replay(&file)?;

        tracing::debug!(
            "Opened index {}: {} entries, {} bytes",
            path.display(),
            entries.len(),
            file_len
        );

        Ok(Self {
            path: path.to_path_buf(),
            file,
            entries,
            sync_strategy: config.index_sync_strategy,
            file_len,
        })
    }

    /// Rebuild the in-memory mirror from the file
    fn replay(file: &File) -> Result<(HashMap<String, Offset>, u64)> {
        let mut reader = BufReader::new(file);
        let mut entries = HashMap::new();
        let mut position = 0u64;

        while let Some(entry) = IndexEntry::read_from(&mut reader, position)? {
            let size = entry.encoded_len() as u64;

            if entries.contains_key(&entry.id) {
                return Err(WarcError::CorruptIndex {
                    position,
                    reason: format!("duplicate identifier {:?}", entry.id),
                });
            }

            entries.insert(entry.id, entry.offset);
            position += size;
        }

        Ok((entries, position))
    }

    /// Map `id` to `offset`
    ///
    /// Fails with `AlreadyExists` (and changes nothing) if `id` is mapped,
    /// and with `Unsupported` or `OffsetOverflow` (again changing nothing)
    /// if the pair cannot be stored, e.g. an empty `id`.
    pub fn put(&mut self, id: impl Into<String>, offset: Offset) -> Result<()> {
        let entry = IndexEntry::new(id, offset);
        if self.entries.contains_key(&entry.id) {
            return Err(WarcError::AlreadyExists(entry.id));
        }

        // Disk first, then memory
        let bytes = entry.encode()?;
        self.file.write_all(&bytes)?;
        if self.sync_strategy == IndexSyncStrategy::EveryPut {
            self.file.sync_data()?;
        }
        self.file_len += bytes.len() as u64;

        tracing::trace!("Indexed {:?} at offset {}", entry.id, offset);
        self.entries.insert(entry.id, offset);
        Ok(())
    }

    /// Offset mapped to `id`
    pub fn lookup(&self, id: &str) -> Result<Offset> {
        self.get(id)
            .ok_or_else(|| WarcError::NoSuchEntry(id.to_string()))
    }

    /// Offset mapped to `id`, if any
    pub fn get(&self, id: &str) -> Option<Offset> {
        self.entries.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Offset)> + '_ {
        self.entries.iter().map(|(id, &offset)| (id.as_str(), offset))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the backing file in bytes
    pub fn file_len(&self) -> u64 {
        self.file_len
    }

    /// Flush to stable storage and release the file and the map
    pub fn close(self) -> Result<()> {
        self.file.sync_all()?;
        tracing::debug!(
            "Closed index {} with {} entries",
            self.path.display(),
            self.entries.len()
        );
        Ok(())
    }
}
