//! Thread-shared index handle

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::Offset;

use super::ArchiveIndex;

/// An [`ArchiveIndex`] behind `Arc<RwLock<_>>`
///
/// ## Concurrency:
/// - `put`: exclusive write lock, one writer at a time
/// - `lookup`/`resolve`: shared read lock, many concurrent readers
/// - Clones share the same index
#[derive(Debug, Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<ArchiveIndex>>,
}

impl SharedIndex {
    pub fn new(index: ArchiveIndex) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Open or create an index and share it
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        ArchiveIndex::open(path).map(Self::new)
    }

    pub fn put(&self, id: impl Into<String>, offset: Offset) -> Result<()> {
        self.inner.write().put(id, offset)
    }

    pub fn lookup(&self, id: &str) -> Result<Offset> {
        self.inner.read().lookup(id)
    }

    /// Resolve many identifiers under a single read lock
    ///
    /// Fails on the first missing identifier.
    pub fn resolve<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Offset>> {
        let index = self.inner.read();
        ids.iter().map(|id| index.lookup(id.as_ref())).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.inner.read().contains(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Take the index back if this is the last handle
    pub fn into_inner(self) -> std::result::Result<ArchiveIndex, Self> {
        Arc::try_unwrap(self.inner)
            .map(|lock| lock.into_inner())
            .map_err(|inner| Self { inner })
    }
}
