//! Configuration for warcstore
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, WarcError};

/// Default size of the reader's staging block (bytes)
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Default gzip level used when writing records
pub const DEFAULT_COMPRESSION_LEVEL: u32 = 6;

/// Shared configuration for readers, writers and indexes
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Framing Configuration
    // -------------------------------------------------------------------------
    /// How records are framed inside the archive stream
    pub framing: Framing,

    // -------------------------------------------------------------------------
    // Reader Configuration
    // -------------------------------------------------------------------------
    /// Size of the counting reader's staging block (in bytes)
    pub buffer_size: usize,

    // -------------------------------------------------------------------------
    // Writer Configuration
    // -------------------------------------------------------------------------
    /// Gzip compression level, 0 (store) to 9 (best)
    pub compression_level: u32,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: when to fsync the identifier index
    pub index_sync_strategy: IndexSyncStrategy,
}

/// Archive framing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Framing {
    /// One independent gzip member per record
    #[default]
    Gzip,

    /// Uncompressed records back to back (not implemented)
    Plain,
}

/// Index sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexSyncStrategy {
    /// fsync after every put (safest, slowest)
    #[default]
    EveryPut,

    /// Leave data in the OS page cache until the index is closed
    OnClose,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            framing: Framing::Gzip,
            buffer_size: DEFAULT_BUFFER_SIZE,
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            index_sync_strategy: IndexSyncStrategy::EveryPut,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that every value is usable
    pub fn validate(&self) -> Result<()> {
        if self.buffer_size == 0 {
            return Err(WarcError::Config(
                "buffer_size must be at least 1 byte".to_string(),
            ));
        }

        if self.compression_level > 9 {
            return Err(WarcError::Config(format!(
                "compression_level must be in 0..=9, got {}",
                self.compression_level
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the archive framing mode
    pub fn framing(mut self, framing: Framing) -> Self {
        self.config.framing = framing;
        self
    }

    /// Set the staging block size (in bytes)
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.config.buffer_size = size;
        self
    }

    /// Set the gzip compression level
    pub fn compression_level(mut self, level: u32) -> Self {
        self.config.compression_level = level;
        self
    }

    /// Set the index sync strategy
    pub fn index_sync_strategy(mut self, strategy: IndexSyncStrategy) -> Self {
        self.config.index_sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
