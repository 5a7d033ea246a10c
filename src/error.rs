//! Error types for warcstore
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using WarcError
pub type Result<T> = std::result::Result<T, WarcError>;

/// Unified error type for warcstore operations
#[derive(Debug, Error)]
pub enum WarcError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Record Errors
    // -------------------------------------------------------------------------
    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Not a WARC record: first header line was {found:?}")]
    NotWarcRecord { found: String },

    // -------------------------------------------------------------------------
    // Archive Positioning Errors
    // -------------------------------------------------------------------------
    #[error("Offset overflow: {offset} + {attempted} bytes exceeds the limit of {limit}")]
    OffsetOverflow {
        offset: u64,
        attempted: u64,
        limit: u64,
    },

    #[error("Source is not seekable (requested offset {offset})")]
    NotSeekable { offset: u64 },

    #[error("End of archive at offset {offset}")]
    EndOfArchive { offset: u64 },

    #[error("Unsupported: {0}")]
    Unsupported(String),

    // -------------------------------------------------------------------------
    // Index Errors
    // -------------------------------------------------------------------------
    #[error("Index entry already exists: {0}")]
    AlreadyExists(String),

    #[error("No such index entry: {0}")]
    NoSuchEntry(String),

    #[error("Corrupt index at byte {position}: {reason}")]
    CorruptIndex { position: u64, reason: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
