//! # warcstore
//!
//! Record-at-time compressed WARC archives with:
//! - One independent gzip member per record
//! - Sequential reading and writing with exact byte offsets
//! - Random access to any record given its starting offset
//! - A persistent identifier → offset index
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Writer / IndexedWriter                       │
//! │        (record → gzip member, offset reported back)          │
//! └──────────────┬──────────────────────────────┬───────────────┘
//!                │ bytes                        │ id, offset
//!                ▼                              ▼
//!        ┌───────────────┐             ┌────────────────┐
//!        │    Archive    │             │  ArchiveIndex  │
//!        │ [gz][gz][gz]  │             │ (append-only)  │
//!        └───────┬───────┘             └────────┬───────┘
//!                │                              │ lookup(id)
//!                ▼                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Reader                              │
//! │        (next_record sequentially, record_at(offset))         │
//! └─────────────────────────────────────────────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod reader;
pub mod writer;
pub mod index;
pub mod parallel;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{Result, WarcError};
pub use config::{Config, ConfigBuilder, Framing, IndexSyncStrategy};
pub use record::{NamedField, Record};
pub use reader::Reader;
pub use writer::{IndexedWriter, Writer};
pub use index::{ArchiveIndex, OffsetLog, SharedIndex};

/// Byte position in the compressed archive where a record's unit begins
pub type Offset = u64;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of warcstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
