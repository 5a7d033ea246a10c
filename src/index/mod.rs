//! Index Module
//!
//! Side files that translate into archive offsets without a full scan.
//!
//! ## Identifier-Keyed Index (`ArchiveIndex`)
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │ Entry 1                                             │
//! │ ┌──────────────┬────────────────┬─────────────────┐ │
//! │ │ Len u32 BE   │ Offset i64 BE  │ Identifier      │ │
//! │ │ (4)          │ (8)            │ (Len - 8)       │ │
//! │ └──────────────┴────────────────┴─────────────────┘ │
//! ├─────────────────────────────────────────────────────┤
//! │ Entry 2 ...                                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//! Append-only; replayed into a `HashMap` on open.
//!
//! ## Positional Offset Log (`OffsetLog`)
//! ```text
//! ┌────────────────┬────────────────┬─────┐
//! │ Offset i64 LE  │ Offset i64 LE  │ ... │   one per record, write order
//! └────────────────┴────────────────┴─────┘
//! ```
//! Written by a `Writer` configured with an offset log. Carries no
//! identifiers: the caller associates sequence position with meaning.

mod archive;
mod entry;
mod offset_log;
mod shared;

pub use archive::ArchiveIndex;
pub use entry::{IndexEntry, LENGTH_PREFIX_SIZE, OFFSET_SIZE};
pub(crate) use entry::check_storable;
pub use offset_log::{read_offsets, OffsetLog, OFFSET_LOG_ENTRY_SIZE};
pub use shared::SharedIndex;
