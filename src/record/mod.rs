//! Record Module
//!
//! The logical unit stored in an archive: ordered header fields plus an
//! opaque block.
//!
//! ## Wire Format (one record, before compression)
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ WARC/1.0\r\n                                 │  magic line
//! │ Name: Value\r\n                              │  zero or more fields
//! │ ...                                          │
//! │ \r\n                                         │  end of header
//! ├──────────────────────────────────────────────┤
//! │ block bytes (Content-Length of them)         │
//! ├──────────────────────────────────────────────┤
//! │ \r\n\r\n                                     │  record trailer
//! └──────────────────────────────────────────────┘
//! ```

mod codec;

use bytes::Bytes;

use crate::error::Result;

pub use codec::{decode_record, encode_record, encode_record_into, MAGIC};

/// Field holding the declared block length
pub const CONTENT_LENGTH: &str = "Content-Length";

/// Field conventionally holding the record identifier
pub const RECORD_ID: &str = "WARC-Record-ID";

/// A single `Name: Value` header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    pub name: String,
    pub value: String,
}

impl NamedField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Case-insensitive name comparison
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

/// A decoded (or to-be-encoded) archive record
///
/// Fields keep their wire order and may repeat; lookups are
/// case-insensitive and return the first match.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub fields: Vec<NamedField>,
    pub block: Bytes,
}

impl Record {
    /// Create an empty record (no fields, empty block)
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field, builder style
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_field(name, value);
        self
    }

    /// Set the block and a matching `Content-Length` field
    pub fn with_block(mut self, block: impl Into<Bytes>) -> Self {
        self.block = block.into();
        let len = self.block.len().to_string();
        self.set_field(CONTENT_LENGTH, len);
        self
    }

    /// Append a field, keeping any existing field of the same name
    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push(NamedField::new(name, value));
    }

    /// Overwrite the first field with this name, or append one
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        match self.fields.iter_mut().find(|f| f.is(name)) {
            Some(field) => field.value = value.into(),
            None => self.push_field(name, value),
        }
    }

    /// Value of the first field with this name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.is(name))
            .map(|f| f.value.as_str())
    }

    /// Values of every field with this name, in record order
    pub fn fields_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.fields
            .iter()
            .filter(move |f| f.is(name))
            .map(|f| f.value.as_str())
    }

    /// Declared block length, if present and a valid non-negative integer
    pub fn content_length(&self) -> Option<u64> {
        self.field(CONTENT_LENGTH)?.parse().ok()
    }

    /// The `WARC-Record-ID` field
    pub fn record_id(&self) -> Option<&str> {
        self.field(RECORD_ID)
    }

    /// Encode to the uncompressed wire format
    pub fn encode(&self) -> Vec<u8> {
        encode_record(self)
    }

    /// Decode from the uncompressed wire format
    pub fn decode(raw: impl Into<Bytes>) -> Result<Self> {
        decode_record(raw.into())
    }
}
