//! Byte source module
//!
//! Owns the raw bytes of a newline-delimited JSON file and hands out
//! record slices one line at a time.
//!
//! # Overview
//!
//! - `ByteSource` - reference-counted bytes, either memory-mapped or buffered
//! - `Span` - an (offset, length) reference into a `ByteSource`
//! - `Records` - iterator over the record spans of a source, in file order
//!
//! Values scanned from a source never copy its bytes; they keep spans, and the
//! dataset holding them keeps a clone of the source handle.

mod buffer;

pub use buffer::{ByteSource, Records, Span};
