//! Record decoder module
//!
//! Scans one JSON value at a time into a [`Data`] tree of spans and type ids.
//!
//! # Overview
//!
//! The scanner validates a record with `serde_json`, borrowing every nested
//! value as a `RawValue` so that no text is copied. Each value is classified
//! by kind, registered in a [`crate::schema::Schema`], and kept as a span into
//! the source bytes. Records and arrays keep their scanned children so fields
//! can be looked up later without scanning again.

mod scanner;
mod types;

pub use scanner::{ScanError, Scanner};
pub use types::{Children, Data};
