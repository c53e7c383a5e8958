//! Dataset module
//!
//! Lazily loaded JSON-lines datasets and their sub-views.
//!
//! # Overview
//!
//! A [`Dataset`] starts out unloaded: it only holds its byte source and
//! provenance. The first query realizes it, scanning every record once and
//! folding the row types into one aggregate type. Sub-datasets built with
//! [`Dataset::rows`], [`Dataset::field`] and friends are realized on
//! creation, carry their own schema, and remember the ancestor row number of
//! each of their rows.
//!
//! # Example
//!
//! ```
//! use jsonl_dataset::Dataset;
//!
//! let ds = Dataset::new("{\"a\": 1}\n{\"a\": 2.5, \"b\": \"x\"}\n");
//! assert_eq!(ds.nrow().unwrap(), 2);
//! assert_eq!(ds.datatype().unwrap(), r#"{"a": real, "b": text?}"#);
//!
//! let a = ds.field("a").unwrap().unwrap();
//! assert_eq!(a.datatype().unwrap(), "real");
//! ```

mod loader;
mod store;
mod subset;
mod types;

pub use store::RowStore;
pub use types::{Dataset, Provenance};

#[cfg(test)]
mod tests;
