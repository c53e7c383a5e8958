//! # jsonl-dataset
//!
//! Lazily-typed, zero-copy datasets over newline-delimited JSON.
//!
//! ## Features
//!
//! - **Lazy Loading**: A dataset is scanned on first use, exactly once
//! - **Zero Copy**: Rows are spans into a memory-mapped or buffered source
//! - **Type Inference**: Every row gets a structural type; the dataset's type
//!   is the union of all of them
//! - **Sub-datasets**: Row subsets and field projections with their own
//!   schema, remembering the source row of every value
//! - **Coercion**: Booleans, 32-bit integers, doubles and strings, with
//!   missing values for rows that do not fit
//! - **Arrow Output**: RecordBatch conversion and Parquet files
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonl_dataset::{Dataset, Simplified};
//!
//! let ds = Dataset::new("{\"a\":1,\"b\":\"x\"}\n{\"a\":2.5,\"b\":\"y\"}\n{\"a\":3}\n");
//! assert_eq!(ds.datatype()?, r#"{"a": real, "b": text?}"#);
//!
//! let a = ds.field("a")?.expect("field a exists");
//! assert_eq!(
//!     a.simplify()?,
//!     Simplified::Real(vec![Some(1.0), Some(2.5), Some(3.0)])
//! );
//! # Ok::<(), jsonl_dataset::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   spans   ┌──────────────┐  types  ┌──────────────┐
//! │  ByteSource  │ ────────▶ │   Scanner    │ ──────▶ │    Schema    │
//! │ (mmap/bytes) │           │ (serde_json) │         │ (type union) │
//! └──────────────┘           └──────┬───────┘         └──────────────┘
//!                                   │ Data
//!                            ┌──────▼───────┐
//!                            │   Dataset    │ rows / field / subscript
//!                            │ (OnceCell)   │ ──────▶ sub-datasets
//!                            └──────┬───────┘
//!                    ┌──────────────┴──────────────┐
//!             ┌──────▼───────┐              ┌──────▼───────┐
//!             │   Coercion   │              │    Output    │
//!             │  simplify()  │              │Arrow/Parquet │
//!             └──────────────┘              └──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::unused_self)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Load configuration
pub mod config;

/// Byte sources and record spans
pub mod source;

/// Type registry and union
pub mod schema;

/// JSON value scanner
pub mod decode;

/// Lazily loaded datasets and sub-datasets
pub mod dataset;

/// Conversion to plain values
pub mod coerce;

/// Arrow/Parquet output
pub mod output;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use coerce::{CoercionIssue, Coerced, Simplified};
pub use config::DatasetConfig;
pub use dataset::{Dataset, Provenance};
pub use error::{Error, Result};
pub use schema::{Kind, Schema, TypeId};
pub use source::{ByteSource, Span};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
