//! Schema module
//!
//! Structural type inference over JSON values.
//!
//! # Features
//!
//! - **Type Arena**: Every discovered type lives in an append-only table and is
//!   referred to by a [`TypeId`]; ids never go stale
//! - **Type Union**: Least upper bound of two types in the kind lattice
//!   (`null` at the bottom, `any` at the top)
//! - **Optional Fields**: Record fields missing from some rows are marked
//!   optional
//! - **Name Interning**: Field names are stored once and referred to by
//!   [`NameId`]
//! - **Rendering**: One-line and multi-line type descriptions

mod registry;
mod render;
mod types;

pub use registry::Schema;
pub use render::TypeDisplay;
pub use types::{DataType, FieldType, Kind, NameId, RecordType, TypeId};
