//! Coercion module
//!
//! Converts datasets into plain Rust values.
//!
//! # Overview
//!
//! Each `to_*` method on [`crate::Dataset`] produces one value per row.
//! Rows that cannot be converted become `None`; a [`Coerced`] result also
//! lists which rows were invalid and which overflowed the target range.
//! Coercion itself never fails: only loading the dataset can.
//!
//! [`crate::Dataset::simplify`] picks the conversion from the dataset's
//! aggregate kind and returns a [`Simplified`] value.

mod convert;
mod types;

pub use types::{CoercionIssue, Coerced, Simplified};
