//! Coercion result types

use crate::dataset::Dataset;
use crate::error::Result;
use crate::types::RowNumber;
use std::fmt;

/// Why a row did not coerce to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionIssue {
    /// The row's JSON type cannot represent the target
    Invalid,
    /// The row is numeric but outside the target's range
    Overflow,
}

impl fmt::Display for CoercionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionIssue::Invalid => write!(f, "invalid"),
            CoercionIssue::Overflow => write!(f, "overflow"),
        }
    }
}

/// Values of a coerced dataset, one per row, `None` where missing
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced<T> {
    /// Coerced values in row order
    pub values: Vec<Option<T>>,
    /// Ancestor row numbers of rows that overflowed the target range
    pub overflow_rows: Vec<RowNumber>,
    /// Ancestor row numbers of rows whose type could not be coerced
    pub invalid_rows: Vec<RowNumber>,
}

impl<T> Default for Coerced<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            overflow_rows: Vec::new(),
            invalid_rows: Vec::new(),
        }
    }
}

impl<T> Coerced<T> {
    pub(crate) fn with_capacity(rows: usize) -> Self {
        Self {
            values: Vec::with_capacity(rows),
            overflow_rows: Vec::new(),
            invalid_rows: Vec::new(),
        }
    }

    pub(crate) fn record(
        &mut self,
        row: RowNumber,
        outcome: std::result::Result<Option<T>, CoercionIssue>,
    ) {
        match outcome {
            Ok(value) => self.values.push(value),
            Err(CoercionIssue::Overflow) => {
                self.overflow_rows.push(row);
                self.values.push(None);
            }
            Err(CoercionIssue::Invalid) => {
                self.invalid_rows.push(row);
                self.values.push(None);
            }
        }
    }

    /// Check if any row overflowed
    pub fn overflowed(&self) -> bool {
        !self.overflow_rows.is_empty()
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if there are no values
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of missing values, whatever the cause
    pub fn missing(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Drop the diagnostics and keep the values
    pub fn into_values(self) -> Vec<Option<T>> {
        self.values
    }
}

/// A dataset reduced to the most specific form its aggregate kind allows
#[derive(Debug, Clone, PartialEq)]
pub enum Simplified {
    Boolean(Vec<Option<bool>>),
    Integer(Vec<Option<i32>>),
    Real(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    /// One nested dataset per row of an array dataset
    List(Vec<Dataset>),
    /// Record or heterogeneous datasets stay as they are
    Dataset(Dataset),
}

impl Simplified {
    /// Simplify again; a no-op for everything but an unsimplified dataset
    pub fn simplify(self) -> Result<Simplified> {
        match self {
            Simplified::Dataset(ds) => ds.simplify(),
            other => Ok(other),
        }
    }

    /// Number of values (rows for an unsimplified dataset)
    pub fn len(&self) -> Result<usize> {
        Ok(match self {
            Simplified::Boolean(v) => v.len(),
            Simplified::Integer(v) => v.len(),
            Simplified::Real(v) => v.len(),
            Simplified::Text(v) => v.len(),
            Simplified::List(v) => v.len(),
            Simplified::Dataset(ds) => ds.nrow()?,
        })
    }

    /// Name of the variant, for messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Simplified::Boolean(_) => "boolean",
            Simplified::Integer(_) => "integer",
            Simplified::Real(_) => "real",
            Simplified::Text(_) => "text",
            Simplified::List(_) => "list",
            Simplified::Dataset(_) => "dataset",
        }
    }
}
