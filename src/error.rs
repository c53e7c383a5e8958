//! Error types for jsonl-dataset
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Per-row coercion problems are not errors: they surface as missing values
//! on [`crate::coerce::Coerced`]. Everything below aborts the operation that
//! raised it and leaves no partially built dataset behind.

use thiserror::Error;

/// The main error type for jsonl-dataset
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Dataset Errors
    // ============================================================================
    #[error("memory allocation failure")]
    OutOfMemory,

    #[error("error parsing row {row} of JSON file: {message}")]
    MalformedRecord { row: u64, message: String },

    #[error("invalid index: {index} (valid range is 1..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("number of rows ({requested}) exceeds maximum ({maximum})")]
    CapacityExceeded { requested: usize, maximum: usize },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Arrow/Parquet Errors
    // ============================================================================
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a malformed record error for a 1-based row number
    pub fn malformed(row: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            row,
            message: message.into(),
        }
    }

    /// Create an index out of range error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Row number attached to this error, if any
    pub fn row(&self) -> Option<u64> {
        match self {
            Error::MalformedRecord { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// Check if this error came from a structural limit rather than bad input
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, Error::OutOfMemory | Error::CapacityExceeded { .. })
    }
}

/// Result type alias for jsonl-dataset
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
