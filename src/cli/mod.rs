//! CLI module
//!
//! Command-line interface for inspecting JSON-lines files.
//!
//! # Commands
//!
//! - `schema` - Print the aggregate type
//! - `fields` - List field names and types
//! - `count` - Count rows
//! - `show` - Print simplified values of a row or field selection
//! - `export` - Write the dataset to Parquet

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{Report, Runner};
