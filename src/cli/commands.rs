//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Inspect and convert newline-delimited JSON files
#[derive(Parser, Debug)]
#[command(name = "jsonl-dataset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Dataset configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dataset's aggregate type
    Schema {
        /// Input file (one JSON value per line)
        input: PathBuf,
    },

    /// List field names and their types
    Fields {
        /// Input file (one JSON value per line)
        input: PathBuf,

        /// Dotted field path to descend into first (names containing '.' cannot be selected)
        #[arg(long)]
        field: Option<String>,
    },

    /// Count rows
    Count {
        /// Input file (one JSON value per line)
        input: PathBuf,
    },

    /// Print simplified values
    Show {
        /// Input file (one JSON value per line)
        input: PathBuf,

        /// Rows to select (1-based, comma-separated, ranges like 2-5)
        #[arg(long)]
        rows: Option<String>,

        /// Dotted field path to project (names containing '.' cannot be selected)
        #[arg(long)]
        field: Option<String>,
    },

    /// Write the dataset to a Parquet file
    Export {
        /// Input file (one JSON value per line)
        input: PathBuf,

        /// Output Parquet file
        #[arg(short, long)]
        output: PathBuf,

        /// Rows to select (1-based, comma-separated, ranges like 2-5)
        #[arg(long)]
        rows: Option<String>,

        /// Dotted field path to project (names containing '.' cannot be selected)
        #[arg(long)]
        field: Option<String>,

        /// Compression: none, snappy, zstd or gzip
        #[arg(long, default_value = "snappy")]
        compression: String,
    },
}

impl Commands {
    /// Input file of the command
    pub fn input(&self) -> &PathBuf {
        match self {
            Commands::Schema { input }
            | Commands::Fields { input, .. }
            | Commands::Count { input }
            | Commands::Show { input, .. }
            | Commands::Export { input, .. } => input,
        }
    }
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Text,
    /// JSON output (one message per line)
    Json,
    /// Indented JSON output
    Pretty,
}
