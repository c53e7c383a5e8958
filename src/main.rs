//! jsonl-dataset CLI
//!
//! Command-line interface for inspecting newline-delimited JSON files

use anyhow::Context;
use clap::Parser;
use jsonl_dataset::cli::{Cli, Runner};
use jsonl_dataset::DatasetConfig;
use tracing::Level;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // An unreadable config file is reported by the runner, not here
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        cli.config
            .as_ref()
            .and_then(|path| DatasetConfig::from_file(path).ok())
            .map_or(Level::INFO, |config| config.log_level.into())
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let command = format!("{:?}", cli.command);
    Runner::new(cli)
        .run()
        .with_context(|| format!("command failed: {command}"))
}
