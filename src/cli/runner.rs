//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::coerce::Simplified;
use crate::config::DatasetConfig;
use crate::dataset::Dataset;
use crate::error::{Error, Result, ResultExt};
use crate::output::{write_dataset_to_parquet, ParquetWriterConfig};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

/// Result of a command, rendered according to the output format
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Machine-readable message
    pub message: Value,
    /// Human-readable text
    pub text: String,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command and print its report
    pub fn run(&self) -> Result<()> {
        let report = self.execute()?;
        match self.cli.format {
            OutputFormat::Text => println!("{}", report.text),
            OutputFormat::Json => println!("{}", serde_json::to_string(&report.message)?),
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(&report.message)?);
            }
        }
        Ok(())
    }

    /// Run the command and return its report
    pub fn execute(&self) -> Result<Report> {
        let config = self.load_config()?;
        let dataset = open_dataset(self.cli.command.input(), config)?;

        match &self.cli.command {
            Commands::Schema { .. } => self.schema(&dataset),
            Commands::Fields { field, .. } => {
                let dataset = select(&dataset, None, field.as_deref())?;
                self.fields(&dataset)
            }
            Commands::Count { .. } => self.count(&dataset),
            Commands::Show { rows, field, .. } => {
                let dataset = select(&dataset, rows.as_deref(), field.as_deref())?;
                self.show(&dataset)
            }
            Commands::Export {
                output,
                rows,
                field,
                compression,
                ..
            } => {
                let dataset = select(&dataset, rows.as_deref(), field.as_deref())?;
                self.export(&dataset, output, compression)
            }
        }
    }

    /// Load the dataset configuration, or the defaults when none is given
    fn load_config(&self) -> Result<DatasetConfig> {
        let config = match &self.cli.config {
            Some(path) => DatasetConfig::from_file(path)?,
            None => DatasetConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn schema(&self, dataset: &Dataset) -> Result<Report> {
        let rows = dataset.nrow()?;
        let datatype = dataset.datatype()?;
        Ok(Report {
            message: json!({
                "type": "SCHEMA",
                "rows": rows,
                "kind": dataset.kind()?,
                "datatype": datatype,
            }),
            text: dataset.to_string(),
        })
    }

    fn fields(&self, dataset: &Dataset) -> Result<Report> {
        let Some(fields) = dataset.datatypes()? else {
            return Err(Error::config(format!(
                "dataset of type {} has no fields",
                dataset.datatype()?
            )));
        };

        let text = fields
            .iter()
            .map(|(name, datatype)| format!("{name}: {datatype}"))
            .collect::<Vec<_>>()
            .join("\n");
        let fields: Vec<Value> = fields
            .into_iter()
            .map(|(name, datatype)| json!({ "name": name, "datatype": datatype }))
            .collect();

        Ok(Report {
            message: json!({ "type": "FIELDS", "fields": fields }),
            text,
        })
    }

    fn count(&self, dataset: &Dataset) -> Result<Report> {
        let rows = dataset.nrow()?;
        Ok(Report {
            message: json!({ "type": "COUNT", "rows": rows }),
            text: rows.to_string(),
        })
    }

    fn show(&self, dataset: &Dataset) -> Result<Report> {
        let simplified = dataset.simplify()?;
        let values = simplified_to_json(&simplified)?;
        let row_numbers = dataset.row_numbers()?;

        let text = row_numbers
            .iter()
            .zip(&values)
            .map(|(row, value)| format!("{row}: {value}"))
            .collect::<Vec<_>>()
            .join("\n");

        Ok(Report {
            message: json!({
                "type": "VALUES",
                "field": dataset.field_path(),
                "kind": simplified.kind_name(),
                "rows": row_numbers,
                "values": values,
            }),
            text,
        })
    }

    fn export(&self, dataset: &Dataset, output: &Path, compression: &str) -> Result<Report> {
        let writer_config: ParquetWriterConfig = compression.parse()?;
        info!(path = %output.display(), "writing Parquet file");

        let rows = write_dataset_to_parquet(output, dataset, Some(&writer_config))
            .with_context(|| format!("Failed to export to '{}'", output.display()))?;

        Ok(Report {
            message: json!({
                "type": "EXPORT",
                "path": output.display().to_string(),
                "rows": rows,
            }),
            text: format!("wrote {rows} rows to {}", output.display()),
        })
    }
}

fn open_dataset(input: &Path, config: DatasetConfig) -> Result<Dataset> {
    debug!(path = %input.display(), mmap = config.source.mmap, "opening dataset");
    let dataset = Dataset::open_with_config(input, config)?;
    dataset.realize()?;
    Ok(dataset)
}

/// Apply an optional row selection, then each segment of a dotted field path
///
/// Path segments are split on every `.`.
fn select(dataset: &Dataset, rows: Option<&str>, field: Option<&str>) -> Result<Dataset> {
    let mut selected = match rows {
        Some(list) => dataset.rows(&parse_rows(list, dataset.nrow()?)?)?,
        None => dataset.clone(),
    };

    if let Some(path) = field {
        for name in path.split('.') {
            selected = selected
                .field(name)?
                .ok_or_else(|| Error::config(format!("unknown field '{path}'")))?;
        }
    }
    Ok(selected)
}

/// Parse `1,3,5-7` into 1-based row indices of a dataset with `nrow` rows
///
/// Indices outside `1..=nrow` fail before any range is expanded.
pub(crate) fn parse_rows(list: &str, nrow: usize) -> Result<Vec<usize>> {
    let mut rows = Vec::new();
    for part in list.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.split_once('-') {
            Some((start, end)) => {
                let start = parse_index(start)?;
                let end = parse_index(end)?;
                if end < start {
                    return Err(Error::config(format!("invalid row range '{part}'")));
                }
                check_index(start, nrow)?;
                check_index(end, nrow)?;
                rows.extend(start..=end);
            }
            None => rows.push(check_index(parse_index(part)?, nrow)?),
        }
    }
    Ok(rows)
}

fn check_index(index: usize, nrow: usize) -> Result<usize> {
    if index == 0 || index > nrow {
        return Err(Error::index_out_of_range(index, nrow));
    }
    Ok(index)
}

fn parse_index(text: &str) -> Result<usize> {
    text.trim()
        .parse()
        .map_err(|_| Error::config(format!("invalid row number '{text}'")))
}

/// Render simplified values as JSON, one value per row
pub(crate) fn simplified_to_json(simplified: &Simplified) -> Result<Vec<Value>> {
    let values: Vec<Value> = match simplified {
        Simplified::Boolean(values) => values.iter().map(|v| json!(v)).collect(),
        Simplified::Integer(values) => values.iter().map(|v| json!(v)).collect(),
        Simplified::Real(values) => values.iter().map(|v| json!(v)).collect(),
        Simplified::Text(values) => values.iter().map(|v| json!(v)).collect(),
        Simplified::List(nested) => nested
            .iter()
            .map(|ds| Ok(Value::Array(simplified_to_json(&ds.simplify()?)?)))
            .collect::<Result<_>>()?,
        Simplified::Dataset(ds) => ds
            .to_json_text()?
            .into_iter()
            .map(|text| match text {
                Some(text) => serde_json::from_str(&text).map_err(Error::from),
                None => Ok(Value::Null),
            })
            .collect::<Result<_>>()?,
    };
    Ok(values)
}
