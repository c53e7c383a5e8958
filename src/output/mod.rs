//! Output module
//!
//! Arrow RecordBatch conversion and Parquet file writing.
//!
//! # Overview
//!
//! - Converting dataset columns to Arrow arrays
//! - Converting whole datasets to RecordBatches
//! - Writing Parquet files

mod columns;
mod writer;

pub use columns::{column_to_array, dataset_to_record_batch, VALUE_COLUMN};
pub use writer::{
    write_batch_to_parquet, write_dataset_to_parquet, ParquetWriter, ParquetWriterConfig,
};

#[cfg(test)]
mod tests;
