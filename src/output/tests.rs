//! Tests for output module

use super::*;
use crate::dataset::Dataset;
use arrow::array::{Array, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use std::fs::File;
use tempfile::tempdir;

const USERS: &str = concat!(
    "{\"id\": 1, \"name\": \"Alice\", \"score\": 9.5, \"active\": true, \"tags\": [\"a\"]}\n",
    "{\"id\": 2, \"name\": \"Bob\", \"score\": 7, \"tags\": []}\n",
    "{\"id\": 3, \"name\": null, \"score\": 8.25, \"active\": false, \"tags\": [\"b\", \"c\"]}\n",
);

// ============================================================================
// Column Conversion Tests
// ============================================================================

#[test]
fn test_column_to_array_scalars() {
    let ds = Dataset::new(USERS);

    let id = column_to_array(&ds.field("id").unwrap().unwrap()).unwrap();
    assert_eq!(id.data_type(), &DataType::Int32);
    let id = id.as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(id.values().to_vec(), vec![1, 2, 3]);

    let score = column_to_array(&ds.field("score").unwrap().unwrap()).unwrap();
    let score = score.as_any().downcast_ref::<Float64Array>().unwrap();
    assert_eq!(score.value(1), 7.0);

    let name = column_to_array(&ds.field("name").unwrap().unwrap()).unwrap();
    let name = name.as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(name.value(0), "Alice");
    assert!(name.is_null(2));

    let active = column_to_array(&ds.field("active").unwrap().unwrap()).unwrap();
    let active = active.as_any().downcast_ref::<BooleanArray>().unwrap();
    assert!(active.value(0));
    assert!(active.is_null(1));
}

#[test]
fn test_column_to_array_nested_as_json_text() {
    let ds = Dataset::new(USERS);
    let tags = column_to_array(&ds.field("tags").unwrap().unwrap()).unwrap();
    assert_eq!(tags.data_type(), &DataType::Utf8);
    let tags = tags.as_any().downcast_ref::<StringArray>().unwrap();
    assert_eq!(tags.value(0), "[\"a\"]");
    assert_eq!(tags.value(1), "[]");
    assert_eq!(tags.value(2), "[\"b\", \"c\"]");
}

#[test]
fn test_column_to_array_integer_overflow_widens() {
    let ds = Dataset::new("1\n9999999999\n");
    let array = column_to_array(&ds).unwrap();
    assert_eq!(array.data_type(), &DataType::Float64);
}

// ============================================================================
// RecordBatch Tests
// ============================================================================

#[test]
fn test_dataset_to_record_batch() {
    let ds = Dataset::new(USERS);
    let batch = dataset_to_record_batch(&ds).unwrap();
    assert_eq!(batch.num_rows(), 3);

    let schema = batch.schema();
    let names: Vec<_> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["id", "name", "score", "active", "tags"]);
    assert_eq!(schema.field(0).data_type(), &DataType::Int32);
    assert_eq!(schema.field(2).data_type(), &DataType::Float64);
    assert!(schema.fields().iter().all(|f| f.is_nullable()));
}

#[test]
fn test_scalar_dataset_to_record_batch() {
    let ds = Dataset::new("1.5\n2\n");
    let batch = dataset_to_record_batch(&ds).unwrap();
    assert_eq!(batch.num_columns(), 1);
    assert_eq!(batch.schema().field(0).name(), VALUE_COLUMN);
}

#[test]
fn test_heterogeneous_dataset_to_record_batch() {
    let ds = Dataset::new("1\n\"a\"\n{\"b\": 2}\n");
    let batch = dataset_to_record_batch(&ds).unwrap();
    let values = batch
        .column(0)
        .as_any()
        .downcast_ref::<StringArray>()
        .unwrap();
    assert_eq!(values.value(1), "\"a\"");
    assert_eq!(values.value(2), "{\"b\": 2}");
}

#[test]
fn test_empty_record_dataset_keeps_row_count() {
    let ds = Dataset::new("{}\n{}\n");
    let batch = dataset_to_record_batch(&ds).unwrap();
    assert_eq!(batch.num_columns(), 0);
    assert_eq!(batch.num_rows(), 2);
}

// ============================================================================
// Parquet Writer Tests
// ============================================================================

#[test]
fn test_write_dataset_to_parquet() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("users.parquet");

    let ds = Dataset::new(USERS);
    let rows = write_dataset_to_parquet(&path, &ds, None).unwrap();
    assert_eq!(rows, 3);

    let file = File::open(&path).unwrap();
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    let batches: Vec<_> = reader.collect::<std::result::Result<_, _>>().unwrap();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(total, 3);
    assert_eq!(batches[0].num_columns(), 5);
}

#[test]
fn test_write_with_custom_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("custom.parquet");

    let ds = Dataset::new("\"x\"\n\"y\"\n");
    let batch = dataset_to_record_batch(&ds).unwrap();
    let config = ParquetWriterConfig::new()
        .with_compression(Compression::UNCOMPRESSED)
        .with_row_group_size(1)
        .with_dictionary(false)
        .with_statistics(false);

    let rows = write_batch_to_parquet(&path, &batch, Some(&config)).unwrap();
    assert_eq!(rows, 2);
    assert!(path.exists());
}

#[test]
fn test_writer_counts_rows_across_batches() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("batches.parquet");

    let ds = Dataset::new("1\n2\n3\n");
    let batch = dataset_to_record_batch(&ds).unwrap();
    let mut writer =
        ParquetWriter::new(&path, batch.schema().as_ref(), &ParquetWriterConfig::default())
            .unwrap();
    writer.write(&batch).unwrap();
    writer.write(&batch).unwrap();
    assert_eq!(writer.rows_written(), 6);
    assert_eq!(writer.close().unwrap(), 6);
}

#[test]
fn test_writer_config_from_str() {
    let config: ParquetWriterConfig = "zstd".parse().unwrap();
    assert!(matches!(config.compression(), Compression::ZSTD(_)));

    let config: ParquetWriterConfig = "NONE".parse().unwrap();
    assert_eq!(config.compression(), Compression::UNCOMPRESSED);

    assert!("lz5".parse::<ParquetWriterConfig>().is_err());
}

#[test]
fn test_write_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no/such/dir/out.parquet");
    let ds = Dataset::new("1\n");
    let err = write_dataset_to_parquet(&path, &ds, None).unwrap_err();
    assert!(matches!(err, crate::Error::Output { .. }));
}
