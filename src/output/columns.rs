//! Dataset to Arrow conversion
//!
//! Scalar columns map onto native Arrow arrays. Columns that stay nested or
//! heterogeneous after simplification are exported as their raw JSON text.

use crate::coerce::Simplified;
use crate::dataset::Dataset;
use crate::error::Result;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int32Array, StringArray};
use arrow::datatypes::{Field, Schema as ArrowSchema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Column name used when a dataset of non-records is exported
pub const VALUE_COLUMN: &str = "value";

/// Convert one dataset column into an Arrow array
pub fn column_to_array(column: &Dataset) -> Result<ArrayRef> {
    let array: ArrayRef = match column.simplify()? {
        Simplified::Boolean(values) => Arc::new(BooleanArray::from(values)),
        Simplified::Integer(values) => Arc::new(Int32Array::from(values)),
        Simplified::Real(values) => Arc::new(Float64Array::from(values)),
        Simplified::Text(values) => Arc::new(StringArray::from(values)),
        Simplified::List(_) | Simplified::Dataset(_) => {
            Arc::new(StringArray::from(column.to_json_text()?))
        }
    };
    Ok(array)
}

/// Convert a dataset into a RecordBatch
///
/// Record datasets get one column per field; any other dataset becomes a
/// single `value` column.
pub fn dataset_to_record_batch(dataset: &Dataset) -> Result<RecordBatch> {
    let columns = if dataset.is_record()? {
        dataset.columns()?
    } else {
        vec![(VALUE_COLUMN.to_string(), dataset.clone())]
    };

    let mut fields = Vec::with_capacity(columns.len());
    let mut arrays = Vec::with_capacity(columns.len());
    for (name, column) in &columns {
        let array = column_to_array(column)?;
        fields.push(Field::new(name, array.data_type().clone(), true));
        arrays.push(array);
    }

    let schema = Arc::new(ArrowSchema::new(fields));
    let options = RecordBatchOptions::new().with_row_count(Some(dataset.nrow()?));
    let batch = RecordBatch::try_new_with_options(schema, arrays, &options)?;
    Ok(batch)
}
