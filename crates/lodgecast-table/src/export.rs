//! Row filtering and CSV export of the labeled table.

use std::collections::HashSet;

use arrow::array::{Array, Scalar, StringArray};
use arrow::compute::kernels::cmp::eq;
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;

use crate::error::TableError;

/// Keep only rows whose `column` renders equal to `value`.
///
/// The column is cast to Utf8 first, so numeric columns filter by their
/// printed form — matching what a dropdown of distinct values offers.
pub fn filter_equals(
    batch: &RecordBatch,
    column: &str,
    value: &str,
) -> Result<RecordBatch, TableError> {
    let col = batch
        .column_by_name(column)
        .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;

    let as_text = cast(col, &DataType::Utf8)?;
    let needle = Scalar::new(StringArray::from_iter_values([value]));
    let mask = eq(&as_text, &needle)?;
    Ok(filter_record_batch(batch, &mask)?)
}

/// Distinct non-null values of a column, in first-appearance order.
///
/// These are the choices a categorical filter offers for the column.
pub fn distinct_values(batch: &RecordBatch, column: &str) -> Result<Vec<String>, TableError> {
    let col = batch
        .column_by_name(column)
        .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;

    let as_text = cast(col, &DataType::Utf8)?;
    let arr = as_text
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| TableError::ColumnNotFound(column.to_string()))?;

    let mut seen = HashSet::new();
    let mut values = Vec::new();
    for row in 0..arr.len() {
        if arr.is_null(row) {
            continue;
        }
        let v = arr.value(row);
        if seen.insert(v.to_string()) {
            values.push(v.to_string());
        }
    }
    Ok(values)
}

/// Serialize a batch to UTF-8, comma-separated text with a header row.
///
/// Lossless for pipeline output: re-ingesting the bytes through
/// [`crate::parse_csv`] reproduces the data. An empty batch exports the
/// header row only.
pub fn to_csv_bytes(batch: &RecordBatch) -> Result<Vec<u8>, TableError> {
    let mut buf = Vec::new();
    {
        let mut writer = arrow::csv::WriterBuilder::new()
            .with_header(true)
            .build(&mut buf);
        writer.write(batch)?;
    }
    Ok(buf)
}
