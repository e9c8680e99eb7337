//! Feature alignment: reconcile an arbitrary uploaded column set against the
//! model's fixed expected schema.

use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use tracing::warn;

/// Project a batch onto the expected feature columns, in expected order.
///
/// Columns absent from the upload are synthesized as Float64 zeros; extra
/// columns are dropped. Total and deterministic: alignment never rejects an
/// upload, it imputes. Each synthesized column is warned about, since
/// zero-fill is a data-quality hazard the caller should see in the logs,
/// not a statistically justified default.
///
/// The input batch is untouched — user-visible columns survive alongside
/// the aligned copy handed to the predictor.
pub fn align(batch: &RecordBatch, expected: &[String]) -> RecordBatch {
    let n = batch.num_rows();
    let schema = batch.schema();

    let mut fields: Vec<Field> = Vec::with_capacity(expected.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(expected.len());

    for name in expected {
        match schema.index_of(name) {
            Ok(idx) => {
                fields.push(schema.field(idx).clone());
                columns.push(batch.column(idx).clone());
            }
            Err(_) => {
                warn!(
                    column = %name,
                    "expected feature missing from upload, filling with zeros"
                );
                fields.push(Field::new(name, DataType::Float64, false));
                columns.push(Arc::new(Float64Array::from(vec![0.0; n])));
            }
        }
    }

    RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)
        .expect("aligned columns share the input row count")
}
