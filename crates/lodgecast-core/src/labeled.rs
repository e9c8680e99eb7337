//! Attaching predictions to an uploaded table and summarizing the label column.

use std::collections::HashMap;
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, LargeStringArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::rating::Rating;

/// Name of the label column appended to the uploaded table.
pub const PREDICTED_RATING: &str = "Predicted_Rating";

/// Append the label column to the original batch, one label per row.
///
/// The input batch keeps all of its user-visible columns; only
/// [`PREDICTED_RATING`] is added (or replaced, if the upload already
/// carried a column by that name).
pub fn with_predictions(batch: &RecordBatch, labels: &[Rating]) -> anyhow::Result<RecordBatch> {
    anyhow::ensure!(
        batch.num_rows() == labels.len(),
        "expected {} labels for {} rows, got {}",
        batch.num_rows(),
        batch.num_rows(),
        labels.len()
    );

    let label_field = Field::new(PREDICTED_RATING, DataType::Utf8, false);
    let label_col: ArrayRef = Arc::new(StringArray::from_iter_values(
        labels.iter().map(Rating::as_str),
    ));

    let mut fields: Vec<Field> = batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    match batch.schema().index_of(PREDICTED_RATING) {
        Ok(idx) => {
            fields[idx] = label_field;
            columns[idx] = label_col;
        }
        Err(_) => {
            fields.push(label_field);
            columns.push(label_col);
        }
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Count labels in the batch's [`PREDICTED_RATING`] column.
///
/// Counts reflect the *current* row set, so a filtered batch yields
/// filtered counts. Sorted by count descending, ties by label order.
pub fn rating_counts(batch: &RecordBatch) -> anyhow::Result<Vec<(Rating, usize)>> {
    let col = batch
        .column_by_name(PREDICTED_RATING)
        .ok_or_else(|| anyhow::anyhow!("missing '{PREDICTED_RATING}' column"))?;

    let mut counts: HashMap<Rating, usize> = HashMap::new();
    for row in 0..batch.num_rows() {
        let Some(label) = get_string(col.as_ref(), row) else {
            continue;
        };
        let rating: Rating = label.parse()?;
        *counts.entry(rating).or_default() += 1;
    }

    let mut out: Vec<(Rating, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    Ok(out)
}

/// Percentage per label over the given counts, rounded to two decimals.
///
/// Percentages sum to 100.00 up to rounding. An empty row set yields an
/// empty listing rather than a division by zero.
pub fn proportions(counts: &[(Rating, usize)]) -> Vec<(Rating, f64)> {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return Vec::new();
    }
    counts
        .iter()
        .map(|&(rating, n)| {
            let pct = (n as f64 / total as f64 * 10_000.0).round() / 100.0;
            (rating, pct)
        })
        .collect()
}

fn get_string(col: &dyn Array, row: usize) -> Option<&str> {
    if col.is_null(row) {
        return None;
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        return Some(arr.value(row));
    }
    if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        return Some(arr.value(row));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};

    fn listing_batch(room_types: &[&str]) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("room_type", DataType::Utf8, false),
            Field::new("price", DataType::Float64, false),
        ]);
        let prices: Vec<f64> = (0..room_types.len()).map(|i| 50.0 + i as f64).collect();
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(room_types.to_vec())),
                Arc::new(Float64Array::from(prices)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn appends_label_column_after_user_columns() {
        let batch = listing_batch(&["Entire home", "Private room"]);
        let labeled = with_predictions(&batch, &[Rating::Great, Rating::Poor]).unwrap();

        assert_eq!(labeled.num_columns(), 3);
        assert_eq!(labeled.schema().field(2).name(), PREDICTED_RATING);
        // Original columns survive untouched.
        assert_eq!(labeled.schema().field(0).name(), "room_type");

        let labels = labeled
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(labels.value(0), "Great");
        assert_eq!(labels.value(1), "Poor");
    }

    #[test]
    fn replaces_existing_label_column() {
        let batch = listing_batch(&["Entire home"]);
        let once = with_predictions(&batch, &[Rating::Average]).unwrap();
        let twice = with_predictions(&once, &[Rating::Poor]).unwrap();

        assert_eq!(twice.num_columns(), 3);
        let labels = twice
            .column(2)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(labels.value(0), "Poor");
    }

    #[test]
    fn label_count_mismatch_errors() {
        let batch = listing_batch(&["Entire home", "Shared room"]);
        assert!(with_predictions(&batch, &[Rating::Great]).is_err());
    }

    #[test]
    fn counts_sorted_by_frequency() {
        let batch = listing_batch(&["a", "b", "c", "d", "e"]);
        let labeled = with_predictions(
            &batch,
            &[
                Rating::Poor,
                Rating::Great,
                Rating::Poor,
                Rating::Poor,
                Rating::Average,
            ],
        )
        .unwrap();

        let counts = rating_counts(&labeled).unwrap();
        assert_eq!(counts[0], (Rating::Poor, 3));
        assert_eq!(counts.len(), 3);
    }

    #[test]
    fn count_ties_break_by_label_order() {
        let batch = listing_batch(&["a", "b"]);
        let labeled = with_predictions(&batch, &[Rating::Poor, Rating::Great]).unwrap();

        let counts = rating_counts(&labeled).unwrap();
        assert_eq!(counts[0].0, Rating::Great);
        assert_eq!(counts[1].0, Rating::Poor);
    }

    #[test]
    fn proportions_sum_to_hundred() {
        let counts = vec![(Rating::Great, 1), (Rating::Average, 1), (Rating::Poor, 1)];
        let pcts = proportions(&counts);
        let sum: f64 = pcts.iter().map(|(_, p)| p).sum();
        assert!((sum - 100.0).abs() < 0.02, "sum was {sum}");
        assert_eq!(pcts[0].1, 33.33);
    }

    #[test]
    fn proportions_round_to_two_decimals() {
        let counts = vec![(Rating::Great, 2), (Rating::Poor, 1)];
        let pcts = proportions(&counts);
        assert_eq!(pcts[0], (Rating::Great, 66.67));
        assert_eq!(pcts[1], (Rating::Poor, 33.33));
    }

    #[test]
    fn empty_counts_yield_empty_proportions() {
        assert!(proportions(&[]).is_empty());
    }

    #[test]
    fn counts_on_empty_batch_are_empty() {
        let batch = listing_batch(&[]);
        let labeled = with_predictions(&batch, &[]).unwrap();
        assert!(rating_counts(&labeled).unwrap().is_empty());
    }
}
