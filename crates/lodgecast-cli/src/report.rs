//! Terminal report: upload preview, rating proportion table, and the
//! feature-importance listing.

use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use lodgecast_core::{Rating, proportions};
use lodgecast_model::RatingModel;

const PREVIEW_ROWS: usize = 5;

/// Print the first rows of the upload, pretty-printed.
pub fn print_preview(batch: &RecordBatch) -> anyhow::Result<()> {
    let head = batch.slice(0, batch.num_rows().min(PREVIEW_ROWS));
    println!("{}", pretty_format_batches(&[head])?);
    Ok(())
}

/// Print the label/count/percentage table over the current row set.
pub fn print_proportions(counts: &[(Rating, usize)]) {
    if counts.is_empty() {
        println!("  (no rows)");
        return;
    }

    let pcts = proportions(counts);
    println!("  {:<10} {:>7} {:>9}", "Rating", "Count", "Percent");
    for ((rating, n), (_, pct)) in counts.iter().zip(&pcts) {
        println!("  {:<10} {:>7} {:>8.2}%", rating.as_str(), n, pct);
    }
}

/// Print the top-10 importance listing, or say the model has none.
pub fn print_importance(model: &RatingModel) {
    match model.feature_importance() {
        Some(ranked) => {
            println!("  {:<26} {:>10}", "Feature", "Importance");
            for (feature, score) in ranked {
                println!("  {:<26} {:>10.4}", feature, score);
            }
        }
        None => println!("  model does not expose feature importances"),
    }
}
