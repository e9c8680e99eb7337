//! The single-shot upload→prediction→report pipeline.
//!
//! Strictly linear: parse → align → predict → label → filter → report →
//! export. Every stage error surfaces whole at the top of the run; nothing
//! is retried and no partial output is produced. Only the model cache
//! outlives a run.

use std::path::PathBuf;

use anyhow::Context;
use lodgecast_core::{rating_counts, with_predictions};
use lodgecast_model::{ModelSource, get_model};
use lodgecast_table::{align, distinct_values, filter_equals, parse_csv, to_csv_bytes};

use crate::chart::{self, ChartKind};
use crate::report;

pub struct PredictOptions {
    pub input: PathBuf,
    pub out: Option<PathBuf>,
    pub chart: ChartKind,
    pub filter: Option<(String, String)>,
    pub importance: bool,
}

pub struct PredictStats {
    /// Rows classified (the whole upload).
    pub total_rows: usize,
    /// Rows surviving the optional filter, as reported and exported.
    pub reported_rows: usize,
}

/// Run the full pipeline for one uploaded file.
pub async fn run_predict(
    source: &ModelSource,
    opts: &PredictOptions,
) -> anyhow::Result<PredictStats> {
    let model = get_model(source).await.context("loading model")?;

    let bytes = std::fs::read(&opts.input)
        .with_context(|| format!("reading {}", opts.input.display()))?;
    let uploaded = parse_csv(&bytes).context("parsing upload")?;

    println!("Uploaded preview:");
    report::print_preview(&uploaded)?;

    let aligned = align(&uploaded, model.features());
    let labels = model.predict(&aligned).context("classifying listings")?;
    let labeled = with_predictions(&uploaded, &labels)?;

    println!("\nTotal predictions: {}", labels.len());

    let reported = match &opts.filter {
        Some((column, value)) => {
            let filtered =
                filter_equals(&labeled, column, value).context("applying filter")?;
            println!("Filter {column}={value}: {} rows", filtered.num_rows());
            if filtered.num_rows() == 0 && labeled.num_rows() > 0 {
                let available = distinct_values(&labeled, column)?;
                println!("  no match; available values: {}", available.join(", "));
            }
            filtered
        }
        None => labeled.clone(),
    };

    let counts = rating_counts(&reported)?;

    println!("\nRating proportions:");
    report::print_proportions(&counts);

    println!("\nRating distribution:");
    print!("{}", chart::render(&counts, opts.chart));

    if opts.importance {
        println!("\nFeature importance:");
        report::print_importance(&model);
    }

    if let Some(out) = &opts.out {
        let csv = to_csv_bytes(&reported).context("serializing output csv")?;
        std::fs::write(out, csv).with_context(|| format!("writing {}", out.display()))?;
        println!("\nWrote {} rows to {}", reported.num_rows(), out.display());
    }

    Ok(PredictStats {
        total_rows: labels.len(),
        reported_rows: reported.num_rows(),
    })
}

/// Print the loaded model's schema, class set, and importance listing.
pub async fn run_model_info(source: &ModelSource) -> anyhow::Result<()> {
    let model = get_model(source).await.context("loading model")?;

    println!("Expected feature columns ({}):", model.features().len());
    for feature in model.features() {
        println!("  {feature}");
    }

    let classes: Vec<&str> = model.classes().iter().map(|r| r.as_str()).collect();
    println!("Classes: {}", classes.join(", "));
    println!("Trees: {}", model.num_trees());

    println!("Feature importance:");
    report::print_importance(&model);
    Ok(())
}

/// Parse a `COL=VALUE` filter argument.
pub fn parse_filter(raw: &str) -> anyhow::Result<(String, String)> {
    let (column, value) = raw
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("filter must be COL=VALUE, got {raw:?}"))?;
    anyhow::ensure!(!column.is_empty(), "filter column is empty in {raw:?}");
    Ok((column.to_string(), value.to_string()))
}
