use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use lodgecast_model::{DEFAULT_CACHE_FILE, DEFAULT_MODEL_URL, ModelSource};

mod chart;
mod pipeline;
mod report;

use chart::ChartKind;

#[derive(Parser)]
#[command(
    name = "lodgecast",
    version,
    about = "Cold-start rating prediction for property listings"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct ModelArgs {
    /// Remote model artifact URL
    #[arg(long, env = "LODGECAST_MODEL_URL", default_value = DEFAULT_MODEL_URL)]
    model_url: String,

    /// Local cache file for the model artifact
    #[arg(long, env = "LODGECAST_MODEL_CACHE", default_value = DEFAULT_CACHE_FILE)]
    model_cache: PathBuf,
}

impl ModelArgs {
    fn source(&self) -> ModelSource {
        ModelSource {
            url: self.model_url.clone(),
            cache_path: self.model_cache.clone(),
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Classify a CSV of listings and report the rating distribution
    Predict {
        /// Input CSV with a header row
        input: PathBuf,

        /// Write the labeled (and filtered) table to this CSV file
        #[arg(long)]
        out: Option<PathBuf>,

        /// Chart rendering of the rating counts
        #[arg(long, value_enum, default_value = "bar")]
        chart: ChartKind,

        /// Keep only rows where a column equals a value
        #[arg(long, value_name = "COL=VALUE")]
        filter: Option<String>,

        /// Print the top-10 feature importances
        #[arg(long)]
        importance: bool,

        #[command(flatten)]
        model: ModelArgs,
    },

    /// Show the model's feature schema, classes, and importances
    ModelInfo {
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("lodgecast v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Predict {
            input,
            out,
            chart,
            filter,
            importance,
            model,
        } => {
            let filter = filter.as_deref().map(pipeline::parse_filter).transpose()?;
            let opts = pipeline::PredictOptions {
                input,
                out,
                chart,
                filter,
                importance,
            };
            pipeline::run_predict(&model.source(), &opts).await?;
        }
        Command::ModelInfo { model } => {
            pipeline::run_model_info(&model.source()).await?;
        }
    }
    Ok(())
}
