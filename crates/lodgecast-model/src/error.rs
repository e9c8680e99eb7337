use thiserror::Error;

/// Fatal failures while resolving or decoding the model artifact.
///
/// None of these are retried: without a model the pipeline has nothing
/// further to do.
#[derive(Debug, Error)]
pub enum ModelLoadError {
    #[error("model fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("model cache io: {0}")]
    Io(#[from] std::io::Error),

    #[error("model artifact parse: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model artifact: {0}")]
    Artifact(String),
}

/// Shape or type incompatibility between the aligned table and the model.
///
/// Surfaced whole — no partial label sequence is produced.
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("aligned table has {got} columns, model expects {expected}")]
    ColumnCount { expected: usize, got: usize },

    #[error("aligned column {index} is {got:?}, model expects {expected:?}")]
    ColumnName {
        index: usize,
        expected: String,
        got: String,
    },

    #[error("column {column:?} is not numeric: {source}")]
    NonNumeric {
        column: String,
        source: arrow::error::ArrowError,
    },
}
