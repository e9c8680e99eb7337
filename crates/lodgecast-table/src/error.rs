use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("malformed csv: {0}")]
    Parse(arrow::error::ArrowError),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
