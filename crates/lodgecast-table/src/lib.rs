//! Table layer: CSV ingest into Arrow RecordBatches, alignment against the
//! model's expected feature schema, row filtering, and CSV export.

mod align;
mod error;
mod export;
mod ingest;

pub use align::align;
pub use error::TableError;
pub use export::{distinct_values, filter_equals, to_csv_bytes};
pub use ingest::parse_csv;
