//! CSV ingest: delimited text with a header row, arbitrary columns.

use std::io::Cursor;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use tracing::info;

use crate::error::TableError;

/// Parse delimited-text bytes into a single RecordBatch.
///
/// The header row names the columns; types are inferred by Arrow. No schema
/// is enforced beyond that. A header-only upload yields a zero-row batch
/// with the inferred columns. Malformed input fails whole with
/// [`TableError::Parse`] — there is no partial recovery.
pub fn parse_csv(bytes: &[u8]) -> Result<RecordBatch, TableError> {
    let format = Format::default().with_header(true);

    let (schema, _) = format
        .infer_schema(Cursor::new(bytes), None)
        .map_err(TableError::Parse)?;
    if schema.fields().is_empty() {
        return Err(TableError::Parse(ArrowError::CsvError(
            "input has no header row".to_string(),
        )));
    }
    let schema = Arc::new(schema);

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(Cursor::new(bytes))
        .map_err(TableError::Parse)?;

    let batches: Vec<RecordBatch> = reader
        .collect::<Result<_, ArrowError>>()
        .map_err(TableError::Parse)?;

    let batch = if batches.is_empty() {
        RecordBatch::new_empty(schema)
    } else {
        concat_batches(&schema, &batches).map_err(TableError::Parse)?
    };

    info!(
        rows = batch.num_rows(),
        columns = batch.num_columns(),
        "parsed upload"
    );
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, Int64Array, StringArray};

    #[test]
    fn parses_header_and_rows() {
        let csv = b"room_type,price\nEntire home,120\nPrivate room,45\n";
        let batch = parse_csv(csv).unwrap();

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 2);
        assert_eq!(batch.schema().field(0).name(), "room_type");

        let rooms = batch
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(rooms.value(1), "Private room");

        let prices = batch
            .column(1)
            .as_any()
            .downcast_ref::<Int64Array>()
            .unwrap();
        assert_eq!(prices.value(0), 120);
    }

    #[test]
    fn header_only_yields_empty_batch() {
        let batch = parse_csv(b"room_type,price\n").unwrap();
        assert_eq!(batch.num_rows(), 0);
        assert_eq!(batch.num_columns(), 2);
    }

    #[test]
    fn empty_input_is_parse_error() {
        let err = parse_csv(b"").unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn ragged_row_is_parse_error() {
        let err = parse_csv(b"a,b\n1,2,3\n").unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn empty_cells_become_nulls() {
        let batch = parse_csv(b"price,beds\n100,\n,2\n").unwrap();
        assert_eq!(batch.num_rows(), 2);
        assert!(batch.column(1).is_null(0));
        assert!(batch.column(0).is_null(1));
    }
}
