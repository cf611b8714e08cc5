//! CSV encoding and decoding of rows.

use std::io::Read;
use std::path::Path;

use uxstudy_core::model::{Dataset, Row};
use uxstudy_core::StoreError;

/// Encode one row, optionally preceded by its header line.
///
/// The whole output is built in memory so the caller can write it with a
/// single call.
pub fn encode_row(row: &Row, with_header: bool) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if with_header {
        writer.write_record(row.columns())?;
    }
    writer.write_record(row.values())?;
    writer.into_inner().map_err(|e| e.into_error())
}

/// Encode only the header line for `row`'s columns.
pub fn encode_header(row: &Row) -> std::io::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(row.columns())?;
    writer.into_inner().map_err(|e| e.into_error())
}

/// Decode a whole dataset. The first line is the header; every later line
/// must have the same number of fields.
pub fn decode_rows<R: Read>(
    dataset: Dataset,
    path: &Path,
    reader: R,
) -> Result<Vec<Row>, StoreError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| map_csv_error(dataset, path, e))?
        .clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| map_csv_error(dataset, path, e))?;
        rows.push(headers.iter().zip(record.iter()).collect());
    }
    Ok(rows)
}

fn map_csv_error(dataset: Dataset, path: &Path, err: csv::Error) -> StoreError {
    if !err.is_io_error() {
        return StoreError::Malformed {
            dataset,
            message: err.to_string(),
        };
    }
    match err.into_kind() {
        csv::ErrorKind::Io(source) => StoreError::io(path, source),
        other => StoreError::Malformed {
            dataset,
            message: format!("{other:?}"),
        },
    }
}
