//! CSV series loader.
//!
//! Expects a header row. The label and value columns are found by header name
//! (`label`, `value`, case-insensitive); without a match the first column is
//! the label and the second the value. Extra columns are ignored. Rows are
//! kept in file order and numbered from 0 in arrival order.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tidemark_core::{Observation, TidemarkError};
use tracing::{debug, info};

const LABEL_HEADER: &str = "label";
const VALUE_HEADER: &str = "value";

/// Load every row of the CSV file at `path`.
pub fn load_observations(path: &Path) -> Result<Vec<Observation>, TidemarkError> {
    let file = File::open(path)?;
    let observations = read_observations(BufReader::new(file))?;
    info!(
        "Loaded {} observations from {}",
        observations.len(),
        path.display()
    );
    Ok(observations)
}

/// Parse observations from any CSV source.
pub fn read_observations<R: Read>(source: R) -> Result<Vec<Observation>, TidemarkError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(|e| csv_error(e, 0))?.clone();
    let (label_idx, value_idx) = resolve_columns(&headers);
    debug!(label_idx, value_idx, "resolved csv columns");

    let mut observations = Vec::new();
    for (i, result) in reader.records().enumerate() {
        let row = i + 1;
        let record = result.map_err(|e| csv_error(e, row))?;
        observations.push(parse_record(&record, row, label_idx, value_idx)?);
    }
    Ok(observations)
}

fn resolve_columns(headers: &csv::StringRecord) -> (usize, usize) {
    let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    (find(LABEL_HEADER).unwrap_or(0), find(VALUE_HEADER).unwrap_or(1))
}

fn parse_record(
    record: &csv::StringRecord,
    row: usize,
    label_idx: usize,
    value_idx: usize,
) -> Result<Observation, TidemarkError> {
    let label = record
        .get(label_idx)
        .ok_or_else(|| TidemarkError::input_format(row, "missing label field"))?;
    let raw = record
        .get(value_idx)
        .ok_or_else(|| TidemarkError::input_format(row, "missing value field"))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| TidemarkError::input_format(row, format!("value '{}' is not a number", raw)))?;
    if !value.is_finite() {
        return Err(TidemarkError::input_format(
            row,
            format!("value '{}' is not finite", raw),
        ));
    }

    Ok(Observation::new(label, value, row - 1))
}

fn csv_error(err: csv::Error, fallback_row: usize) -> TidemarkError {
    let row = err
        .position()
        .map(|p| p.record() as usize)
        .unwrap_or(fallback_row);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => TidemarkError::Io(e),
        _ => TidemarkError::input_format(row, message),
    }
}
