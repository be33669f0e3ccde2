use anyhow::Context;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use std::fs::File;
use std::path::Path;

use crate::error::LoadError;
use crate::signal::{Recording, ScoredTable};

/// Header written with the scored table.
pub const SCORED_HEADER: [&str; 5] = ["TIME", "ECG", "RESP", "GSR", "Stress_Score"];

/// Channel names by input column position.
const CHANNEL_NAMES: [&str; 4] = ["TIME", "ECG", "GSR", "RESP"];

/// Read a four-column recording. Columns map by position to TIME, ECG, GSR,
/// RESP; the first record is always consumed as a header and its labels are
/// ignored beyond the column count. Every field must parse as a finite
/// number.
pub fn read_recording(path: &Path) -> Result<Recording, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(file);
    let header_len = reader.headers()?.len();
    if header_len != CHANNEL_NAMES.len() {
        return Err(LoadError::ColumnCount(header_len));
    }

    let mut time = Vec::new();
    let mut ecg = Vec::new();
    let mut gsr = Vec::new();
    let mut resp = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        time.push(parse_field(&record, index, 0)?);
        ecg.push(parse_field(&record, index, 1)?);
        gsr.push(parse_field(&record, index, 2)?);
        resp.push(parse_field(&record, index, 3)?);
    }
    Ok(Recording::new(time, ecg, gsr, resp))
}

fn parse_field(record: &StringRecord, index: usize, column: usize) -> Result<f64, LoadError> {
    let raw = record.get(column).unwrap_or_default();
    match raw.parse::<f64>() {
        // "inf" and "NaN" parse, but no channel can carry them.
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LoadError::BadValue {
            // 1-based file row, counting the header record.
            row: index + 2,
            column: CHANNEL_NAMES[column],
            value: raw.to_string(),
        }),
    }
}

/// Write the scored table under the canonical header.
pub fn write_scored_csv(path: &Path, table: &ScoredTable) -> anyhow::Result<()> {
    let mut writer = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    writer.write_record(SCORED_HEADER)?;
    for row in table.rows() {
        writer.write_record([
            row.time.to_string(),
            row.ecg.to_string(),
            row.resp.to_string(),
            row.gsr.to_string(),
            row.stress_score.to_string(),
        ])?;
    }
    writer.flush().context("flushing scored table")?;
    Ok(())
}
