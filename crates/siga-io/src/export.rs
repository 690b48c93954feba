//! Delimited-text export of normalized batches.
//!
//! Output is plain comma-separated UTF-8 with a header row and the `csv`
//! crate's standard quoting. Absent values are written as empty cells.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use siga_core::NormalizedRecord;
use tracing::debug;

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    state_code: &'a str,
    generation_type_code: &'a str,
    generation_type_label: &'a str,
    power_kw: f64,
    granted_power_kw: f64,
    inspected_power_kw: f64,
    guaranteed_power_kw: f64,
    is_qualified_generation: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    municipality: Option<&'a str>,
}

impl<'a> From<&'a NormalizedRecord> for ExportRow<'a> {
    fn from(record: &'a NormalizedRecord) -> Self {
        Self {
            name: &record.name,
            state_code: &record.state_code,
            generation_type_code: &record.generation_type_code,
            generation_type_label: &record.generation_type_label,
            power_kw: record.power_kw(),
            granted_power_kw: record.granted_power_kw,
            inspected_power_kw: record.inspected_power_kw,
            guaranteed_power_kw: record.guaranteed_power_kw,
            is_qualified_generation: record.is_qualified_generation,
            latitude: record.latitude,
            longitude: record.longitude,
            municipality: record.municipality.as_deref(),
        }
    }
}

/// Write normalized records to `writer`; returns the number of data rows.
pub fn write_csv<'a, I, W>(records: I, writer: W) -> Result<usize>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
    W: Write,
{
    write_rows(records.into_iter().map(ExportRow::from), writer)
}

/// Export normalized records to `path`, replacing any existing file.
pub fn export_csv<'a, I>(records: I, path: &Path) -> Result<usize>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let file = File::create(path)
        .with_context(|| format!("creating export file '{}'", path.display()))?;
    let rows = write_csv(records, file)
        .with_context(|| format!("writing export file '{}'", path.display()))?;
    debug!(path = %path.display(), rows, "exported normalized records");
    Ok(rows)
}

/// Serialize any row type with a header derived from its field names.
pub fn write_rows<T, I, W>(rows: I, writer: W) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    W: Write,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut count = 0;
    for row in rows {
        csv_writer.serialize(row).context("serializing CSV row")?;
        count += 1;
    }
    csv_writer.flush().context("flushing CSV output")?;
    Ok(count)
}
