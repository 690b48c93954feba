use std::io::Write;
use std::path::Path;

use anyhow::Result;
use siga_cli::{MapFormat, SigaConfig};
use siga_core::summary::{filter_by_codes, map_points};
use siga_io::write_rows;
use tracing::info;

use crate::commands::util::{load_batch, open_output, parse_types};

pub fn handle(
    config: &SigaConfig,
    input: &Path,
    output: Option<&Path>,
    format: Option<MapFormat>,
    types: Option<&str>,
    encoding: Option<&str>,
) -> Result<()> {
    let batch = load_batch(input, config, encoding, false)?;
    let selected = filter_by_codes(&batch.records, &parse_types(types));
    let points = map_points(selected.iter().copied());

    let format = format.unwrap_or_else(|| infer_format(output));
    let mut writer = open_output(output)?;
    match format {
        MapFormat::Csv => {
            write_rows(&points, writer)?;
        }
        MapFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &points)?;
            writeln!(writer)?;
        }
    }

    info!(
        located = points.len(),
        unlocated = selected.len() - points.len(),
        "exported map points"
    );
    Ok(())
}

fn infer_format(output: Option<&Path>) -> MapFormat {
    match output
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("json") | Some("geojson") => MapFormat::Json,
        _ => MapFormat::Csv,
    }
}
