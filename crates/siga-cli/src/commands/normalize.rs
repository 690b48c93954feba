use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use siga_cli::SigaConfig;
use siga_io::write_csv;
use tracing::info;

use crate::commands::util::{load_batch, open_output};

pub fn handle(
    config: &SigaConfig,
    input: &Path,
    output: Option<&Path>,
    encoding: Option<&str>,
    diagnostics_path: Option<&Path>,
) -> Result<()> {
    let batch = load_batch(input, config, encoding, true)?;

    let writer = open_output(output)?;
    let rows = write_csv(&batch.records, writer).context("writing normalized CSV")?;

    if let (Some(path), Some(diagnostics)) = (diagnostics_path, &batch.diagnostics) {
        let json = serde_json::to_string_pretty(diagnostics)?;
        fs::write(path, json)
            .with_context(|| format!("writing diagnostics to '{}'", path.display()))?;
        info!(path = %path.display(), issues = diagnostics.issues.len(), "wrote diagnostics");
    }

    info!(
        rows,
        source_rows = batch.raw.len(),
        output = %output.map_or("stdout".to_string(), |p| p.display().to_string()),
        "normalization complete"
    );
    Ok(())
}
