use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rayon::ThreadPoolBuilder;
use siga_core::{NormalizeDiagnostics, NormalizedRecord};
use siga_io::{read_raw_table, RawTable};
use siga_cli::SigaConfig;
use tracing::{debug, info, warn};

pub fn configure_threads(spec: &str) {
    let count = if spec.eq_ignore_ascii_case("auto") {
        num_cpus::get()
    } else {
        spec.parse().unwrap_or_else(|_| num_cpus::get())
    };
    let _ = ThreadPoolBuilder::new().num_threads(count).build_global();
}

/// Split a comma-separated code list ("UHE, EOL" -> ["UHE", "EOL"]).
pub fn parse_types(spec: Option<&str>) -> Vec<String> {
    spec.unwrap_or("")
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// A source file after the structural check and normalization.
pub struct LoadedBatch {
    pub raw: RawTable,
    pub records: Vec<NormalizedRecord>,
    pub diagnostics: Option<NormalizeDiagnostics>,
}

/// Read `input`, check required columns, normalize every row.
///
/// With `with_diagnostics` the rows are normalized sequentially and fallback
/// counts are collected; otherwise the work is spread over the rayon pool.
pub fn load_batch(
    input: &Path,
    config: &SigaConfig,
    encoding: Option<&str>,
    with_diagnostics: bool,
) -> Result<LoadedBatch> {
    let options = config.source_options(encoding)?;
    info!(input = %input.display(), encoding = %options.encoding, "reading SIGA export");
    let raw = read_raw_table(input, &options)?;

    let normalizer = config.normalizer();
    let (records, diagnostics) = if with_diagnostics {
        let batch = normalizer.normalize_table(&raw.header, &raw.rows)?;
        let stats = &batch.diagnostics.stats;
        if stats.defaulted_fields() > 0 {
            warn!(
                defaulted_power = stats.defaulted_power_fields,
                missing_coordinates = stats.missing_coordinates,
                unknown_codes = stats.unknown_codes,
                truncated_names = stats.truncated_names,
                "fields fell back to defaults"
            );
        }
        (batch.records, Some(batch.diagnostics))
    } else {
        normalizer.ensure_columns(&raw.header)?;
        (normalizer.normalize_par(&raw.rows), None)
    };

    debug!(rows = records.len(), "normalized batch");
    Ok(LoadedBatch {
        raw,
        records,
        diagnostics,
    })
}

/// File writer when `output` is set, stdout otherwise.
pub fn open_output(output: Option<&Path>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "creating parent directory '{}' for output file {}",
                        parent.display(),
                        path.display()
                    )
                })?;
            }
            let file = File::create(path)
                .with_context(|| format!("creating output file '{}'", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}
