use std::path::Path;

use anyhow::Result;
use siga_cli::SigaConfig;
use siga_io::{compute_sha256, SourceInfo, TableStore};

use crate::commands::util::load_batch;

pub fn handle(
    config: &SigaConfig,
    input: &Path,
    store_dir: &Path,
    encoding: Option<&str>,
) -> Result<()> {
    let batch = load_batch(input, config, encoding, true)?;
    let defaulted = batch
        .diagnostics
        .as_ref()
        .map_or(0, |d| d.stats.defaulted_fields());

    let source = SourceInfo {
        file: input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        encoding: config.source_options(encoding)?.encoding.to_string(),
        file_hash: compute_sha256(input)?,
    };

    let store = TableStore::open(store_dir);
    let manifest = store.replace(&batch.records, Some(source), defaulted)?;

    println!(
        "Imported {} facilities into {} ({} defaulted fields)",
        manifest.row_count,
        store.dir().display(),
        manifest.defaulted_fields
    );
    Ok(())
}
