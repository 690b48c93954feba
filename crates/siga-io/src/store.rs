//! Arrow IPC table store with full-replace semantics.
//!
//! A store is a directory holding one table file (`usinas.arrow`) and a
//! `manifest.json` describing it. Every import replaces both wholesale:
//! there is no upsert and no deduplication by any natural key. Both files are
//! written to temporary names and renamed into place, table first. Each rename
//! is atomic but the pair is not: an import interrupted between the two
//! renames leaves the new table next to the previous manifest. The manifest
//! checksum catches that state ([`TableStore::verify`] fails), and the next
//! successful import repairs it.

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, Utc};
use polars::prelude::{
    DataFrame, IpcReader, IpcWriter, NamedFrom, PolarsResult, SerReader, SerWriter, Series,
};
use serde::{Deserialize, Serialize};
use siga_core::NormalizedRecord;
use tracing::{debug, info};

pub const TABLE_FILE: &str = "usinas.arrow";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Current store layout version (semver)
pub const STORE_SCHEMA_VERSION: &str = "1.0.0";

/// Provenance of an import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    /// Source file name (e.g., "siga-empreendimentos-geracao.csv")
    pub file: String,
    /// Encoding the source was decoded with
    pub encoding: String,
    /// SHA256 hash of the source file
    pub file_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreManifest {
    pub schema_version: String,
    pub imported_at: DateTime<Utc>,
    pub siga_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<SourceInfo>,
    pub row_count: u64,
    /// Fields that fell back to a default during normalization
    pub defaulted_fields: u64,
    /// SHA256 of the table file
    pub sha256: String,
}

/// Columnar view of a normalized batch.
pub fn records_to_dataframe(records: &[NormalizedRecord]) -> PolarsResult<DataFrame> {
    let names: Vec<String> = records.iter().map(|r| r.name.clone()).collect();
    let states: Vec<String> = records.iter().map(|r| r.state_code.clone()).collect();
    let codes: Vec<String> = records
        .iter()
        .map(|r| r.generation_type_code.clone())
        .collect();
    let labels: Vec<String> = records
        .iter()
        .map(|r| r.generation_type_label.clone())
        .collect();
    let power: Vec<f64> = records.iter().map(|r| r.power_kw()).collect();
    let granted: Vec<f64> = records.iter().map(|r| r.granted_power_kw).collect();
    let inspected: Vec<f64> = records.iter().map(|r| r.inspected_power_kw).collect();
    let guaranteed: Vec<f64> = records.iter().map(|r| r.guaranteed_power_kw).collect();
    let qualified: Vec<bool> = records.iter().map(|r| r.is_qualified_generation).collect();
    let latitudes: Vec<Option<f64>> = records.iter().map(|r| r.latitude).collect();
    let longitudes: Vec<Option<f64>> = records.iter().map(|r| r.longitude).collect();
    let municipalities: Vec<Option<String>> =
        records.iter().map(|r| r.municipality.clone()).collect();

    DataFrame::new(vec![
        Series::new("name", names),
        Series::new("state_code", states),
        Series::new("generation_type_code", codes),
        Series::new("generation_type_label", labels),
        Series::new("power_kw", power),
        Series::new("granted_power_kw", granted),
        Series::new("inspected_power_kw", inspected),
        Series::new("guaranteed_power_kw", guaranteed),
        Series::new("is_qualified_generation", qualified),
        Series::new("latitude", latitudes),
        Series::new("longitude", longitudes),
        Series::new("municipality", municipalities),
    ])
}

/// Directory-backed store for the latest import.
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn table_path(&self) -> PathBuf {
        self.dir.join(TABLE_FILE)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.dir.join(MANIFEST_FILE)
    }

    /// Replace the stored table with `records`.
    pub fn replace(
        &self,
        records: &[NormalizedRecord],
        source: Option<SourceInfo>,
        defaulted_fields: usize,
    ) -> Result<StoreManifest> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating store directory {}", self.dir.display()))?;

        let mut df =
            records_to_dataframe(records).context("building DataFrame for normalized records")?;

        let table_path = self.table_path();
        let tmp_table = table_path.with_extension("arrow.tmp");
        {
            let mut file = File::create(&tmp_table)
                .with_context(|| format!("creating table file {}", tmp_table.display()))?;
            IpcWriter::new(&mut file)
                .finish(&mut df)
                .context("writing Arrow table")?;
        }
        let sha256 = compute_sha256(&tmp_table)?;

        let manifest = StoreManifest {
            schema_version: STORE_SCHEMA_VERSION.to_string(),
            imported_at: Utc::now(),
            siga_version: env!("CARGO_PKG_VERSION").to_string(),
            source,
            row_count: df.height() as u64,
            defaulted_fields: defaulted_fields as u64,
            sha256,
        };
        let manifest_path = self.manifest_path();
        let tmp_manifest = manifest_path.with_extension("json.tmp");
        fs::write(&tmp_manifest, serde_json::to_string_pretty(&manifest)?)
            .with_context(|| format!("writing manifest {}", tmp_manifest.display()))?;

        fs::rename(&tmp_table, &table_path)
            .with_context(|| format!("replacing table {}", table_path.display()))?;
        fs::rename(&tmp_manifest, &manifest_path)
            .with_context(|| format!("replacing manifest {}", manifest_path.display()))?;

        info!(
            store = %self.dir.display(),
            rows = manifest.row_count,
            "replaced stored table"
        );
        Ok(manifest)
    }

    pub fn manifest(&self) -> Result<StoreManifest> {
        let path = self.manifest_path();
        let contents = fs::read_to_string(&path).with_context(|| {
            format!(
                "reading manifest {}; has the store been imported?",
                path.display()
            )
        })?;
        serde_json::from_str(&contents).context("parsing store manifest")
    }

    pub fn load(&self) -> Result<DataFrame> {
        let path = self.table_path();
        let file = File::open(&path)
            .with_context(|| format!("opening stored table {}", path.display()))?;
        IpcReader::new(file)
            .finish()
            .context("reading Arrow IPC table")
    }

    pub fn row_count(&self) -> Result<usize> {
        Ok(self.load()?.height())
    }

    /// Check the table file against the manifest checksum.
    pub fn verify(&self) -> Result<()> {
        let manifest = self.manifest()?;
        let actual = compute_sha256(&self.table_path())?;
        if actual != manifest.sha256 {
            bail!(
                "checksum mismatch for {}: expected {}, got {}",
                TABLE_FILE,
                manifest.sha256,
                actual
            );
        }
        debug!(sha256 = %actual, "store checksum verified");
        Ok(())
    }
}

/// Compute SHA256 hash of a file
pub fn compute_sha256(path: &Path) -> Result<String> {
    use sha2::{Digest, Sha256};

    let mut file = File::open(path)
        .map_err(|e| anyhow!("Failed to open file for hashing {}: {}", path.display(), e))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let n = file
            .read(&mut buffer)
            .map_err(|e| anyhow!("Failed to read file for hashing {}: {}", path.display(), e))?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use siga_core::{normalize, GenerationTypeTable, RawRecord};
    use tempfile::tempdir;

    fn records(n: usize) -> Vec<NormalizedRecord> {
        let table = GenerationTypeTable::aneel();
        (0..n)
            .map(|i| {
                let raw = RawRecord::from_pairs([
                    ("NomEmpreendimento", Some(format!("Usina {i}"))),
                    ("SigTipoGeracao", Some("UFV".to_string())),
                    ("MdaPotenciaFiscalizadaKw", Some(format!("{i},25"))),
                    (
                        "NumCoordNEmpreendimento",
                        (i % 2 == 0).then(|| "-15,8".to_string()),
                    ),
                ]);
                normalize(&raw, &table)
            })
            .collect()
    }

    #[test]
    fn test_dataframe_shape() {
        let df = records_to_dataframe(&records(3)).unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 12);
        assert_eq!(df.column("latitude").unwrap().null_count(), 1);
        assert_eq!(df.column("longitude").unwrap().null_count(), 3);
    }

    #[test]
    fn test_replace_and_read_back() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path().join("store"));

        let manifest = store.replace(&records(4), None, 2).unwrap();
        assert_eq!(manifest.row_count, 4);
        assert_eq!(manifest.defaulted_fields, 2);
        assert_eq!(store.row_count().unwrap(), 4);
        store.verify().unwrap();

        let reloaded = store.manifest().unwrap();
        assert_eq!(reloaded.sha256, manifest.sha256);
    }

    #[test]
    fn test_replace_is_full_overwrite() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path());

        store.replace(&records(10), None, 0).unwrap();
        // importing the same rows again must not accumulate them
        store.replace(&records(10), None, 0).unwrap();
        assert_eq!(store.row_count().unwrap(), 10);

        store.replace(&records(2), None, 0).unwrap();
        assert_eq!(store.row_count().unwrap(), 2);
        assert!(!dir.path().join("usinas.arrow.tmp").exists());
    }

    #[test]
    fn test_verify_detects_tampering() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path());
        store.replace(&records(1), None, 0).unwrap();
        fs::write(store.table_path(), b"not arrow").unwrap();
        assert!(store.verify().is_err());
    }

    #[test]
    fn test_interrupted_replace_is_detected_and_repaired() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path());
        store.replace(&records(3), None, 0).unwrap();

        // new table renamed into place, manifest still from the previous import
        let mut df = records_to_dataframe(&records(5)).unwrap();
        let mut file = File::create(store.table_path()).unwrap();
        IpcWriter::new(&mut file).finish(&mut df).unwrap();
        drop(file);

        let err = store.verify().unwrap_err();
        assert!(err.to_string().contains("checksum mismatch"));
        assert_eq!(store.manifest().unwrap().row_count, 3);

        store.replace(&records(5), None, 0).unwrap();
        store.verify().unwrap();
        assert_eq!(store.row_count().unwrap(), 5);
    }

    #[test]
    fn test_manifest_missing_store() {
        let dir = tempdir().unwrap();
        let store = TableStore::open(dir.path().join("empty"));
        assert!(store.manifest().is_err());
    }
}
