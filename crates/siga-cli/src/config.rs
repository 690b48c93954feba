//! Configuration for the `siga` binary.
//! Looked up at `--config <path>` or `<config dir>/siga/siga.toml`.
//!
//! ```toml
//! [source]
//! delimiter = ";"
//! encoding = "latin1"
//!
//! [columns]
//! generation_type = "SigTipoGeracao"
//! required = ["generation_type", "state_code"]
//!
//! [codes]
//! fallback = "sentinel"
//! [codes.labels]
//! BIO = "Biomassa"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use siga_core::{ColumnMap, Normalizer, SigaError};
use siga_io::{CodeTableConfig, CsvSourceOptions, SourceEncoding};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SigaConfig {
    /// How the source file is decoded and split
    #[serde(default)]
    pub source: SourceConfig,
    /// Source column names
    #[serde(default)]
    pub columns: ColumnMap,
    /// Generation-type code table overrides
    #[serde(default)]
    pub codes: CodeTableConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub encoding: SourceEncoding,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            encoding: SourceEncoding::default(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl SigaConfig {
    /// CSV reader options, with an optional `--encoding` override.
    pub fn source_options(&self, encoding: Option<&str>) -> Result<CsvSourceOptions> {
        if !self.source.delimiter.is_ascii() {
            return Err(SigaError::Config(format!(
                "source.delimiter must be a single ASCII character, got '{}'",
                self.source.delimiter
            ))
            .into());
        }
        let encoding = match encoding {
            Some(name) => name.parse()?,
            None => self.source.encoding,
        };
        Ok(CsvSourceOptions {
            delimiter: self.source.delimiter as u8,
            encoding,
        })
    }

    pub fn normalizer(&self) -> Normalizer {
        Normalizer::new(self.columns.clone(), self.codes.clone().into_table())
    }

    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .parse()
            .with_context(|| format!("invalid logging.level '{}'", self.logging.level))
    }
}

/// Default location: `<config dir>/siga/siga.toml`
pub fn siga_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("siga").join("siga.toml"))
}

/// Load configuration from `explicit`, else from the default location.
///
/// An explicit path must exist; a missing default file yields defaults.
pub fn load_siga_config(explicit: Option<&Path>) -> Result<SigaConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match siga_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SigaConfig::default()),
        },
    };

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("reading config file '{}'", path.display()))?;
    let config: SigaConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config file '{}'", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use siga_core::LabelFallback;

    #[test]
    fn test_defaults() {
        let config = SigaConfig::default();
        let options = config.source_options(None).unwrap();
        assert_eq!(options.delimiter, b';');
        assert_eq!(options.encoding, SourceEncoding::Latin1);
        assert_eq!(config.log_level().unwrap(), tracing::Level::INFO);
        assert_eq!(config.columns.generation_type, "SigTipoGeracao");
    }

    #[test]
    fn test_parse_full_config() {
        let config: SigaConfig = toml::from_str(
            r#"
            [source]
            delimiter = ","
            encoding = "utf8"

            [columns]
            generation_type = "TipoGeracao"
            required = ["generation_type", "state_code"]

            [codes]
            fallback = "sentinel"
            sentinel = "Other"
            [codes.labels]
            BIO = "Biomassa"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        let options = config.source_options(None).unwrap();
        assert_eq!(options.delimiter, b',');
        assert_eq!(options.encoding, SourceEncoding::Utf8);
        assert_eq!(
            config.columns.required_columns().unwrap(),
            vec!["TipoGeracao", "SigUFPrincipal"]
        );
        // unspecified column names keep their defaults
        assert_eq!(config.columns.latitude, "NumCoordNEmpreendimento");
        assert_eq!(config.codes.fallback, Some(LabelFallback::Sentinel));
        assert_eq!(config.log_level().unwrap(), tracing::Level::DEBUG);

        let normalizer = config.normalizer();
        assert_eq!(normalizer.table().label_for("BIO"), "Biomassa");
        assert_eq!(normalizer.table().label_for("XYZ"), "Other");
    }

    #[test]
    fn test_encoding_override() {
        let config = SigaConfig::default();
        let options = config.source_options(Some("utf-8")).unwrap();
        assert_eq!(options.encoding, SourceEncoding::Utf8);
        assert!(config.source_options(Some("klingon")).is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let mut config = SigaConfig::default();
        config.source.delimiter = '§';
        let err = config.source_options(None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SigaError>(),
            Some(SigaError::Config(_))
        ));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_siga_config(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("siga.toml");
        std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();
        let config = load_siga_config(Some(&path)).unwrap();
        assert_eq!(config.log_level().unwrap(), tracing::Level::WARN);
    }
}
