//! Code table configuration loaded from TOML.
//!
//! ```toml
//! fallback = "sentinel"
//! sentinel = "Outros"
//!
//! [labels]
//! BIO = "Biomassa"
//!
//! [colors]
//! Biomassa = "#8c510a"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use siga_core::{GenerationTypeTable, LabelFallback};

/// Overrides applied on top of the ANEEL defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeTableConfig {
    /// Start from the built-in ANEEL table (`false` uses only `labels`)
    pub extend_defaults: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<LabelFallback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentinel: Option<String>,
    pub labels: BTreeMap<String, String>,
    pub colors: BTreeMap<String, String>,
}

impl Default for CodeTableConfig {
    fn default() -> Self {
        Self {
            extend_defaults: true,
            fallback: None,
            sentinel: None,
            labels: BTreeMap::new(),
            colors: BTreeMap::new(),
        }
    }
}

impl CodeTableConfig {
    pub fn into_table(self) -> GenerationTypeTable {
        let mut table = if self.extend_defaults {
            GenerationTypeTable::aneel()
        } else {
            GenerationTypeTable::empty()
        };
        let overrides = GenerationTypeTable {
            labels: self.labels,
            colors: self.colors,
            fallback: self.fallback.unwrap_or(table.fallback),
            sentinel: self.sentinel.unwrap_or_else(|| table.sentinel.clone()),
        };
        table.merge(overrides);
        table
    }
}

/// Load a code table from a standalone TOML file.
pub fn load_code_table(path: &Path) -> Result<GenerationTypeTable> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("reading code table '{}'", path.display()))?;
    let config: CodeTableConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing code table '{}'", path.display()))?;
    Ok(config.into_table())
}
