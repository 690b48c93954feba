//! Generation-type code table.
//!
//! Maps ANEEL's short generation-type codes (`UHE`, `EOL`, `UFV`, ...) to
//! display labels, and labels to display colors. The table is plain immutable
//! configuration handed to the normalizer; nothing here is process-global.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Label used when a code cannot be resolved and no better text exists.
pub const DEFAULT_SENTINEL: &str = "Outros";

/// What to do with a code that is not in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFallback {
    /// Use the code itself as the label (`"XYZ"` -> `"XYZ"`)
    #[default]
    EchoCode,
    /// Use the table's sentinel label (`"XYZ"` -> `"Outros"`)
    Sentinel,
}

/// Code -> label lookup with a single, explicit fallback policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationTypeTable {
    pub labels: BTreeMap<String, String>,
    /// Display colors keyed by label
    pub colors: BTreeMap<String, String>,
    pub fallback: LabelFallback,
    pub sentinel: String,
}

const ANEEL_TYPES: &[(&str, &str, &str)] = &[
    ("CGH", "Central Geradora Hidrelétrica", "#74add1"),
    ("CGU", "Central Geradora Undi-Elétrica", "#313695"),
    ("EOL", "Central Geradora Eólica", "#66bd63"),
    ("PCH", "Pequena Central Hidrelétrica", "#4575b4"),
    ("UFV", "Central Geradora Solar Fotovoltaica", "#fdae61"),
    ("UHE", "Usina Hidrelétrica", "#2166ac"),
    ("UTE", "Usina Termelétrica", "#d73027"),
    ("UTN", "Usina Termonuclear", "#8073ac"),
];

impl GenerationTypeTable {
    /// Empty table; every lookup goes through the fallback policy.
    pub fn empty() -> Self {
        Self {
            labels: BTreeMap::new(),
            colors: BTreeMap::new(),
            fallback: LabelFallback::default(),
            sentinel: DEFAULT_SENTINEL.to_string(),
        }
    }

    /// The generation types published in the SIGA registry.
    pub fn aneel() -> Self {
        let mut table = Self::empty();
        for (code, label, color) in ANEEL_TYPES {
            table.labels.insert(code.to_string(), label.to_string());
            table.colors.insert(label.to_string(), color.to_string());
        }
        table.colors.insert(DEFAULT_SENTINEL.to_string(), "#999999".to_string());
        table
    }

    pub fn with_label(mut self, code: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(code.into(), label.into());
        self
    }

    pub fn with_color(mut self, label: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(label.into(), color.into());
        self
    }

    pub fn with_fallback(mut self, fallback: LabelFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_sentinel(mut self, sentinel: impl Into<String>) -> Self {
        self.sentinel = sentinel.into();
        self
    }

    pub fn contains(&self, code: &str) -> bool {
        self.labels.contains_key(code.trim())
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.labels.keys().map(String::as_str)
    }

    /// Resolve a code to its label.
    ///
    /// Never returns an empty label: a blank code resolves to the sentinel
    /// regardless of the fallback policy.
    pub fn label_for(&self, code: &str) -> String {
        let code = code.trim();
        if code.is_empty() {
            return self.sentinel_label().to_string();
        }
        match self.labels.get(code) {
            Some(label) => label.clone(),
            None => match self.fallback {
                LabelFallback::EchoCode => code.to_string(),
                LabelFallback::Sentinel => self.sentinel_label().to_string(),
            },
        }
    }

    pub fn color_for(&self, label: &str) -> Option<&str> {
        self.colors.get(label).map(String::as_str)
    }

    /// Merge `other` on top of this table; entries in `other` win.
    pub fn merge(&mut self, other: GenerationTypeTable) {
        self.labels.extend(other.labels);
        self.colors.extend(other.colors);
        self.fallback = other.fallback;
        self.sentinel = other.sentinel;
    }

    /// The label unknown codes resolve to under [`LabelFallback::Sentinel`].
    pub fn sentinel_label(&self) -> &str {
        if self.sentinel.trim().is_empty() {
            DEFAULT_SENTINEL
        } else {
            &self.sentinel
        }
    }
}

impl Default for GenerationTypeTable {
    fn default() -> Self {
        Self::aneel()
    }
}
