//! The record normalizer.
//!
//! Turns raw SIGA rows (all text) into [`NormalizedRecord`]s. Each row is
//! handled independently and the per-row transformation cannot fail; the only
//! fatal condition is a structurally required column missing from the batch
//! header, which is checked before any row is touched.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::codes::GenerationTypeTable;
use crate::diagnostics::{IssueKind, NormalizeDiagnostics};
use crate::error::{SigaError, SigaResult};
use crate::parse::{
    clean_text, first_municipality, parse_coordinate, parse_flag, parse_locale_float,
    truncate_name, MAX_NAME_CHARS,
};
use crate::record::{NormalizedRecord, RawRecord};

static DEFAULT_COLUMNS: Lazy<ColumnMap> = Lazy::new(ColumnMap::default);

/// Source column names for each normalized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub name: String,
    pub state_code: String,
    pub generation_type: String,
    pub granted_power: String,
    pub inspected_power: String,
    pub guaranteed_power: String,
    pub qualified_generation: String,
    pub latitude: String,
    pub longitude: String,
    pub municipality: String,
    /// Fields (by name, e.g. `"generation_type"`) whose source column must be
    /// present in the header; resolved through this map at check time
    pub required: Vec<String>,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            name: "NomEmpreendimento".to_string(),
            state_code: "SigUFPrincipal".to_string(),
            generation_type: "SigTipoGeracao".to_string(),
            granted_power: "MdaPotenciaOutorgadaKw".to_string(),
            inspected_power: "MdaPotenciaFiscalizadaKw".to_string(),
            guaranteed_power: "MdaGarantiaFisicaKw".to_string(),
            qualified_generation: "IdcGeracaoQualificada".to_string(),
            latitude: "NumCoordNEmpreendimento".to_string(),
            longitude: "NumCoordEEmpreendimento".to_string(),
            municipality: "DscMuniBanhado".to_string(),
            required: vec!["generation_type".to_string()],
        }
    }
}

impl ColumnMap {
    /// Source column configured for a field, by field name.
    pub fn column_for(&self, field: &str) -> Option<&str> {
        let column = match field.trim() {
            "name" => &self.name,
            "state_code" => &self.state_code,
            "generation_type" => &self.generation_type,
            "granted_power" => &self.granted_power,
            "inspected_power" => &self.inspected_power,
            "guaranteed_power" => &self.guaranteed_power,
            "qualified_generation" => &self.qualified_generation,
            "latitude" => &self.latitude,
            "longitude" => &self.longitude,
            "municipality" => &self.municipality,
            _ => return None,
        };
        Some(column.as_str())
    }

    /// Source columns for every entry of `required`.
    pub fn required_columns(&self) -> SigaResult<Vec<&str>> {
        self.required
            .iter()
            .map(|field| {
                self.column_for(field).ok_or_else(|| {
                    SigaError::Config(format!("unknown field '{field}' in columns.required"))
                })
            })
            .collect()
    }
}

/// A normalized batch plus the fallback counts gathered along the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<NormalizedRecord>,
    pub diagnostics: NormalizeDiagnostics,
}

/// Column map and code table bundled for repeated use.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    columns: ColumnMap,
    table: GenerationTypeTable,
}

impl Normalizer {
    pub fn new(columns: ColumnMap, table: GenerationTypeTable) -> Self {
        Self { columns, table }
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn table(&self) -> &GenerationTypeTable {
        &self.table
    }

    /// Fail with [`SigaError::MissingColumn`] if the source column of a
    /// required field is not in `header`.
    pub fn ensure_columns<I, S>(&self, header: I) -> SigaResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let required = self.columns.required_columns()?;
        let present: HashSet<String> = header
            .into_iter()
            .map(|c| c.as_ref().trim().to_string())
            .collect();
        match required.into_iter().find(|column| !present.contains(*column)) {
            Some(missing) => Err(SigaError::MissingColumn(missing.to_string())),
            None => Ok(()),
        }
    }

    pub fn normalize(&self, raw: &RawRecord) -> NormalizedRecord {
        normalize_with(raw, &self.columns, &self.table, |_, _, _| {})
    }

    /// Lazy, restartable, order-preserving normalization of a slice.
    pub fn normalize_batch<'a>(
        &'a self,
        raws: &'a [RawRecord],
    ) -> impl Iterator<Item = NormalizedRecord> + ExactSizeIterator + Clone + 'a {
        raws.iter().map(move |raw| self.normalize(raw))
    }

    /// Parallel normalization; output order matches input order.
    pub fn normalize_par(&self, raws: &[RawRecord]) -> Vec<NormalizedRecord> {
        raws.par_iter().map(|raw| self.normalize(raw)).collect()
    }

    /// Structural check, then materialized normalization with diagnostics.
    pub fn normalize_table<I, S>(
        &self,
        header: I,
        raws: &[RawRecord],
    ) -> SigaResult<NormalizedBatch>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ensure_columns(header)?;

        let mut diagnostics = NormalizeDiagnostics::new();
        let records = raws
            .iter()
            .enumerate()
            .map(|(row, raw)| {
                normalize_with(raw, &self.columns, &self.table, |kind, column, value| {
                    diagnostics.record(kind, row, column, value)
                })
            })
            .collect();
        diagnostics.stats.rows = raws.len();

        Ok(NormalizedBatch {
            records,
            diagnostics,
        })
    }
}

/// Normalize one record using the standard SIGA column names.
pub fn normalize(raw: &RawRecord, table: &GenerationTypeTable) -> NormalizedRecord {
    normalize_with(raw, &DEFAULT_COLUMNS, table, |_, _, _| {})
}

/// Element-wise [`normalize`] over a slice, lazily and in input order.
pub fn normalize_batch<'a>(
    raws: &'a [RawRecord],
    table: &'a GenerationTypeTable,
) -> impl Iterator<Item = NormalizedRecord> + ExactSizeIterator + Clone + 'a {
    raws.iter().map(move |raw| normalize(raw, table))
}

fn normalize_with<F>(
    raw: &RawRecord,
    columns: &ColumnMap,
    table: &GenerationTypeTable,
    mut note: F,
) -> NormalizedRecord
where
    F: FnMut(IssueKind, &str, Option<&str>),
{
    let (name, truncated) = truncate_name(raw.get(&columns.name), MAX_NAME_CHARS);
    if truncated {
        note(IssueKind::TruncatedName, &columns.name, None);
    }

    let code = clean_text(raw.get(&columns.generation_type));
    if code.is_empty() || !table.contains(&code) {
        note(
            IssueKind::UnknownCode,
            &columns.generation_type,
            raw.get(&columns.generation_type),
        );
    }

    let mut power = |column: &str| {
        let value = raw.get(column);
        parse_locale_float(value).unwrap_or_else(|| {
            note(IssueKind::DefaultedPower, column, value);
            0.0
        })
    };
    let granted_power_kw = power(&columns.granted_power);
    let inspected_power_kw = power(&columns.inspected_power);
    let guaranteed_power_kw = power(&columns.guaranteed_power);

    let mut coordinate = |column: &str| {
        let value = raw.get(column);
        let parsed = parse_coordinate(value);
        if parsed.is_none() {
            note(IssueKind::MissingCoordinate, column, value);
        }
        parsed
    };
    let latitude = coordinate(&columns.latitude);
    let longitude = coordinate(&columns.longitude);

    NormalizedRecord {
        name,
        state_code: clean_text(raw.get(&columns.state_code)),
        generation_type_label: table.label_for(&code),
        generation_type_code: code,
        granted_power_kw,
        inspected_power_kw,
        guaranteed_power_kw,
        is_qualified_generation: parse_flag(raw.get(&columns.qualified_generation)),
        latitude,
        longitude,
        municipality: first_municipality(raw.get(&columns.municipality)),
    }
}
