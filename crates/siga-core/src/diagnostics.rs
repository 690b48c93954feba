use serde::Serialize;

/// Severity level for normalization issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,    // Expected gap in the source (e.g., no coordinates published)
    Warning, // Value replaced by a default (e.g., unparseable power)
}

/// What kind of fallback was applied to a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    DefaultedPower,
    MissingCoordinate,
    UnknownCode,
    TruncatedName,
}

/// A single field that did not survive normalization untouched
#[derive(Debug, Clone, Serialize)]
pub struct NormalizeIssue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub row: usize,             // Zero-based position in the input batch
    pub column: String,         // Source column name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,  // Offending source text, if any
}

/// Counters for a whole batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub rows: usize,
    pub defaulted_power_fields: usize,
    pub missing_coordinates: usize,
    pub unknown_codes: usize,
    pub truncated_names: usize,
}

impl NormalizeStats {
    /// Total number of fields that fell back to a default value
    pub fn defaulted_fields(&self) -> usize {
        self.defaulted_power_fields
            + self.missing_coordinates
            + self.unknown_codes
            + self.truncated_names
    }
}

/// Diagnostics collected while normalizing a batch.
///
/// Purely observational: the records themselves are identical whether or not
/// diagnostics are collected.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NormalizeDiagnostics {
    pub stats: NormalizeStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<NormalizeIssue>,
}

impl NormalizeDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one defaulted field and bump the matching counter
    pub fn record(&mut self, kind: IssueKind, row: usize, column: &str, value: Option<&str>) {
        let severity = match kind {
            IssueKind::MissingCoordinate if value.is_none() => Severity::Info,
            _ => Severity::Warning,
        };
        match kind {
            IssueKind::DefaultedPower => self.stats.defaulted_power_fields += 1,
            IssueKind::MissingCoordinate => self.stats.missing_coordinates += 1,
            IssueKind::UnknownCode => self.stats.unknown_codes += 1,
            IssueKind::TruncatedName => self.stats.truncated_names += 1,
        }
        self.issues.push(NormalizeIssue {
            severity,
            kind,
            row,
            column: column.to_string(),
            value: value.map(str::to_string),
        });
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn count(&self, kind: IssueKind) -> usize {
        self.issues.iter().filter(|i| i.kind == kind).count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Merge another batch's diagnostics, shifting its row indices by `row_offset`
    pub fn merge(&mut self, other: NormalizeDiagnostics, row_offset: usize) {
        self.stats.rows += other.stats.rows;
        self.stats.defaulted_power_fields += other.stats.defaulted_power_fields;
        self.stats.missing_coordinates += other.stats.missing_coordinates;
        self.stats.unknown_codes += other.stats.unknown_codes;
        self.stats.truncated_names += other.stats.truncated_names;
        self.issues
            .extend(other.issues.into_iter().map(|mut issue| {
                issue.row += row_offset;
                issue
            }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_counts() {
        let mut diag = NormalizeDiagnostics::new();
        diag.record(IssueKind::DefaultedPower, 0, "MdaPotenciaFiscalizadaKw", Some("1.5,0"));
        diag.record(IssueKind::MissingCoordinate, 1, "NumCoordNEmpreendimento", None);
        diag.record(IssueKind::UnknownCode, 2, "SigTipoGeracao", Some("XYZ"));

        assert_eq!(diag.stats.defaulted_power_fields, 1);
        assert_eq!(diag.stats.missing_coordinates, 1);
        assert_eq!(diag.stats.unknown_codes, 1);
        assert_eq!(diag.stats.defaulted_fields(), 3);
        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.count(IssueKind::UnknownCode), 1);
        assert!(diag.has_issues());
    }

    #[test]
    fn test_malformed_coordinate_is_a_warning() {
        let mut diag = NormalizeDiagnostics::new();
        diag.record(IssueKind::MissingCoordinate, 0, "NumCoordEEmpreendimento", Some("abc"));
        assert_eq!(diag.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn test_merge_offsets_rows() {
        let mut first = NormalizeDiagnostics::new();
        first.stats.rows = 10;
        let mut second = NormalizeDiagnostics::new();
        second.stats.rows = 5;
        second.record(IssueKind::TruncatedName, 3, "NomEmpreendimento", None);

        first.merge(second, 10);
        assert_eq!(first.stats.rows, 15);
        assert_eq!(first.stats.truncated_names, 1);
        assert_eq!(first.issues[0].row, 13);
    }

    #[test]
    fn test_diagnostics_serialization() {
        let mut diag = NormalizeDiagnostics::new();
        diag.stats.rows = 3;
        diag.record(IssueKind::DefaultedPower, 1, "MdaPotenciaOutorgadaKw", Some("x"));

        let json = serde_json::to_string_pretty(&diag).unwrap();
        assert!(json.contains("\"rows\": 3"));
        assert!(json.contains("\"warning\""));
        assert!(json.contains("\"defaulted_power\""));
        assert!(json.contains("\"row\": 1"));
    }
}
