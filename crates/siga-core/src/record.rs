use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalizer::ColumnMap;

/// One source row: column name -> optional text, exactly as parsed.
///
/// A missing column and an explicitly absent value are indistinguishable to
/// readers; both come back as `None` from [`RawRecord::get`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Option<String>>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: impl Into<String>, value: Option<String>) {
        self.fields.insert(column.into(), value);
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).and_then(|v| v.as_deref())
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.fields.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A cleaned, typed generation facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub name: String,
    pub state_code: String,
    pub generation_type_code: String,
    pub generation_type_label: String,
    pub granted_power_kw: f64,
    pub inspected_power_kw: f64,
    pub guaranteed_power_kw: f64,
    pub is_qualified_generation: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub municipality: Option<String>,
}

impl NormalizedRecord {
    /// Canonical power figure used for display and aggregation.
    pub fn power_kw(&self) -> f64 {
        self.inspected_power_kw
    }

    /// Both coordinates, or nothing; a half-located facility cannot be mapped.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.latitude?, self.longitude?))
    }

    /// Text projection back into source columns.
    ///
    /// Numbers are written with `.` decimals, which the normalizer reads
    /// unchanged, so `normalize(record.to_raw(..)) == record`.
    pub fn to_raw(&self, columns: &ColumnMap) -> RawRecord {
        let mut raw = RawRecord::new();
        raw.insert(&columns.name, Some(self.name.clone()));
        raw.insert(&columns.state_code, Some(self.state_code.clone()));
        raw.insert(
            &columns.generation_type,
            Some(self.generation_type_code.clone()),
        );
        raw.insert(
            &columns.granted_power,
            Some(self.granted_power_kw.to_string()),
        );
        raw.insert(
            &columns.inspected_power,
            Some(self.inspected_power_kw.to_string()),
        );
        raw.insert(
            &columns.guaranteed_power,
            Some(self.guaranteed_power_kw.to_string()),
        );
        let flag = if self.is_qualified_generation {
            "Sim"
        } else {
            "Não"
        };
        raw.insert(&columns.qualified_generation, Some(flag.to_string()));
        raw.insert(&columns.latitude, self.latitude.map(|v| v.to_string()));
        raw.insert(&columns.longitude, self.longitude.map(|v| v.to_string()));
        raw.insert(&columns.municipality, self.municipality.clone());
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NormalizedRecord {
        NormalizedRecord {
            name: "UHE Itaipu".to_string(),
            state_code: "PR".to_string(),
            generation_type_code: "UHE".to_string(),
            generation_type_label: "Usina Hidrelétrica".to_string(),
            granted_power_kw: 14_000_000.0,
            inspected_power_kw: 14_000_000.0,
            guaranteed_power_kw: 8_612_000.0,
            is_qualified_generation: false,
            latitude: Some(-25.4078),
            longitude: Some(-54.5888),
            municipality: Some("Foz do Iguaçu - PR".to_string()),
        }
    }

    #[test]
    fn test_raw_get_treats_missing_and_absent_alike() {
        let raw = RawRecord::from_pairs([
            ("A", Some("1".to_string())),
            ("B", None),
        ]);
        assert_eq!(raw.get("A"), Some("1"));
        assert_eq!(raw.get("B"), None);
        assert_eq!(raw.get("C"), None);
        assert!(raw.has_column("B"));
        assert!(!raw.has_column("C"));
        assert_eq!(raw.len(), 2);
    }

    #[test]
    fn test_power_kw_is_inspected() {
        let mut record = sample();
        record.granted_power_kw = 1.0;
        record.inspected_power_kw = 2.0;
        assert_eq!(record.power_kw(), 2.0);
    }

    #[test]
    fn test_coordinates_need_both() {
        let mut record = sample();
        assert_eq!(record.coordinates(), Some((-25.4078, -54.5888)));
        record.longitude = None;
        assert_eq!(record.coordinates(), None);
    }

    #[test]
    fn test_to_raw_uses_source_columns() {
        let raw = sample().to_raw(&ColumnMap::default());
        assert_eq!(raw.get("NomEmpreendimento"), Some("UHE Itaipu"));
        assert_eq!(raw.get("SigTipoGeracao"), Some("UHE"));
        assert_eq!(raw.get("MdaGarantiaFisicaKw"), Some("8612000"));
        assert_eq!(raw.get("IdcGeracaoQualificada"), Some("Não"));
        assert_eq!(raw.get("NumCoordNEmpreendimento"), Some("-25.4078"));
    }

    #[test]
    fn test_serialize_absent_coordinates_as_null() {
        let mut record = sample();
        record.latitude = None;
        let json = serde_json::to_value(&record).unwrap();
        assert!(json["latitude"].is_null());
        assert_eq!(json["state_code"], "PR");
    }
}
