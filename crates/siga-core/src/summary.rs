//! Views over normalized records for the map, chart and table consumers.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::record::NormalizedRecord;

/// A facility that can be placed on a map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub generation_type_label: String,
    pub power_kw: f64,
}

/// Summed canonical power for one group key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerTotal {
    pub key: String,
    pub facilities: usize,
    pub power_kw: f64,
}

/// Records with both coordinates present; everything else is left off the map.
pub fn map_points<'a, I>(records: I) -> Vec<MapPoint>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    records
        .into_iter()
        .filter_map(|record| {
            let (latitude, longitude) = record.coordinates()?;
            Some(MapPoint {
                name: record.name.clone(),
                latitude,
                longitude,
                generation_type_label: record.generation_type_label.clone(),
                power_kw: record.power_kw(),
            })
        })
        .collect()
}

pub fn power_by_state<'a, I>(records: I) -> Vec<PowerTotal>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    power_by(records, |r| r.state_code.as_str())
}

pub fn power_by_label<'a, I>(records: I) -> Vec<PowerTotal>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    power_by(records, |r| r.generation_type_label.as_str())
}

/// Group, sum `power_kw()`, and sort by total descending (ties by key).
pub fn power_by<'a, I, F>(records: I, key: F) -> Vec<PowerTotal>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
    F: Fn(&'a NormalizedRecord) -> &'a str,
{
    let mut groups: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(key(record)).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.power_kw();
    }

    let mut totals: Vec<PowerTotal> = groups
        .into_iter()
        .map(|(key, (facilities, power_kw))| PowerTotal {
            key: key.to_string(),
            facilities,
            power_kw,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.power_kw
            .total_cmp(&a.power_kw)
            .then_with(|| a.key.cmp(&b.key))
    });
    totals
}

/// Keep records whose generation-type code is in `codes`; an empty set keeps all.
pub fn filter_by_codes<'a, I>(records: I, codes: &[String]) -> Vec<&'a NormalizedRecord>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    let wanted: BTreeSet<&str> = codes.iter().map(|c| c.trim()).collect();
    records
        .into_iter()
        .filter(|r| wanted.is_empty() || wanted.contains(r.generation_type_code.as_str()))
        .collect()
}

pub fn distinct_codes<'a, I>(records: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a NormalizedRecord>,
{
    records
        .into_iter()
        .map(|r| r.generation_type_code.as_str())
        .filter(|c| !c.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
