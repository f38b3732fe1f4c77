//! Fixed station lookups: ordering, short label, plot colour and region
//! group along the river domain.
//!
//! The catalog is built once (from defaults or the config file) and passed
//! by reference into transforms and chart builders.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color;
use crate::error::TransformError;

/// One monitoring station of the river / estuary domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    /// Name as it appears in the `station_name` column.
    pub name: String,
    /// Short label as it appears in the `stn_lab` column.
    pub label: String,
    /// Plot colour, `#rrggbb`.
    pub color: String,
    /// Region group, 1 (upstream) to 4 (estuary).
    pub region: u8,
}

/// Number of region groups the domain is divided into.
pub const REGION_COUNT: u8 = 4;

/// Ordered, validated station lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct StationCatalog {
    stations: Vec<StationInfo>,
    by_name: HashMap<String, usize>,
    by_label: HashMap<String, usize>,
}

impl StationCatalog {
    /// Build a catalog. Order defines rank. Names and labels must be
    /// unique, colours parseable and regions within 1..=4.
    pub fn new(stations: Vec<StationInfo>) -> Result<Self, TransformError> {
        if stations.is_empty() {
            return Err(TransformError::InvalidCatalog("no stations".into()));
        }
        let mut by_name = HashMap::new();
        let mut by_label = HashMap::new();
        for (i, st) in stations.iter().enumerate() {
            if by_name.insert(st.name.clone(), i).is_some() {
                return Err(TransformError::InvalidCatalog(format!(
                    "duplicate station name '{}'",
                    st.name
                )));
            }
            if by_label.insert(st.label.clone(), i).is_some() {
                return Err(TransformError::InvalidCatalog(format!(
                    "duplicate station label '{}'",
                    st.label
                )));
            }
            if color::parse_hex(&st.color).is_none() {
                return Err(TransformError::InvalidCatalog(format!(
                    "station '{}' has invalid colour '{}'",
                    st.name, st.color
                )));
            }
            if !(1..=REGION_COUNT).contains(&st.region) {
                return Err(TransformError::InvalidCatalog(format!(
                    "station '{}' has region {} outside 1..={REGION_COUNT}",
                    st.name, st.region
                )));
            }
        }
        Ok(StationCatalog {
            stations,
            by_name,
            by_label,
        })
    }

    /// The 19 St. Lawrence stations, upstream (Pointe-Claire) to the Gulf
    /// (Sept-Îles).
    pub fn st_lawrence() -> Self {
        let stations = default_stations();
        // The default table is static data; a failure here is a programming error.
        match Self::new(stations) {
            Ok(catalog) => catalog,
            Err(e) => unreachable!("built-in station catalog is invalid: {e}"),
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[StationInfo] {
        &self.stations
    }

    /// Station at a 0-based position in the fixed order.
    pub fn get(&self, index: usize) -> Option<&StationInfo> {
        self.stations.get(index)
    }

    pub fn by_name(&self, name: &str) -> Result<&StationInfo, TransformError> {
        self.by_name
            .get(name)
            .map(|&i| &self.stations[i])
            .ok_or_else(|| TransformError::UnknownStation(name.to_string()))
    }

    pub fn by_label(&self, label: &str) -> Result<&StationInfo, TransformError> {
        self.by_label
            .get(label)
            .map(|&i| &self.stations[i])
            .ok_or_else(|| TransformError::UnknownLabel(label.to_string()))
    }

    /// 1-based position of the station in the fixed order.
    pub fn rank(&self, name: &str) -> Result<u32, TransformError> {
        self.by_name
            .get(name)
            .map(|&i| i as u32 + 1)
            .ok_or_else(|| TransformError::UnknownStation(name.to_string()))
    }

    pub fn color(&self, name: &str) -> Result<&str, TransformError> {
        self.by_name(name).map(|s| s.color.as_str())
    }

    pub fn region_of_label(&self, label: &str) -> Result<u8, TransformError> {
        self.by_label(label).map(|s| s.region)
    }

    /// Labels in station order, used as heatmap category order.
    pub fn labels(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.label.clone()).collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.stations.iter().map(|s| s.name.clone()).collect()
    }
}

pub fn default_stations() -> Vec<StationInfo> {
    const TABLE: &[(&str, &str, &str, u8)] = &[
        ("PointeClaire", "ptc", "#ff6347", 1),
        ("MontrealJetee1", "mtr", "#dc143c", 1),
        ("Varennes", "var", "#add8e6", 2),
        ("Contrecoeur-IOC", "con", "#87ceeb", 2),
        ("Sorel", "sor", "#6495ed", 2),
        ("LacSaintPierre", "lsp", "#4169e1", 2),
        ("Port-Saint-Francois", "psf", "#0000ff", 2),
        ("TroisRivieres", "trr", "#00008b", 2),
        ("Becancour", "bec", "#90ee90", 3),
        ("Batiscan", "bat", "#7cfc00", 3),
        ("Deschaillons-sur-Saint-Laurent", "des", "#32cd32", 3),
        ("Portneuf", "por", "#228b22", 3),
        ("Neuville", "neu", "#008000", 3),
        ("Vieux-Quebec", "vqc", "#006400", 3),
        ("Lauzon", "lau", "#d2b48c", 4),
        ("Saint-Laurent-IO", "slio", "#bc8f8f", 4),
        ("Saint-Joseph-de-la-Rive", "sjr", "#8b4513", 4),
        ("Rimouski", "rim", "#a0522d", 4),
        ("Sept-Iles", "sep", "#8b0000", 4),
    ];
    TABLE
        .iter()
        .map(|&(name, label, color, region)| StationInfo {
            name: name.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            region,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_is_bijection_onto_one_to_n() {
        let catalog = StationCatalog::st_lawrence();
        let mut ranks: Vec<u32> = catalog
            .names()
            .iter()
            .map(|n| catalog.rank(n).unwrap())
            .collect();
        ranks.sort_unstable();
        let expected: Vec<u32> = (1..=catalog.len() as u32).collect();
        assert_eq!(ranks, expected);
        assert_eq!(catalog.rank("PointeClaire").unwrap(), 1);
        assert_eq!(catalog.rank("Sept-Iles").unwrap(), 19);
    }

    #[test]
    fn test_unknown_station_fails() {
        let catalog = StationCatalog::st_lawrence();
        assert_eq!(
            catalog.rank("Tadoussac"),
            Err(TransformError::UnknownStation("Tadoussac".into()))
        );
        assert_eq!(
            catalog.region_of_label("tad"),
            Err(TransformError::UnknownLabel("tad".into()))
        );
    }

    #[test]
    fn test_region_groups() {
        let catalog = StationCatalog::st_lawrence();
        assert_eq!(catalog.region_of_label("mtr").unwrap(), 1);
        assert_eq!(catalog.region_of_label("trr").unwrap(), 2);
        assert_eq!(catalog.region_of_label("vqc").unwrap(), 3);
        assert_eq!(catalog.region_of_label("slio").unwrap(), 4);
    }

    #[test]
    fn test_rejects_duplicate_label() {
        let mut stations = default_stations();
        stations[1].label = "ptc".into();
        assert!(matches!(
            StationCatalog::new(stations),
            Err(TransformError::InvalidCatalog(_))
        ));
    }

    #[test]
    fn test_rejects_bad_colour_and_region() {
        let mut stations = default_stations();
        stations[0].color = "tomato".into();
        assert!(StationCatalog::new(stations).is_err());

        let mut stations = default_stations();
        stations[0].region = 5;
        assert!(StationCatalog::new(stations).is_err());
    }
}
