// Configuration loading (TOML)

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::catalog::{StationCatalog, StationInfo, default_stations};
use crate::data::sources::SourceKind;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Directory holding the four source files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default)]
    pub files: SourceFiles,

    /// Station order, labels, colours and region groups.
    #[serde(default = "default_stations")]
    pub stations: Vec<StationInfo>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            files: SourceFiles::default(),
            stations: default_stations(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("assets")
}

/// File names of the sources, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFiles {
    #[serde(default = "default_events")]
    pub events: String,
    #[serde(default = "default_station_coords")]
    pub station_coords: String,
    #[serde(default = "default_survey")]
    pub survey: String,
    #[serde(default = "default_happiness")]
    pub happiness: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            events: default_events(),
            station_coords: default_station_coords(),
            survey: default_survey(),
            happiness: default_happiness(),
        }
    }
}

impl SourceFiles {
    pub fn file_for(&self, kind: SourceKind) -> &str {
        match kind {
            SourceKind::Events => &self.events,
            SourceKind::StationCoords => &self.station_coords,
            SourceKind::Survey => &self.survey,
            SourceKind::Happiness => &self.happiness,
        }
    }
}

fn default_events() -> String {
    "peakdatemodified_wl_local_event_stats.csv".into()
}

fn default_station_coords() -> String {
    "station_data.csv".into()
}

fn default_survey() -> String {
    "mxmh_survey_results.csv".into()
}

fn default_happiness() -> String {
    "WHD.csv".into()
}

impl DashboardConfig {
    /// Load config from file, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: DashboardConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Validate the station table into a catalog.
    pub fn catalog(&self) -> anyhow::Result<StationCatalog> {
        StationCatalog::new(self.stations.clone()).context("building station catalog")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_reasonable() {
        let c = DashboardConfig::default();
        assert_eq!(c.data_dir, PathBuf::from("assets"));
        assert_eq!(c.files.happiness, "WHD.csv");
        assert_eq!(c.stations.len(), 19);
        assert!(c.catalog().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let c: DashboardConfig = toml::from_str(
            r#"
            data_dir = "/srv/data"

            [files]
            survey = "survey.parquet"
            "#,
        )
        .unwrap();
        assert_eq!(c.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(c.files.survey, "survey.parquet");
        assert_eq!(c.files.events, "peakdatemodified_wl_local_event_stats.csv");
        assert_eq!(c.stations.len(), 19);
    }

    #[test]
    fn test_custom_station_table() {
        let c: DashboardConfig = toml::from_str(
            r##"
            [[stations]]
            name = "Tadoussac"
            label = "tad"
            color = "#123456"
            region = 4

            [[stations]]
            name = "Baie-Comeau"
            label = "bco"
            color = "#654321"
            region = 4
            "##,
        )
        .unwrap();
        let catalog = c.catalog().unwrap();
        assert_eq!(catalog.rank("Baie-Comeau").unwrap(), 2);
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = DashboardConfig::load_from(Path::new("/nonexistent/estuary.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
