//! Dataset dispatch: one dataset id in, five panel results out.
//!
//! ```text
//!   DatasetId ──► recipe_for ──► Sources::get(source)
//!                                    │
//!                               pipeline::run(steps)
//!                                    │
//!                 ┌──────┬──────┬────┴─┬──────┬─────────┐
//!               histo  dense  main    pie  scatter     (ChartRecipe::build)
//! ```
//!
//! Shared steps run once per dataset. Each panel then runs its own steps on a
//! copy of the shared table, so a panel-only step that fails leaves the
//! other four panels intact. A failing shared step fails all five.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::catalog::StationCatalog;
use crate::chart::{ChartContext, ChartSpec};
use crate::data::model::Table;
use crate::data::sources::Sources;
use crate::error::ChartError;
use crate::recipes::recipe_for;
use crate::transform::pipeline::{self, PipelineContext};

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// The four canned datasets behind the top-bar buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
pub enum DatasetId {
    #[serde(rename = "coastal")]
    #[value(name = "coastal")]
    Coastal,
    #[serde(rename = "music")]
    #[value(name = "music")]
    Music,
    #[serde(rename = "happiness-2019")]
    #[value(name = "happiness-2019")]
    Happiness2019,
    #[serde(rename = "happiness-series")]
    #[value(name = "happiness-series")]
    HappinessSeries,
}

impl DatasetId {
    pub const ALL: [DatasetId; 4] = [
        DatasetId::Coastal,
        DatasetId::Music,
        DatasetId::Happiness2019,
        DatasetId::HappinessSeries,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            DatasetId::Coastal => "coastal",
            DatasetId::Music => "music",
            DatasetId::Happiness2019 => "happiness-2019",
            DatasetId::HappinessSeries => "happiness-series",
        }
    }

    /// Button label.
    pub fn label(self) -> &'static str {
        match self {
            DatasetId::Coastal => "Canada",
            DatasetId::Music => "DEMO - Music And Mental Health",
            DatasetId::Happiness2019 => "DEMO - World Happiness Data 2019",
            DatasetId::HappinessSeries => "DEMO - World Happiness Data 15-19",
        }
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// The five panel slots, in layout order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelId {
    Histo,
    Dense,
    Main,
    Pie,
    Scatter,
}

impl PanelId {
    pub const ALL: [PanelId; 5] = [
        PanelId::Histo,
        PanelId::Dense,
        PanelId::Main,
        PanelId::Pie,
        PanelId::Scatter,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PanelId::Histo => "histo",
            PanelId::Dense => "dense",
            PanelId::Main => "main",
            PanelId::Pie => "pie",
            PanelId::Scatter => "scatter",
        }
    }

    /// Panel heading shown above the chart.
    pub fn heading(self) -> &'static str {
        match self {
            PanelId::Histo => "Extreme Event Distribution by Season",
            PanelId::Dense => "Extreme Event Clusters by Max, Mean, and Duration",
            PanelId::Main => "Comprehensive Extreme Events and their Peakness, by Station and Domain",
            PanelId::Pie => "Geographical Representation",
            PanelId::Scatter => "Saturation of Extreme Event Peak by Station",
        }
    }

    /// Text of the panel's help overlay.
    pub fn help(self) -> &'static str {
        match self {
            PanelId::Histo => {
                "For the Canada dataset: how many extreme events fall in each season, \
                 broken down by station."
            }
            PanelId::Dense => {
                "For the Canada dataset: standardized max against standardized mean and \
                 event duration in days, a first look at how events cluster per station."
            }
            PanelId::Main => {
                "For the Canada dataset: peak water level across all stations, grouped by \
                 domain section and station. Hover a tile for the event details."
            }
            PanelId::Pie => {
                "For the Canada dataset: where the stations sit along the river and the \
                 gaps between them."
            }
            PanelId::Scatter => {
                "For the Canada dataset: how events at a given peak level are spread \
                 over the stations."
            }
        }
    }
}

impl fmt::Display for PanelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Panel results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub id: PanelId,
    pub title: String,
    pub result: Result<ChartSpec, ChartError>,
}

/// The five panels of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSet {
    pub dataset: DatasetId,
    pub panels: [Panel; 5],
}

impl PanelSet {
    pub fn get(&self, id: PanelId) -> &Panel {
        &self.panels[id as usize]
    }

    pub fn failures(&self) -> usize {
        self.panels.iter().filter(|p| p.result.is_err()).count()
    }
}

/// Derive the dataset's table and build its five charts. Shared steps run
/// once; a failure there fails every panel. Panel steps run per panel, so
/// their failures stay on that panel.
pub fn build_panels(id: DatasetId, sources: &Sources, catalog: &StationCatalog) -> PanelSet {
    let recipe = recipe_for(id);
    let pipeline_ctx = PipelineContext { catalog, sources };
    let prepared: Result<Table, ChartError> = sources
        .get(recipe.source)
        .and_then(|source| pipeline::run(source, &recipe.steps, pipeline_ctx))
        .map_err(ChartError::from);

    let ctx = ChartContext { catalog };
    let panels = std::array::from_fn(|i| {
        let chart = &recipe.panels[i];
        let panel = PanelId::ALL[i];
        let steps = &recipe.panel_steps[i];
        let result = match &prepared {
            Ok(table) if steps.is_empty() => chart.build(table, ctx),
            Ok(table) => pipeline::run(table, steps, pipeline_ctx)
                .map_err(ChartError::from)
                .and_then(|own| chart.build(&own, ctx)),
            Err(e) => Err(e.clone()),
        };
        if let Err(e) = &result {
            log::warn!("{id}/{panel}: {e}");
        }
        Panel {
            id: panel,
            title: chart.title().to_string(),
            result,
        }
    });

    let set = PanelSet { dataset: id, panels };
    log::info!("dataset '{id}': {} of 5 panels built", 5 - set.failures());
    set
}

// ---------------------------------------------------------------------------
// Headless export
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PanelExport<'a> {
    panel: PanelId,
    title: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    spec: Option<&'a ChartSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct DatasetExport<'a> {
    dataset: DatasetId,
    panels: Vec<PanelExport<'a>>,
}

/// Pretty JSON of a panel set: each panel carries either its spec or its
/// error message.
pub fn to_json(set: &PanelSet) -> Result<String> {
    let export = DatasetExport {
        dataset: set.dataset,
        panels: set
            .panels
            .iter()
            .map(|p| PanelExport {
                panel: p.id,
                title: &p.title,
                spec: p.result.as_ref().ok(),
                error: p.result.as_ref().err().map(ToString::to_string),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&export).context("serializing panel set")
}

/// Write `<dataset>.json` for every dataset into `dir`.
pub fn export_all(dir: &Path, sources: &Sources, catalog: &StationCatalog) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::new();
    for id in DatasetId::ALL {
        let set = build_panels(id, sources, catalog);
        let path = dir.join(format!("{}.json", id.slug()));
        fs::write(&path, to_json(&set)?).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
