use super::bar::{HistogramParams, histogram, season_bars};
use super::choropleth::{ChoroplethParams, choropleth};
use super::geo::{GeoParams, geo_scatter};
use super::heatmap::{HeatmapParams, density_heatmap};
use super::hierarchy::{HierarchyParams, hierarchy};
use super::scatter3d::{Scatter3dParams, scatter3d};
use super::ternary::{TernaryParams, ternary_scatter};
use super::violin::{ViolinParams, violin};
use super::{ChartContext, ChartSpec, Titles};
use crate::data::model::Table;
use crate::error::ChartError;

/// A chart kind plus everything needed to build it from a prepared table.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartRecipe {
    SeasonBars {
        station: &'static str,
        season: &'static str,
        titles: Titles<'static>,
    },
    Histogram {
        params: HistogramParams<'static>,
        titles: Titles<'static>,
    },
    Heatmap {
        params: HeatmapParams<'static>,
        titles: Titles<'static>,
    },
    Hierarchy {
        params: HierarchyParams<'static>,
        title: &'static str,
    },
    Ternary {
        params: TernaryParams<'static>,
        title: &'static str,
    },
    Geo {
        params: GeoParams<'static>,
        title: &'static str,
    },
    Choropleth {
        params: ChoroplethParams<'static>,
        title: &'static str,
    },
    Violin {
        params: ViolinParams<'static>,
        titles: Titles<'static>,
    },
    Scatter3d {
        params: Scatter3dParams<'static>,
        title: &'static str,
    },
}

impl ChartRecipe {
    pub fn build(&self, table: &Table, ctx: ChartContext<'_>) -> Result<ChartSpec, ChartError> {
        Ok(match self {
            ChartRecipe::SeasonBars {
                station,
                season,
                titles,
            } => ChartSpec::Bar(season_bars(table, station, season, *titles, ctx)?),
            ChartRecipe::Histogram { params, titles } => {
                ChartSpec::Bar(histogram(table, params, *titles, ctx)?)
            }
            ChartRecipe::Heatmap { params, titles } => {
                ChartSpec::Heatmap(density_heatmap(table, params, *titles, ctx)?)
            }
            ChartRecipe::Hierarchy { params, title } => {
                ChartSpec::Hierarchy(hierarchy(table, params, title, ctx)?)
            }
            ChartRecipe::Ternary { params, title } => {
                ChartSpec::Ternary(ternary_scatter(table, params, title, ctx)?)
            }
            ChartRecipe::Geo { params, title } => ChartSpec::Geo(geo_scatter(table, params, title, ctx)?),
            ChartRecipe::Choropleth { params, title } => {
                ChartSpec::Choropleth(choropleth(table, params, title)?)
            }
            ChartRecipe::Violin { params, titles } => ChartSpec::Violin(violin(table, params, *titles)?),
            ChartRecipe::Scatter3d { params, title } => {
                ChartSpec::Scatter3d(scatter3d(table, params, title, ctx)?)
            }
        })
    }

    /// Chart title, known before building.
    pub fn title(&self) -> &'static str {
        match self {
            ChartRecipe::SeasonBars { titles, .. }
            | ChartRecipe::Histogram { titles, .. }
            | ChartRecipe::Heatmap { titles, .. }
            | ChartRecipe::Violin { titles, .. } => titles.title,
            ChartRecipe::Hierarchy { title, .. }
            | ChartRecipe::Ternary { title, .. }
            | ChartRecipe::Geo { title, .. }
            | ChartRecipe::Choropleth { title, .. }
            | ChartRecipe::Scatter3d { title, .. } => *title,
        }
    }
}
