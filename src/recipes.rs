//! What each dataset button shows: source table, derived columns, and the
//! five panel charts (histo, dense, main, pie, scatter).

use crate::chart::bar::HistogramParams;
use crate::chart::choropleth::ChoroplethParams;
use crate::chart::geo::GeoParams;
use crate::chart::heatmap::{CategoryOrder, HeatmapParams};
use crate::chart::hierarchy::{HierarchyParams, NodeColor, PathLevel};
use crate::chart::scatter3d::Scatter3dParams;
use crate::chart::spec::{Aggregate, HierarchyStyle};
use crate::chart::ternary::TernaryParams;
use crate::chart::violin::{ViolinParams, ViolinSeriesSpec};
use crate::chart::{ChartRecipe, Palette, Titles};
use crate::color::ContinuousScale;
use crate::dashboard::DatasetId;
use crate::data::filter::RowFilter;
use crate::data::model::Value;
use crate::data::sources::SourceKind;
use crate::transform::pipeline::DeriveStep;

/// Source table, derive steps and panel charts of one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecipe {
    pub source: SourceKind,
    /// Steps every panel depends on.
    pub steps: Vec<DeriveStep>,
    /// Steps only one panel depends on, run on that panel's copy of the
    /// shared table. Same order as `panels`.
    pub panel_steps: [Vec<DeriveStep>; 5],
    /// In panel order: histo, dense, main, pie, scatter.
    pub panels: [ChartRecipe; 5],
}

pub fn recipe_for(id: DatasetId) -> DatasetRecipe {
    match id {
        DatasetId::Coastal => coastal(),
        DatasetId::Music => music(),
        DatasetId::Happiness2019 => happiness_2019(),
        DatasetId::HappinessSeries => happiness_series(),
    }
}

fn s(v: &str) -> String {
    v.to_string()
}

// ---------------------------------------------------------------------------
// Canada: coastal extreme events
// ---------------------------------------------------------------------------

fn coastal() -> DatasetRecipe {
    let standardize = |c: &str| DeriveStep::Standardize {
        source: s(c),
        target: format!("{c}_std"),
    };
    let steps = vec![
        DeriveStep::Divide {
            source: s("duration"),
            target: s("days"),
            divisor: 24.0,
        },
        DeriveStep::Season {
            source: s("date_start"),
            target: s("season"),
        },
        DeriveStep::RegionGroup {
            source: s("stn_lab"),
            target: s("domain"),
        },
        DeriveStep::StationRank {
            source: s("station_name"),
            target: s("rank"),
        },
        DeriveStep::SortBy { column: s("rank") },
    ];
    let panel_steps = [
        vec![],
        vec![standardize("max"), standardize("days"), standardize("mean")],
        vec![],
        vec![DeriveStep::JoinCoordinates { key: s("station_name") }],
        vec![],
    ];

    let panels = [
        ChartRecipe::SeasonBars {
            station: "station_name",
            season: "season",
            titles: Titles {
                title: "Number of Extreme Events for Each Season by Station, 1970-2022",
                x: "Season",
                y: "Number of Observations",
            },
        },
        ChartRecipe::Ternary {
            params: TernaryParams {
                a: "max_std",
                b: "mean_std",
                c: "days_std",
                color: "station_name",
                palette: Palette::Stations,
                size: Some("peak_ind"),
                size_max: 10.0,
                label: Some("stn_lab"),
                frame: None,
            },
            title: "Clustering of Extreme Events, 1970-2022",
        },
        ChartRecipe::Hierarchy {
            params: HierarchyParams {
                style: HierarchyStyle::Treemap,
                path: vec![
                    PathLevel::Column("domain"),
                    PathLevel::Column("station_name"),
                    PathLevel::Column("ind_in_stn"),
                ],
                values: None,
                color: NodeColor::Continuous {
                    column: "max",
                    scale: ContinuousScale::Aggrnyl,
                    midpoint_weights: Some("days"),
                },
                hover: vec!["date_max", "days", "mean"],
            },
            title: "Max Events per Station by Peakness, 1970-2022",
        },
        ChartRecipe::Geo {
            params: GeoParams {
                station: "station_name",
                lat: "lat",
                lon: "lon",
                size: "max",
                text: vec!["stn_lab", "duration", "max", "mean", "min"],
                center_station: 2,
                projection_scale: 30.0,
                land_color: "#d9d9d9",
            },
            title: "Locations on the St. Lawrence",
        },
        ChartRecipe::Heatmap {
            params: HeatmapParams {
                x: "stn_lab",
                y: "max",
                nbins_x: 40,
                nbins_y: 40,
                x_order: CategoryOrder::StationLabels,
                facet_row: None,
                facet_col: None,
                scale: ContinuousScale::Aggrnyl,
            },
            titles: Titles {
                title: "Saturation of Peakness by Station, 1970-2022",
                x: "Station Label",
                y: "Peak Water Level",
            },
        },
    ];

    DatasetRecipe {
        source: SourceKind::Events,
        steps,
        panel_steps,
        panels,
    }
}

// ---------------------------------------------------------------------------
// Music and mental health survey
// ---------------------------------------------------------------------------

const SCORES: [&str; 4] = ["Anxiety", "Depression", "Insomnia", "OCD"];

fn music() -> DatasetRecipe {
    let fill = |column: &str, value: &str| DeriveStep::FillConstant {
        column: s(column),
        value: Value::from(value),
    };
    let steps = vec![
        DeriveStep::Drop(vec![s("Timestamp"), s("Permissions")]),
        DeriveStep::FillMeanRounded { column: s("Age") },
        fill("Music effects", "No effect"),
        fill("While working", "No"),
        fill("Instrumentalist", "No"),
        fill("Composer", "No"),
        fill("Primary streaming service", "I do not use a streaming service."),
        DeriveStep::Sum {
            sources: SCORES.iter().map(|c| s(c)).collect(),
            target: s("Mental health severity"),
        },
    ];

    let violin_series = [
        ("Depression", "Depression/10", "#ff69b4"),
        ("Anxiety", "Anxiety/10", "#008000"),
        ("OCD", "OCD/10", "#0000ff"),
        ("Insomnia", "Insomnia/10", "#800080"),
    ]
    .into_iter()
    .map(|(column, name, color)| ViolinSeriesSpec { column, name, color })
    .collect();

    let panels = [
        ChartRecipe::Histogram {
            params: HistogramParams {
                x: "Fav genre",
                y: None,
                func: Aggregate::Count,
                color: Some("Music effects"),
                palette: Palette::Prism,
                bins: None,
                frame: None,
            },
            titles: Titles {
                title: "Favourite Genre and the Effect of Music",
                x: "Fav genre",
                y: "Number of People",
            },
        },
        ChartRecipe::Heatmap {
            params: HeatmapParams {
                x: "Depression",
                y: "Anxiety",
                nbins_x: 10,
                nbins_y: 10,
                x_order: CategoryOrder::Appearance,
                facet_row: Some("Composer"),
                facet_col: Some("Instrumentalist"),
                scale: ContinuousScale::Plasma,
            },
            titles: Titles {
                title: "Depression and Anxiety by Composer / Instrumentalist",
                x: "Depression",
                y: "Anxiety",
            },
        },
        ChartRecipe::Violin {
            params: ViolinParams {
                category: "Music effects",
                series: violin_series,
                filter: Some(RowFilter::NotEquals {
                    column: s("Music effects"),
                    value: Value::from("No effect"),
                }),
                box_visible: true,
                mean_line: true,
            },
            titles: Titles {
                title: "Self-Ranked Mental Health by Effect of Music",
                x: "Music Tends to ______ My Mental Health",
                y: "Self-Ranked Score Out of 10",
            },
        },
        ChartRecipe::Hierarchy {
            params: HierarchyParams {
                style: HierarchyStyle::Sunburst,
                path: vec![
                    PathLevel::Column("Primary streaming service"),
                    PathLevel::Column("Exploratory"),
                ],
                values: Some("Hours per day"),
                color: NodeColor::Discrete {
                    column: "Primary streaming service",
                    palette: Palette::Plasma,
                },
                hover: vec![],
            },
            title: "Listening Hours by Streaming Service and Exploration",
        },
        ChartRecipe::Ternary {
            params: TernaryParams {
                a: "OCD",
                b: "Anxiety",
                c: "Insomnia",
                color: "Exploratory",
                palette: Palette::Prism,
                size: Some("Mental health severity"),
                size_max: 20.0,
                label: None,
                frame: None,
            },
            title: "OCD, Anxiety and Insomnia by Exploratory Listening",
        },
    ];

    DatasetRecipe {
        source: SourceKind::Survey,
        steps,
        panel_steps: Default::default(),
        panels,
    }
}

// ---------------------------------------------------------------------------
// World happiness
// ---------------------------------------------------------------------------

const SCORE: &str = "Happiness Score";
const RATIO: &str = "Happiness Ratio";
const GDP: &str = "Economy (GDP per Capita)";
const HEALTH: &str = "Health (Life Expectancy)";
const TRUST: &str = "Trust (Government Corruption)";
const FACTORS: [&str; 6] = [GDP, "Family", HEALTH, "Freedom", TRUST, "Generosity"];

fn ratio_step() -> DeriveStep {
    DeriveStep::Reciprocal {
        source: s("Happiness Rank"),
        target: s(RATIO),
    }
}

fn world_tree(values: &'static str, hover: &'static str, title: &'static str) -> ChartRecipe {
    ChartRecipe::Hierarchy {
        params: HierarchyParams {
            style: HierarchyStyle::Treemap,
            path: vec![
                PathLevel::Constant("world"),
                PathLevel::Column("Region"),
                PathLevel::Column("Country"),
            ],
            values: Some(values),
            color: NodeColor::Continuous {
                column: SCORE,
                scale: ContinuousScale::RdBu,
                midpoint_weights: Some(values),
            },
            hover: vec![hover],
        },
        title,
    }
}

fn region_sunburst(values: &'static str, hover: &'static str, title: &'static str) -> ChartRecipe {
    ChartRecipe::Hierarchy {
        params: HierarchyParams {
            style: HierarchyStyle::Sunburst,
            path: vec![PathLevel::Column("Region"), PathLevel::Column("Country")],
            values: Some(values),
            color: NodeColor::Continuous {
                column: SCORE,
                scale: ContinuousScale::RdBu,
                midpoint_weights: Some(values),
            },
            hover: vec![hover],
        },
        title,
    }
}

fn world_map(frame: Option<&'static str>, title: &'static str) -> ChartRecipe {
    ChartRecipe::Choropleth {
        params: ChoroplethParams {
            location: "iso_alpha",
            name: "Country",
            value: SCORE,
            hover: FACTORS.to_vec(),
            scale: ContinuousScale::RdBu,
            frame,
        },
        title,
    }
}

fn happiness_2019() -> DatasetRecipe {
    let steps = vec![
        DeriveStep::Filter(RowFilter::Equals {
            column: s("Year"),
            value: Value::Integer(2019),
        }),
        DeriveStep::Drop(vec![s("Year")]),
        ratio_step(),
    ];
    let panels = [
        ChartRecipe::Histogram {
            params: HistogramParams {
                x: SCORE,
                y: Some(HEALTH),
                func: Aggregate::Avg,
                color: Some("Region"),
                palette: Palette::Plasma,
                bins: None,
                frame: None,
            },
            titles: Titles {
                title: "Life Expectancy by Happiness Score, 2019",
                x: SCORE,
                y: "Average Health (Life Expectancy)",
            },
        },
        world_tree(RATIO, RATIO, "Happiness Ratio by Region and Country, 2019"),
        world_map(None, "Happiness Score by Country, 2019"),
        region_sunburst(RATIO, RATIO, "Happiness Ratio by Region, 2019"),
        ChartRecipe::Scatter3d {
            params: Scatter3dParams {
                x: GDP,
                y: TRUST,
                z: "Freedom",
                color: "Region",
                palette: Palette::Plasma,
                label: Some("Country"),
                filter: Some(RowFilter::GreaterThan {
                    column: s(SCORE),
                    threshold: 5.0,
                }),
            },
            title: "GDP, Trust and Freedom where Happiness Score > 5, 2019",
        },
    ];
    DatasetRecipe {
        source: SourceKind::Happiness,
        steps,
        panel_steps: Default::default(),
        panels,
    }
}

fn happiness_series() -> DatasetRecipe {
    let panels = [
        ChartRecipe::Histogram {
            params: HistogramParams {
                x: SCORE,
                y: None,
                func: Aggregate::Count,
                color: Some("Region"),
                palette: Palette::Plasma,
                bins: None,
                frame: Some("Year"),
            },
            titles: Titles {
                title: "Happiness Score Distribution by Region, 2015-2019",
                x: SCORE,
                y: "Number of Countries",
            },
        },
        world_tree(GDP, GDP, "GDP per Capita by Region and Country, 2015-2019"),
        world_map(Some("Year"), "Happiness Score by Country, 2015-2019"),
        region_sunburst(TRUST, "iso_alpha", "Government Trust by Region, 2015-2019"),
        ChartRecipe::Ternary {
            params: TernaryParams {
                a: "Generosity",
                b: TRUST,
                c: "Freedom",
                color: "Region",
                palette: Palette::Plasma,
                size: Some(SCORE),
                size_max: 15.0,
                label: Some("Country"),
                frame: Some("Year"),
            },
            title: "Generosity, Trust and Freedom, 2015-2019",
        },
    ];
    DatasetRecipe {
        source: SourceKind::Happiness,
        steps: vec![ratio_step()],
        panel_steps: Default::default(),
        panels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::PanelId;

    #[test]
    fn test_every_dataset_has_five_titled_panels() {
        for id in DatasetId::ALL {
            let recipe = recipe_for(id);
            assert!(recipe.panels.iter().all(|p| !p.title().is_empty()));
        }
    }

    #[test]
    fn test_coastal_derives_standardized_columns() {
        let recipe = coastal();
        let targets: Vec<String> = recipe.panel_steps[PanelId::Dense as usize]
            .iter()
            .filter_map(|step| match step {
                DeriveStep::Standardize { target, .. } => Some(target.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(targets, vec!["max_std", "days_std", "mean_std"]);
        assert!(recipe.steps.iter().all(|step| !matches!(
            step,
            DeriveStep::Standardize { .. } | DeriveStep::JoinCoordinates { .. }
        )));
    }

    #[test]
    fn test_happiness_sources_match() {
        assert_eq!(happiness_2019().source, happiness_series().source);
        assert_eq!(music().source, SourceKind::Survey);
    }
}
