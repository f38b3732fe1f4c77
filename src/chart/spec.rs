//! Declarative chart descriptions. Builders produce these; the UI and the
//! JSON export consume them. Colours are `#rrggbb` strings.

use serde::Serialize;

use crate::color::ContinuousScale;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Bar(BarChart),
    Heatmap(DensityHeatmap),
    Hierarchy(Hierarchy),
    Ternary(TernaryScatter),
    Geo(GeoScatter),
    Choropleth(Choropleth),
    Violin(ViolinChart),
    Scatter3d(Scatter3d),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Bar(c) => &c.title,
            ChartSpec::Heatmap(c) => &c.title,
            ChartSpec::Hierarchy(c) => &c.title,
            ChartSpec::Ternary(c) => &c.title,
            ChartSpec::Geo(c) => &c.title,
            ChartSpec::Choropleth(c) => &c.title,
            ChartSpec::Violin(c) => &c.title,
            ChartSpec::Scatter3d(c) => &c.title,
        }
    }

    /// Animation frame keys, empty for static charts.
    pub fn frame_keys(&self) -> Vec<String> {
        fn keys<'a>(it: impl Iterator<Item = &'a Option<String>>) -> Vec<String> {
            it.flatten().cloned().collect()
        }
        match self {
            ChartSpec::Bar(c) => keys(c.frames.iter().map(|f| &f.key)),
            ChartSpec::Ternary(c) => keys(c.frames.iter().map(|f| &f.key)),
            ChartSpec::Choropleth(c) => keys(c.frames.iter().map(|f| &f.key)),
            _ => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

/// Half-open numeric bin `[start, end)`; the last bin of an axis is closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn label(&self) -> String {
        format!("{:.2}–{:.2}", self.start, self.end)
    }
}

/// Either named categories or numeric bins along an axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Buckets {
    Categories(Vec<String>),
    Bins(Vec<Bin>),
}

impl Buckets {
    pub fn len(&self) -> usize {
        match self {
            Buckets::Categories(c) => c.len(),
            Buckets::Bins(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn label(&self, i: usize) -> String {
        match self {
            Buckets::Categories(c) => c.get(i).cloned().unwrap_or_default(),
            Buckets::Bins(b) => b.get(i).map(Bin::label).unwrap_or_default(),
        }
    }
}

/// Continuous colour axis. With a midpoint the range is widened so the
/// midpoint sits at the centre of the scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorAxis {
    pub title: String,
    pub scale: ContinuousScale,
    pub min: f64,
    pub max: f64,
    pub mid: Option<f64>,
}

impl ColorAxis {
    /// `None` when there is no finite value to span.
    pub fn new(
        title: impl Into<String>,
        scale: ContinuousScale,
        values: impl IntoIterator<Item = f64>,
        mid: Option<f64>,
    ) -> Option<Self> {
        let (mut min, mut max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if !min.is_finite() {
            return None;
        }
        if let Some(m) = mid {
            let half = (max - m).abs().max((m - min).abs());
            min = m - half;
            max = m + half;
        }
        Some(ColorAxis {
            title: title.into(),
            scale,
            min,
            max,
            mid,
        })
    }

    /// Position of `v` on the scale, in `[0, 1]`.
    pub fn position(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return 0.5;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, v: f64) -> String {
        self.scale.sample(self.position(v))
    }
}

/// A `(field, value)` pair shown on hover.
pub type HoverField = (String, String);

// ---------------------------------------------------------------------------
// Bar / histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    Count,
    Avg,
}

/// Grouped bars over categories or bins; one frame unless animated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub func: Aggregate,
    pub x: Buckets,
    pub frames: Vec<BarFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFrame {
    pub key: Option<String>,
    pub series: Vec<BarSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub name: String,
    pub color: String,
    /// One entry per x bucket; `None` where an average has no rows.
    pub values: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Density heatmap
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DensityHeatmap {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub scale: ContinuousScale,
    pub x: Buckets,
    pub y: Buckets,
    pub facets: Vec<HeatmapFacet>,
    /// Largest count over all facets.
    pub max_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapFacet {
    pub row: Option<String>,
    pub col: Option<String>,
    /// `counts[y][x]`
    pub counts: Vec<Vec<u64>>,
}

// ---------------------------------------------------------------------------
// Treemap / sunburst
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyStyle {
    Treemap,
    Sunburst,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hierarchy {
    pub title: String,
    pub style: HierarchyStyle,
    /// Parents always precede their children.
    pub nodes: Vec<HierarchyNode>,
    pub color_axis: Option<ColorAxis>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    /// Path components joined with `/`, with `\` and `/` inside a component
    /// escaped by `\`.
    pub id: String,
    pub parent: Option<String>,
    pub label: String,
    pub depth: usize,
    pub value: f64,
    pub color_value: Option<f64>,
    pub fill: String,
    pub hover: Vec<HoverField>,
}

// ---------------------------------------------------------------------------
// Ternary scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryScatter {
    pub title: String,
    /// Titles of the a, b and c axes.
    pub axes: [String; 3],
    pub size_max: f64,
    pub frames: Vec<TernaryFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryFrame {
    pub key: Option<String>,
    pub series: Vec<TernarySeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernarySeries {
    pub name: String,
    pub color: String,
    pub points: Vec<TernaryPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TernaryPoint {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// Marker diameter in points.
    pub size: f64,
    pub label: Option<String>,
}

// ---------------------------------------------------------------------------
// Geographic scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoScatter {
    pub title: String,
    pub center: Option<GeoPoint>,
    pub projection_scale: f64,
    pub land_color: String,
    pub traces: Vec<GeoTrace>,
}

/// All markers of one station; one legend entry per trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoTrace {
    pub name: String,
    pub color: String,
    pub markers: Vec<GeoMarker>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMarker {
    pub position: GeoPoint,
    pub size: f64,
    pub text: Vec<String>,
}

// ---------------------------------------------------------------------------
// Choropleth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choropleth {
    pub title: String,
    pub color_axis: ColorAxis,
    pub frames: Vec<ChoroplethFrame>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethFrame {
    pub key: Option<String>,
    pub regions: Vec<ChoroplethRegion>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethRegion {
    /// ISO-3166 alpha-3 code.
    pub location: String,
    pub name: String,
    pub value: f64,
    pub fill: String,
    pub hover: Vec<HoverField>,
}

// ---------------------------------------------------------------------------
// Violin
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinChart {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub categories: Vec<String>,
    pub series: Vec<ViolinSeries>,
    pub box_visible: bool,
    pub mean_line: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinSeries {
    pub name: String,
    pub color: String,
    pub groups: Vec<ViolinGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinGroup {
    pub category: String,
    pub stats: DistributionStats,
    /// `(value, density)` samples of a Gaussian KDE, density scaled to max 1.
    pub density: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionStats {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Whisker ends: most extreme data within 1.5 IQR of the box.
    pub lower_fence: f64,
    pub upper_fence: f64,
}

// ---------------------------------------------------------------------------
// 3-D scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3d {
    pub title: String,
    pub axes: [String; 3],
    pub series: Vec<Scatter3dSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3dSeries {
    pub name: String,
    pub color: String,
    pub points: Vec<Point3>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub label: Option<String>,
}
