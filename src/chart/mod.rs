/// Chart builders: pure functions from a prepared table to a [`ChartSpec`].
///
/// ```text
///   prepared Table ──┐
///   StationCatalog ──┼──► ChartRecipe::build ──► ChartSpec (serialisable)
///   palettes ────────┘
/// ```
///
/// Builders keep no state between calls. Rows missing a required cell are
/// skipped; series that end up empty are dropped.

pub mod bar;
pub mod choropleth;
pub mod geo;
pub mod heatmap;
pub mod hierarchy;
pub mod layout;
pub mod recipe;
pub mod scatter3d;
pub mod spec;
pub mod ternary;
pub mod violin;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::StationCatalog;
use crate::color::{self, DiscreteColors};
use crate::data::model::{Table, Value};
use crate::error::ChartError;
use spec::Bin;

pub use recipe::ChartRecipe;
pub use spec::ChartSpec;

/// Fixed lookups available to every builder.
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'a> {
    pub catalog: &'a StationCatalog,
}

/// Chart and axis titles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Titles<'a> {
    pub title: &'a str,
    pub x: &'a str,
    pub y: &'a str,
}

impl<'a> Titles<'a> {
    /// Title only, for charts without cartesian axes.
    pub fn plain(title: &'a str) -> Self {
        Titles { title, x: "", y: "" }
    }
}

// ---------------------------------------------------------------------------
// Palettes
// ---------------------------------------------------------------------------

/// Source of discrete series colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palette {
    /// Catalog colour of the station named by the category.
    Stations,
    Prism,
    Plasma,
}

/// Colours for `categories`, in the same order.
pub fn series_colors(
    palette: Palette,
    categories: &[String],
    ctx: ChartContext<'_>,
) -> Result<Vec<String>, ChartError> {
    let sequence = match palette {
        Palette::Stations => {
            return categories
                .iter()
                .map(|c| ctx.catalog.color(c).map(str::to_string).map_err(ChartError::from))
                .collect();
        }
        Palette::Prism => color::PRISM,
        Palette::Plasma => color::PLASMA,
    };
    let map = DiscreteColors::new(categories.iter().map(String::as_str), sequence);
    Ok(categories.iter().map(|c| map.color_for(c).to_string()).collect())
}

// ---------------------------------------------------------------------------
// Row helpers
// ---------------------------------------------------------------------------

/// Numeric cell, `None` for nulls and text.
pub(crate) fn num(row: &[Value], idx: usize) -> Option<f64> {
    row[idx].as_f64().filter(|v| v.is_finite())
}

/// Text form of a cell, `None` for nulls.
pub(crate) fn text(row: &[Value], idx: usize) -> Option<String> {
    (!row[idx].is_null()).then(|| row[idx].to_string())
}

/// Distinct non-null values in first-seen order.
pub(crate) fn first_seen(table: &Table, rows: &[usize], idx: usize) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for &r in rows {
        if let Some(v) = text(&table.rows()[r], idx) {
            if !out.contains(&v) {
                out.push(v);
            }
        }
    }
    out
}

/// Row indices grouped by animation frame, frames in ascending key order.
/// Without a frame column there is a single unnamed frame with every row.
pub(crate) fn frames(
    table: &Table,
    rows: Vec<usize>,
    frame_column: Option<&str>,
) -> Result<Vec<(Option<String>, Vec<usize>)>, ChartError> {
    let Some(column) = frame_column else {
        return Ok(vec![(None, rows)]);
    };
    let idx = table.column_index(column)?;
    let mut grouped: BTreeMap<Value, Vec<usize>> = BTreeMap::new();
    for r in rows {
        let key = &table.rows()[r][idx];
        if key.is_null() {
            continue;
        }
        grouped.entry(key.clone()).or_default().push(r);
    }
    Ok(grouped
        .into_iter()
        .map(|(k, rows)| (Some(k.to_string()), rows))
        .collect())
}

pub(crate) fn log_skipped(what: &str, skipped: usize) {
    if skipped > 0 {
        log::debug!("{what}: skipped {skipped} rows with missing values");
    }
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Sturges' rule: `⌈log₂ n⌉ + 1` bins.
pub fn sturges(n: usize) -> usize {
    if n <= 1 {
        return 1;
    }
    (n as f64).log2().ceil() as usize + 1
}

/// `count` equal-width bins spanning the finite values. A zero-width range
/// gets a single unit bin around the value.
pub fn equal_bins(values: &[f64], count: usize) -> Vec<Bin> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return Vec::new();
    }
    if hi - lo <= f64::EPSILON * lo.abs().max(1.0) {
        return vec![Bin {
            start: lo - 0.5,
            end: lo + 0.5,
        }];
    }
    let count = count.max(1);
    let width = (hi - lo) / count as f64;
    (0..count)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: if i + 1 == count { hi } else { lo + width * (i + 1) as f64 },
        })
        .collect()
}

/// Index of the bin holding `v`; the last bin includes its upper edge.
pub fn bin_index(bins: &[Bin], v: f64) -> Option<usize> {
    let first = bins.first()?;
    let last = bins.last()?;
    if !v.is_finite() || v < first.start || v > last.end {
        return None;
    }
    let width = (last.end - first.start) / bins.len() as f64;
    if width <= 0.0 {
        return Some(0);
    }
    let i = ((v - first.start) / width).floor() as usize;
    Some(i.min(bins.len() - 1))
}
