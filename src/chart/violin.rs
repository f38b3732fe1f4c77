//! Grouped violins: one series per value column, one violin per category.

use super::spec::{DistributionStats, ViolinChart, ViolinGroup, ViolinSeries};
use super::{Titles, first_seen, num, text};
use crate::data::filter::{RowFilter, filtered_indices};
use crate::data::model::Table;
use crate::error::ChartError;
use crate::transform::standardize::{mean, population_std};

/// Number of points sampled along each density curve.
pub const KDE_POINTS: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ViolinSeriesSpec<'a> {
    pub column: &'a str,
    pub name: &'a str,
    pub color: &'a str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViolinParams<'a> {
    pub category: &'a str,
    pub series: Vec<ViolinSeriesSpec<'a>>,
    pub filter: Option<RowFilter>,
    pub box_visible: bool,
    pub mean_line: bool,
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Box statistics; `None` for an empty sample.
pub fn distribution_stats(values: &[f64]) -> Option<DistributionStats> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(f64::total_cmp);
    let q1 = quantile(&sorted, 0.25);
    let q3 = quantile(&sorted, 0.75);
    let iqr = q3 - q1;
    let lo_limit = q1 - 1.5 * iqr;
    let hi_limit = q3 + 1.5 * iqr;
    Some(DistributionStats {
        count: sorted.len(),
        min: sorted[0],
        q1,
        median: quantile(&sorted, 0.5),
        q3,
        max: sorted[sorted.len() - 1],
        mean: mean(&sorted)?,
        lower_fence: sorted.iter().copied().find(|&v| v >= lo_limit).unwrap_or(q1),
        upper_fence: sorted.iter().rev().copied().find(|&v| v <= hi_limit).unwrap_or(q3),
    })
}

/// Silverman's rule of thumb, `0.9 · min(σ, IQR / 1.34) · n^(-1/5)`.
/// Falls back to σ, then 1, when the spread collapses.
pub fn silverman_bandwidth(values: &[f64], stats: &DistributionStats) -> f64 {
    let sigma = population_std(values).unwrap_or(0.0);
    let iqr = (stats.q3 - stats.q1) / 1.34;
    let spread = match (sigma > 0.0, iqr > 0.0) {
        (true, true) => sigma.min(iqr),
        (true, false) => sigma,
        (false, true) => iqr,
        (false, false) => 1.0,
    };
    0.9 * spread * (values.len() as f64).powf(-0.2)
}

/// Gaussian KDE sampled at `KDE_POINTS` points over `[min − 2h, max + 2h]`,
/// scaled so the peak is 1.
pub fn kde(values: &[f64], stats: &DistributionStats) -> Vec<(f64, f64)> {
    let h = silverman_bandwidth(values, stats);
    let lo = stats.min - 2.0 * h;
    let hi = stats.max + 2.0 * h;
    let step = (hi - lo) / (KDE_POINTS - 1) as f64;
    let curve: Vec<(f64, f64)> = (0..KDE_POINTS)
        .map(|i| {
            let x = lo + step * i as f64;
            let d: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / h).powi(2)).exp())
                .sum();
            (x, d)
        })
        .collect();
    let peak = curve.iter().map(|(_, d)| *d).fold(0.0, f64::max);
    if peak <= 0.0 {
        return curve;
    }
    curve.into_iter().map(|(x, d)| (x, d / peak)).collect()
}

pub fn violin(table: &Table, params: &ViolinParams<'_>, titles: Titles<'_>) -> Result<ViolinChart, ChartError> {
    let category = table.column_index(params.category)?;
    let rows = match &params.filter {
        Some(f) => filtered_indices(table, f)?,
        None => (0..table.len()).collect(),
    };
    let categories = first_seen(table, &rows, category);

    let mut series = Vec::new();
    for spec in &params.series {
        let column = table.column_index(spec.column)?;
        let groups: Vec<ViolinGroup> = categories
            .iter()
            .filter_map(|cat| {
                let values: Vec<f64> = rows
                    .iter()
                    .map(|&r| &table.rows()[r])
                    .filter(|row| text(row, category).as_deref() == Some(cat.as_str()))
                    .filter_map(|row| num(row, column))
                    .collect();
                let stats = distribution_stats(&values)?;
                Some(ViolinGroup {
                    category: cat.clone(),
                    density: kde(&values, &stats),
                    stats,
                })
            })
            .collect();
        if groups.is_empty() {
            log::debug!("{}: series '{}' has no values", titles.title, spec.name);
            continue;
        }
        series.push(ViolinSeries {
            name: spec.name.to_string(),
            color: spec.color.to_string(),
            groups,
        });
    }
    if series.is_empty() {
        return Err(ChartError::NoData(titles.title.to_string()));
    }

    Ok(ViolinChart {
        title: titles.title.to_string(),
        x_title: titles.x.to_string(),
        y_title: titles.y.to_string(),
        categories,
        series,
        box_visible: params.box_visible,
        mean_line: params.mean_line,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    #[test]
    fn test_distribution_stats_quartiles_and_fences() {
        let s = distribution_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(s.count, 5);
        assert_eq!((s.q1, s.median, s.q3), (2.0, 3.0, 4.0));
        assert_eq!(s.mean, 22.0);
        assert_eq!(s.lower_fence, 1.0);
        // 100 lies beyond q3 + 1.5·IQR = 7
        assert_eq!(s.upper_fence, 4.0);
        assert!(distribution_stats(&[]).is_none());
    }

    #[test]
    fn test_kde_peaks_at_one() {
        let values = [2.0, 2.0, 3.0, 7.0];
        let stats = distribution_stats(&values).unwrap();
        let curve = kde(&values, &stats);
        assert_eq!(curve.len(), KDE_POINTS);
        let peak = curve.iter().map(|(_, d)| *d).fold(0.0, f64::max);
        assert!((peak - 1.0).abs() < 1e-12);
        assert!(curve[0].0 < 2.0 && curve[KDE_POINTS - 1].0 > 7.0);
    }

    #[test]
    fn test_constant_sample_still_has_bandwidth() {
        let values = [5.0, 5.0, 5.0];
        let stats = distribution_stats(&values).unwrap();
        assert!(silverman_bandwidth(&values, &stats) > 0.0);
    }

    #[test]
    fn test_violin_excludes_filtered_category() {
        let t = Table::from_rows(
            "survey",
            vec!["effect".into(), "Depression".into(), "Anxiety".into()],
            vec![
                vec!["Improve".into(), Value::Integer(3), Value::Null],
                vec!["Improve".into(), Value::Integer(5), Value::Null],
                vec!["No effect".into(), Value::Integer(9), Value::Integer(9)],
                vec!["Worsen".into(), Value::Integer(8), Value::Null],
            ],
        )
        .unwrap();
        let params = ViolinParams {
            category: "effect",
            series: vec![
                ViolinSeriesSpec {
                    column: "Depression",
                    name: "Depression/10",
                    color: "#ff69b4",
                },
                ViolinSeriesSpec {
                    column: "Anxiety",
                    name: "Anxiety/10",
                    color: "#008000",
                },
            ],
            filter: Some(RowFilter::NotEquals {
                column: "effect".into(),
                value: "No effect".into(),
            }),
            box_visible: true,
            mean_line: true,
        };
        let titles = Titles {
            title: "violin",
            x: "effect",
            y: "score",
        };
        let chart = violin(&t, &params, titles).unwrap();
        assert_eq!(chart.categories, vec!["Improve", "Worsen"]);
        // Anxiety only has a value under the excluded category
        assert_eq!(chart.series.len(), 1);
        let improve = &chart.series[0].groups[0];
        assert_eq!(improve.stats.median, 4.0);
    }
}
