//! Grouped season bars and histograms.

use std::collections::HashMap;

use super::spec::{Aggregate, BarChart, BarFrame, BarSeries, Buckets};
use super::{
    ChartContext, Palette, Titles, bin_index, equal_bins, first_seen, frames, log_skipped, num,
    series_colors, sturges, text,
};
use crate::data::model::Table;
use crate::error::ChartError;
use crate::transform::aggregate::season_counts;
use crate::transform::season::Season;

/// One bar series per station, seasons on the x axis, catalog colours.
pub fn season_bars(
    table: &Table,
    station_column: &str,
    season_column: &str,
    titles: Titles<'_>,
    ctx: ChartContext<'_>,
) -> Result<BarChart, ChartError> {
    let counts = season_counts(table, station_column, season_column, ctx.catalog)?;
    if counts.stations.is_empty() {
        return Err(ChartError::NoData(titles.title.to_string()));
    }
    let colors = series_colors(Palette::Stations, &counts.stations, ctx)?;
    let series = counts
        .stations
        .iter()
        .zip(&counts.counts)
        .zip(colors)
        .map(|((name, row), color)| BarSeries {
            name: name.clone(),
            color,
            values: row.iter().map(|&c| Some(c as f64)).collect(),
        })
        .collect();

    Ok(BarChart {
        title: titles.title.to_string(),
        x_title: titles.x.to_string(),
        y_title: titles.y.to_string(),
        func: Aggregate::Count,
        x: Buckets::Categories(Season::ORDER.iter().map(|s| s.to_string()).collect()),
        frames: vec![BarFrame { key: None, series }],
    })
}

/// Parameters of a histogram.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramParams<'a> {
    pub x: &'a str,
    /// Column averaged per bucket when `func` is `Avg`.
    pub y: Option<&'a str>,
    pub func: Aggregate,
    pub color: Option<&'a str>,
    pub palette: Palette,
    pub bins: Option<usize>,
    pub frame: Option<&'a str>,
}

/// Count or average per x bucket, one series per colour group.
///
/// A numeric x column is binned (shared bins across frames); anything else
/// is treated as categories in first-seen order.
pub fn histogram(
    table: &Table,
    params: &HistogramParams<'_>,
    titles: Titles<'_>,
    ctx: ChartContext<'_>,
) -> Result<BarChart, ChartError> {
    let x_idx = table.column_index(params.x)?;
    let y_idx = match (params.func, params.y) {
        (Aggregate::Avg, Some(y)) => Some(table.column_index(y)?),
        (Aggregate::Avg, None) => {
            return Err(ChartError::InvalidParameter(
                "average histogram needs a y column".into(),
            ));
        }
        (Aggregate::Count, _) => None,
    };
    let color_idx = params.color.map(|c| table.column_index(c)).transpose()?;

    // Rows with every required cell present.
    let mut skipped = 0;
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| {
            let row = &table.rows()[r];
            let ok = !row[x_idx].is_null()
                && y_idx.map_or(true, |i| num(row, i).is_some())
                && color_idx.map_or(true, |i| !row[i].is_null());
            if !ok {
                skipped += 1;
            }
            ok
        })
        .collect();
    log_skipped(titles.title, skipped);
    if rows.is_empty() {
        return Err(ChartError::NoData(titles.title.to_string()));
    }

    let numeric_x = rows.iter().all(|&r| num(&table.rows()[r], x_idx).is_some());
    let buckets = if numeric_x {
        let xs: Vec<f64> = rows.iter().filter_map(|&r| num(&table.rows()[r], x_idx)).collect();
        Buckets::Bins(equal_bins(&xs, params.bins.unwrap_or_else(|| sturges(xs.len()))))
    } else {
        Buckets::Categories(first_seen(table, &rows, x_idx))
    };

    let groups = match color_idx {
        Some(i) => first_seen(table, &rows, i),
        None => vec![params.y.unwrap_or("count").to_string()],
    };
    let colors = series_colors(params.palette, &groups, ctx)?;

    let category_pos: HashMap<String, usize> = match &buckets {
        Buckets::Categories(c) => c.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect(),
        Buckets::Bins(_) => HashMap::new(),
    };
    let bucket_of = |r: usize| -> Option<usize> {
        let row = &table.rows()[r];
        match &buckets {
            Buckets::Bins(bins) => bin_index(bins, num(row, x_idx)?),
            Buckets::Categories(_) => category_pos.get(&text(row, x_idx)?).copied(),
        }
    };

    let mut out_frames = Vec::new();
    for (key, frame_rows) in frames(table, rows, params.frame)? {
        let mut series = Vec::new();
        for (g, (group, color)) in groups.iter().zip(&colors).enumerate() {
            let mut sums = vec![0.0; buckets.len()];
            let mut counts = vec![0usize; buckets.len()];
            for &r in &frame_rows {
                let row = &table.rows()[r];
                let in_group = match color_idx {
                    Some(i) => text(row, i).as_deref() == Some(group.as_str()),
                    None => g == 0,
                };
                if !in_group {
                    continue;
                }
                let Some(b) = bucket_of(r) else { continue };
                counts[b] += 1;
                if let Some(i) = y_idx {
                    sums[b] += num(row, i).unwrap_or(0.0);
                }
            }
            if counts.iter().all(|&c| c == 0) {
                continue;
            }
            let values = counts
                .iter()
                .zip(&sums)
                .map(|(&c, &s)| match params.func {
                    Aggregate::Count => Some(c as f64),
                    Aggregate::Avg => (c > 0).then(|| s / c as f64),
                })
                .collect();
            series.push(BarSeries {
                name: group.clone(),
                color: color.clone(),
                values,
            });
        }
        out_frames.push(BarFrame { key, series });
    }

    Ok(BarChart {
        title: titles.title.to_string(),
        x_title: titles.x.to_string(),
        y_title: titles.y.to_string(),
        func: params.func,
        x: buckets,
        frames: out_frames,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;
    use crate::data::model::Value;

    fn titles() -> Titles<'static> {
        Titles {
            title: "t",
            x: "x",
            y: "y",
        }
    }

    #[test]
    fn test_season_bars_series_per_station() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "events",
            vec!["station_name".into(), "season".into()],
            vec![
                vec!["Sorel".into(), "Winter".into()],
                vec!["Sorel".into(), "Winter".into()],
                vec!["Rimouski".into(), "Spring".into()],
            ],
        )
        .unwrap();
        let chart = season_bars(&t, "station_name", "season", titles(), ctx).unwrap();
        let series = &chart.frames[0].series;
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Sorel");
        assert_eq!(series[0].color, "#6495ed");
        assert_eq!(series[0].values, vec![Some(0.0), Some(0.0), Some(0.0), Some(2.0)]);
        assert_eq!(series[1].values, vec![Some(1.0), Some(0.0), Some(0.0), Some(0.0)]);
        assert_eq!(chart.x.label(3), "Winter");
    }

    fn survey() -> Table {
        Table::from_rows(
            "survey",
            vec!["genre".into(), "effect".into(), "score".into()],
            vec![
                vec!["Rock".into(), "Improve".into(), Value::Float(4.0)],
                vec!["Jazz".into(), "Improve".into(), Value::Float(6.0)],
                vec!["Rock".into(), "Worsen".into(), Value::Null],
                vec!["Rock".into(), "Improve".into(), Value::Float(8.0)],
                vec![Value::Null, "Improve".into(), Value::Float(1.0)],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_categorical_count_histogram() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let params = HistogramParams {
            x: "genre",
            y: None,
            func: Aggregate::Count,
            color: Some("effect"),
            palette: Palette::Prism,
            bins: None,
            frame: None,
        };
        let chart = histogram(&survey(), &params, titles(), ctx).unwrap();
        assert_eq!(chart.x, Buckets::Categories(vec!["Rock".into(), "Jazz".into()]));
        let series = &chart.frames[0].series;
        assert_eq!(series[0].name, "Improve");
        assert_eq!(series[0].values, vec![Some(2.0), Some(1.0)]);
        assert_eq!(series[1].name, "Worsen");
        assert_eq!(series[1].values, vec![Some(1.0), Some(0.0)]);
    }

    #[test]
    fn test_numeric_average_histogram() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "whd",
            vec!["score".into(), "health".into()],
            vec![
                vec![Value::Float(1.0), Value::Float(0.2)],
                vec![Value::Float(1.5), Value::Float(0.4)],
                vec![Value::Float(4.0), Value::Float(0.9)],
            ],
        )
        .unwrap();
        let params = HistogramParams {
            x: "score",
            y: Some("health"),
            func: Aggregate::Avg,
            color: None,
            palette: Palette::Plasma,
            bins: Some(3),
            frame: None,
        };
        let chart = histogram(&t, &params, titles(), ctx).unwrap();
        let values = &chart.frames[0].series[0].values;
        assert_eq!(values.len(), 3);
        assert!((values[0].unwrap() - 0.3).abs() < 1e-12);
        assert_eq!(values[1], None);
        assert!((values[2].unwrap() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_average_needs_y() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let params = HistogramParams {
            x: "genre",
            y: None,
            func: Aggregate::Avg,
            color: None,
            palette: Palette::Prism,
            bins: None,
            frame: None,
        };
        assert!(matches!(
            histogram(&survey(), &params, titles(), ctx),
            Err(ChartError::InvalidParameter(_))
        ));
    }
}
