use super::spec::{TernaryFrame, TernaryPoint, TernaryScatter, TernarySeries};
use super::{ChartContext, Palette, first_seen, frames, log_skipped, num, series_colors, text};
use crate::data::model::Table;
use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq)]
pub struct TernaryParams<'a> {
    pub a: &'a str,
    pub b: &'a str,
    pub c: &'a str,
    pub color: &'a str,
    pub palette: Palette,
    /// Marker area follows this column; the largest value gets `size_max`.
    pub size: Option<&'a str>,
    pub size_max: f64,
    pub label: Option<&'a str>,
    pub frame: Option<&'a str>,
}

/// Marker diameter for `v` with area scaling: `size_max · √(v / max)`.
pub fn marker_size(v: f64, max: f64, size_max: f64) -> f64 {
    if max <= 0.0 || v <= 0.0 {
        return 0.0;
    }
    size_max * (v / max).sqrt()
}

pub fn ternary_scatter(
    table: &Table,
    params: &TernaryParams<'_>,
    title: &str,
    ctx: ChartContext<'_>,
) -> Result<TernaryScatter, ChartError> {
    let a = table.column_index(params.a)?;
    let b = table.column_index(params.b)?;
    let c = table.column_index(params.c)?;
    let color = table.column_index(params.color)?;
    let size = params.size.map(|s| table.column_index(s)).transpose()?;
    let label = params.label.map(|l| table.column_index(l)).transpose()?;

    let mut skipped = 0;
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| {
            let row = &table.rows()[r];
            let ok = [a, b, c].iter().all(|&i| num(row, i).is_some())
                && !row[color].is_null()
                && size.map_or(true, |i| num(row, i).is_some());
            if !ok {
                skipped += 1;
            }
            ok
        })
        .collect();
    log_skipped(title, skipped);
    if rows.is_empty() {
        return Err(ChartError::NoData(title.to_string()));
    }

    // Groups and the size reference are shared by every frame so colours
    // and scales stay put while animating.
    let groups = first_seen(table, &rows, color);
    let colors = series_colors(params.palette, &groups, ctx)?;
    let max_size = size.map_or(0.0, |i| {
        rows.iter()
            .filter_map(|&r| num(&table.rows()[r], i))
            .fold(0.0, f64::max)
    });

    let mut out = Vec::new();
    for (key, frame_rows) in frames(table, rows, params.frame)? {
        let series = groups
            .iter()
            .zip(&colors)
            .filter_map(|(group, color_hex)| {
                let points: Vec<TernaryPoint> = frame_rows
                    .iter()
                    .map(|&r| &table.rows()[r])
                    .filter(|row| text(row, color).as_deref() == Some(group.as_str()))
                    .filter_map(|row| {
                        Some(TernaryPoint {
                            a: num(row, a)?,
                            b: num(row, b)?,
                            c: num(row, c)?,
                            size: match size {
                                Some(i) => marker_size(num(row, i)?, max_size, params.size_max),
                                None => params.size_max / 2.0,
                            },
                            label: label.and_then(|i| text(row, i)),
                        })
                    })
                    .collect();
                (!points.is_empty()).then(|| TernarySeries {
                    name: group.clone(),
                    color: color_hex.clone(),
                    points,
                })
            })
            .collect();
        out.push(TernaryFrame { key, series });
    }

    Ok(TernaryScatter {
        title: title.to_string(),
        axes: [params.a.to_string(), params.b.to_string(), params.c.to_string()],
        size_max: params.size_max,
        frames: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;
    use crate::data::model::Value;

    #[test]
    fn test_marker_size_area_scaling() {
        assert_eq!(marker_size(4.0, 4.0, 10.0), 10.0);
        assert_eq!(marker_size(1.0, 4.0, 10.0), 5.0);
        assert_eq!(marker_size(0.0, 4.0, 10.0), 0.0);
        assert_eq!(marker_size(1.0, 0.0, 10.0), 0.0);
    }

    #[test]
    fn test_frames_keep_shared_colors() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "whd",
            vec![
                "Year".into(),
                "Region".into(),
                "g".into(),
                "t".into(),
                "f".into(),
                "score".into(),
            ],
            vec![
                vec![
                    Value::Integer(2015),
                    "Europe".into(),
                    Value::Float(0.2),
                    Value::Float(0.3),
                    Value::Float(0.5),
                    Value::Float(7.0),
                ],
                vec![
                    Value::Integer(2016),
                    "Africa".into(),
                    Value::Float(0.1),
                    Value::Float(0.1),
                    Value::Float(0.1),
                    Value::Float(1.75),
                ],
                vec![
                    Value::Integer(2016),
                    "Europe".into(),
                    Value::Null,
                    Value::Float(0.1),
                    Value::Float(0.1),
                    Value::Float(5.0),
                ],
            ],
        )
        .unwrap();
        let params = TernaryParams {
            a: "g",
            b: "t",
            c: "f",
            color: "Region",
            palette: Palette::Plasma,
            size: Some("score"),
            size_max: 15.0,
            label: None,
            frame: Some("Year"),
        };
        let chart = ternary_scatter(&t, &params, "tern", ctx).unwrap();
        assert_eq!(chart.frames.len(), 2);
        assert_eq!(chart.frames[0].key.as_deref(), Some("2015"));
        assert_eq!(chart.frames[0].series.len(), 1);
        let africa = &chart.frames[1].series[0];
        assert_eq!(africa.name, "Africa");
        // Africa is the second group overall, so it keeps the second colour
        assert_eq!(africa.color, crate::color::PLASMA[1]);
        assert_eq!(africa.points[0].size, 7.5);
    }
}
