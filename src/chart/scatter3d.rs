use super::spec::{Point3, Scatter3d, Scatter3dSeries};
use super::{ChartContext, Palette, first_seen, log_skipped, num, series_colors, text};
use crate::data::filter::{RowFilter, filtered_indices};
use crate::data::model::Table;
use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq)]
pub struct Scatter3dParams<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub z: &'a str,
    pub color: &'a str,
    pub palette: Palette,
    pub label: Option<&'a str>,
    pub filter: Option<RowFilter>,
}

pub fn scatter3d(
    table: &Table,
    params: &Scatter3dParams<'_>,
    title: &str,
    ctx: ChartContext<'_>,
) -> Result<Scatter3d, ChartError> {
    let [x, y, z] = [params.x, params.y, params.z].map(|c| table.column_index(c));
    let (x, y, z) = (x?, y?, z?);
    let color = table.column_index(params.color)?;
    let label = params.label.map(|c| table.column_index(c)).transpose()?;

    let candidates = match &params.filter {
        Some(f) => filtered_indices(table, f)?,
        None => (0..table.len()).collect(),
    };
    let rows: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&r| {
            let row = &table.rows()[r];
            [x, y, z].iter().all(|&i| num(row, i).is_some()) && !row[color].is_null()
        })
        .collect();
    log_skipped(title, candidates.len() - rows.len());
    if rows.is_empty() {
        return Err(ChartError::NoData(title.to_string()));
    }

    let groups = first_seen(table, &rows, color);
    let colors = series_colors(params.palette, &groups, ctx)?;
    let series = groups
        .into_iter()
        .zip(colors)
        .map(|(group, color_hex)| {
            let points = rows
                .iter()
                .map(|&r| &table.rows()[r])
                .filter(|row| text(row, color).as_deref() == Some(group.as_str()))
                .filter_map(|row| {
                    Some(Point3 {
                        x: num(row, x)?,
                        y: num(row, y)?,
                        z: num(row, z)?,
                        label: label.and_then(|i| text(row, i)),
                    })
                })
                .collect();
            Scatter3dSeries {
                name: group,
                color: color_hex,
                points,
            }
        })
        .collect();

    Ok(Scatter3d {
        title: title.to_string(),
        axes: [params.x.to_string(), params.y.to_string(), params.z.to_string()],
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;
    use crate::data::model::Value;

    #[test]
    fn test_threshold_filter_and_grouping() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "whd",
            vec![
                "Country".into(),
                "Region".into(),
                "score".into(),
                "gdp".into(),
                "trust".into(),
                "freedom".into(),
            ],
            vec![
                vec![
                    "Finland".into(),
                    "Europe".into(),
                    Value::Float(7.8),
                    Value::Float(1.3),
                    Value::Float(0.4),
                    Value::Float(0.6),
                ],
                vec![
                    "Chad".into(),
                    "Africa".into(),
                    Value::Float(4.0),
                    Value::Float(0.3),
                    Value::Float(0.1),
                    Value::Float(0.2),
                ],
                vec![
                    "Norway".into(),
                    "Europe".into(),
                    Value::Float(7.5),
                    Value::Float(1.4),
                    Value::Float(0.3),
                    Value::Float(0.6),
                ],
            ],
        )
        .unwrap();
        let params = Scatter3dParams {
            x: "gdp",
            y: "trust",
            z: "freedom",
            color: "Region",
            palette: Palette::Plasma,
            label: Some("Country"),
            filter: Some(RowFilter::GreaterThan {
                column: "score".into(),
                threshold: 5.0,
            }),
        };
        let chart = scatter3d(&t, &params, "3d", ctx).unwrap();
        assert_eq!(chart.series.len(), 1);
        assert_eq!(chart.series[0].name, "Europe");
        assert_eq!(chart.series[0].points.len(), 2);
        assert_eq!(chart.series[0].points[1].label.as_deref(), Some("Norway"));
        assert_eq!(chart.axes[2], "freedom");
    }
}
