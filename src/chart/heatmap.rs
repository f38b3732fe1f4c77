//! 2-D count density, optionally faceted by two categorical columns.

use std::collections::HashMap;

use super::spec::{Buckets, DensityHeatmap, HeatmapFacet};
use super::{ChartContext, Titles, bin_index, equal_bins, first_seen, log_skipped, num, text};
use crate::color::ContinuousScale;
use crate::data::model::{Table, Value};
use crate::error::ChartError;

/// Order of a categorical axis.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOrder {
    /// First-seen order.
    Appearance,
    /// Station labels in catalog order, then any others as seen.
    StationLabels,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapParams<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub nbins_x: usize,
    pub nbins_y: usize,
    pub x_order: CategoryOrder,
    pub facet_row: Option<&'a str>,
    pub facet_col: Option<&'a str>,
    pub scale: ContinuousScale,
}

pub fn density_heatmap(
    table: &Table,
    params: &HeatmapParams<'_>,
    titles: Titles<'_>,
    ctx: ChartContext<'_>,
) -> Result<DensityHeatmap, ChartError> {
    let x_idx = table.column_index(params.x)?;
    let y_idx = table.column_index(params.y)?;
    let row_idx = params.facet_row.map(|c| table.column_index(c)).transpose()?;
    let col_idx = params.facet_col.map(|c| table.column_index(c)).transpose()?;

    let mut skipped = 0;
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| {
            let row = &table.rows()[r];
            let ok = !row[x_idx].is_null()
                && !row[y_idx].is_null()
                && row_idx.map_or(true, |i| !row[i].is_null())
                && col_idx.map_or(true, |i| !row[i].is_null());
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

    let x_axis = axis(table, &rows, x_idx, params.nbins_x, &params.x_order, ctx);
    let y_axis = axis(table, &rows, y_idx, params.nbins_y, &CategoryOrder::Appearance, ctx);

    let facet_values = |idx: Option<usize>| -> Vec<Option<String>> {
        match idx {
            Some(i) => {
                let mut v = first_seen(table, &rows, i);
                v.sort();
                v.into_iter().map(Some).collect()
            }
            None => vec![None],
        }
    };
    let facet_rows = facet_values(row_idx);
    let facet_cols = facet_values(col_idx);

    let x_pos = positions(&x_axis);
    let y_pos = positions(&y_axis);

    let mut facets = Vec::new();
    let mut max_count = 0;
    for fr in &facet_rows {
        for fc in &facet_cols {
            let mut counts = vec![vec![0u64; x_axis.len()]; y_axis.len()];
            for &r in &rows {
                let row = &table.rows()[r];
                if row_idx.and_then(|i| text(row, i)) != *fr
                    || col_idx.and_then(|i| text(row, i)) != *fc
                {
                    continue;
                }
                let (Some(xb), Some(yb)) = (
                    bucket(&x_axis, &x_pos, row, x_idx),
                    bucket(&y_axis, &y_pos, row, y_idx),
                ) else {
                    continue;
                };
                counts[yb][xb] += 1;
                max_count = max_count.max(counts[yb][xb]);
            }
            facets.push(HeatmapFacet {
                row: fr.clone(),
                col: fc.clone(),
                counts,
            });
        }
    }

    Ok(DensityHeatmap {
        title: titles.title.to_string(),
        x_title: titles.x.to_string(),
        y_title: titles.y.to_string(),
        scale: params.scale,
        x: x_axis,
        y: y_axis,
        facets,
        max_count,
    })
}

/// Numeric columns are binned; anything else becomes categories.
fn axis(
    table: &Table,
    rows: &[usize],
    idx: usize,
    nbins: usize,
    order: &CategoryOrder,
    ctx: ChartContext<'_>,
) -> Buckets {
    let numeric: Option<Vec<f64>> = rows.iter().map(|&r| num(&table.rows()[r], idx)).collect();
    match (numeric, order) {
        (Some(values), CategoryOrder::Appearance) => Buckets::Bins(equal_bins(&values, nbins)),
        (_, CategoryOrder::Appearance) => Buckets::Categories(first_seen(table, rows, idx)),
        (_, CategoryOrder::StationLabels) => {
            let fixed = ctx.catalog.labels();
            let extra: Vec<String> = first_seen(table, rows, idx)
                .into_iter()
                .filter(|s| !fixed.contains(s))
                .collect();
            Buckets::Categories(fixed.into_iter().chain(extra).collect())
        }
    }
}

fn positions(axis: &Buckets) -> HashMap<String, usize> {
    match axis {
        Buckets::Categories(c) => c.iter().enumerate().map(|(i, c)| (c.clone(), i)).collect(),
        Buckets::Bins(_) => HashMap::new(),
    }
}

fn bucket(
    axis: &Buckets,
    pos: &HashMap<String, usize>,
    row: &[Value],
    idx: usize,
) -> Option<usize> {
    match axis {
        Buckets::Bins(bins) => bin_index(bins, num(row, idx)?),
        Buckets::Categories(_) => pos.get(&text(row, idx)?).copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;

    fn titles() -> Titles<'static> {
        Titles {
            title: "density",
            x: "x",
            y: "y",
        }
    }

    #[test]
    fn test_station_label_order_and_bins() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "events",
            vec!["stn_lab".into(), "max".into()],
            vec![
                vec!["sor".into(), Value::Float(1.0)],
                vec!["ptc".into(), Value::Float(3.0)],
                vec!["sor".into(), Value::Float(3.0)],
                vec!["xyz".into(), Value::Float(2.0)],
            ],
        )
        .unwrap();
        let params = HeatmapParams {
            x: "stn_lab",
            y: "max",
            nbins_x: 40,
            nbins_y: 2,
            x_order: CategoryOrder::StationLabels,
            facet_row: None,
            facet_col: None,
            scale: ContinuousScale::Aggrnyl,
        };
        let h = density_heatmap(&t, &params, titles(), ctx).unwrap();
        assert_eq!(h.x.len(), 20);
        assert_eq!(h.x.label(0), "ptc");
        assert_eq!(h.x.label(4), "sor");
        assert_eq!(h.x.label(19), "xyz");
        assert_eq!(h.facets.len(), 1);
        // y bins [1,2) and [2,3]
        let counts = &h.facets[0].counts;
        assert_eq!((counts[0][4], counts[1][4]), (1, 1));
        assert_eq!((counts[0][0], counts[1][0]), (0, 1));
        assert_eq!(counts[1][19], 1);
        assert_eq!(counts[0][1] + counts[1][1], 0);
        assert_eq!(h.max_count, 1);
    }

    #[test]
    fn test_facets_cover_every_combination() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "survey",
            vec!["dep".into(), "anx".into(), "composer".into(), "instr".into()],
            vec![
                vec![Value::Integer(1), Value::Integer(2), "No".into(), "Yes".into()],
                vec![Value::Integer(5), Value::Integer(6), "Yes".into(), "No".into()],
                vec![Value::Integer(5), Value::Integer(6), "Yes".into(), "No".into()],
            ],
        )
        .unwrap();
        let params = HeatmapParams {
            x: "dep",
            y: "anx",
            nbins_x: 2,
            nbins_y: 2,
            x_order: CategoryOrder::Appearance,
            facet_row: Some("composer"),
            facet_col: Some("instr"),
            scale: ContinuousScale::Plasma,
        };
        let h = density_heatmap(&t, &params, titles(), ctx).unwrap();
        assert_eq!(h.facets.len(), 4);
        let yes_no = h
            .facets
            .iter()
            .find(|f| f.row.as_deref() == Some("Yes") && f.col.as_deref() == Some("No"))
            .unwrap();
        assert_eq!(yes_no.counts, vec![vec![0, 0], vec![0, 2]]);
        assert_eq!(h.max_count, 2);
        let total: u64 = h.facets.iter().flat_map(|f| f.counts.iter().flatten()).sum();
        assert_eq!(total, 3);
    }
}
