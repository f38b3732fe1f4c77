//! Treemap and sunburst hierarchies built from a path of columns.

use std::collections::HashMap;

use super::spec::{ColorAxis, Hierarchy, HierarchyNode, HierarchyStyle, HoverField};
use super::{ChartContext, Palette, first_seen, log_skipped, num, series_colors, text};
use crate::color::{ContinuousScale, FALLBACK};
use crate::data::model::Table;
use crate::error::ChartError;
use crate::transform::standardize::weighted_mean;

/// One level of the hierarchy path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathLevel<'a> {
    Column(&'a str),
    /// A single fixed node, e.g. a "world" root.
    Constant(&'a str),
}

/// How nodes are filled.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeColor<'a> {
    /// Value-weighted mean of a numeric column, mapped through a scale.
    /// With `midpoint_weights`, the scale is centred on the mean of the
    /// colour column weighted by that column.
    Continuous {
        column: &'a str,
        scale: ContinuousScale,
        midpoint_weights: Option<&'a str>,
    },
    /// Category colour when every row under a node shares one category.
    Discrete { column: &'a str, palette: Palette },
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyParams<'a> {
    pub style: HierarchyStyle,
    pub path: Vec<PathLevel<'a>>,
    /// Node sizes; one per row when absent.
    pub values: Option<&'a str>,
    pub color: NodeColor<'a>,
    /// Extra fields shown on single-row leaves.
    pub hover: Vec<&'a str>,
}

#[derive(Debug, Default)]
struct NodeAcc {
    id: String,
    parent: Option<String>,
    label: String,
    depth: usize,
    value: f64,
    weighted: f64,
    plain: f64,
    rows: Vec<usize>,
    category: Option<String>,
    mixed: bool,
}

impl NodeAcc {
    fn color_value(&self) -> Option<f64> {
        if self.rows.is_empty() {
            None
        } else if self.value > 0.0 {
            Some(self.weighted / self.value)
        } else {
            Some(self.plain / self.rows.len() as f64)
        }
    }
}

pub fn hierarchy(
    table: &Table,
    params: &HierarchyParams<'_>,
    title: &str,
    ctx: ChartContext<'_>,
) -> Result<Hierarchy, ChartError> {
    if params.path.is_empty() {
        return Err(ChartError::InvalidParameter("hierarchy path is empty".into()));
    }
    let path: Vec<Result<usize, &str>> = params
        .path
        .iter()
        .map(|level| match level {
            PathLevel::Column(c) => table.column_index(c).map(Ok),
            PathLevel::Constant(label) => Ok(Err(*label)),
        })
        .collect::<Result<_, _>>()?;
    let value_idx = params.values.map(|c| table.column_index(c)).transpose()?;
    let (color_idx, continuous) = match &params.color {
        NodeColor::Continuous { column, .. } => (table.column_index(column)?, true),
        NodeColor::Discrete { column, .. } => (table.column_index(column)?, false),
    };
    let hover_idx = params
        .hover
        .iter()
        .map(|c| table.column_index(c).map(|i| (*c, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut skipped = 0;
    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| {
            let row = &table.rows()[r];
            let ok = path.iter().all(|p| p.map_or(true, |i| !row[i].is_null()))
                && value_idx.map_or(true, |i| num(row, i).is_some_and(|v| v >= 0.0))
                && if continuous {
                    num(row, color_idx).is_some()
                } else {
                    !row[color_idx].is_null()
                };
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

    // Nodes in first-seen order, so parents always precede children.
    let mut nodes: Vec<NodeAcc> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    for &r in &rows {
        let row = &table.rows()[r];
        let value = value_idx.and_then(|i| num(row, i)).unwrap_or(1.0);
        let color_num = num(row, color_idx).unwrap_or(0.0);
        let category = text(row, color_idx);
        let mut parent: Option<String> = None;
        let mut prefix: Vec<String> = Vec::with_capacity(path.len());
        for (depth, level) in path.iter().enumerate() {
            let label = match level {
                Ok(i) => row[*i].to_string(),
                Err(constant) => constant.to_string(),
            };
            let id = match &parent {
                Some(p) => format!("{p}/{}", id_segment(&label)),
                None => id_segment(&label),
            };
            prefix.push(label.clone());
            let slot = *index.entry(prefix.clone()).or_insert_with(|| {
                nodes.push(NodeAcc {
                    id: id.clone(),
                    parent: parent.clone(),
                    label,
                    depth,
                    ..NodeAcc::default()
                });
                nodes.len() - 1
            });
            let node = &mut nodes[slot];
            node.value += value;
            node.weighted += value * color_num;
            node.plain += color_num;
            node.rows.push(r);
            if node.category.is_none() && !node.mixed {
                node.category = category.clone();
            } else if node.category != category {
                node.category = None;
                node.mixed = true;
            }
            parent = Some(id);
        }
    }

    let color_axis = match &params.color {
        NodeColor::Continuous {
            column,
            scale,
            midpoint_weights,
        } => {
            let mid = match midpoint_weights {
                Some(w) => Some(midpoint(table, &rows, color_idx, w)?),
                None => None,
            };
            let values = nodes.iter().filter_map(NodeAcc::color_value);
            Some(
                ColorAxis::new(*column, *scale, values, mid)
                    .ok_or_else(|| ChartError::NoData(title.to_string()))?,
            )
        }
        NodeColor::Discrete { .. } => None,
    };
    let discrete: HashMap<String, String> = match &params.color {
        NodeColor::Discrete { palette, .. } => {
            let categories = first_seen(table, &rows, color_idx);
            let colors = series_colors(*palette, &categories, ctx)?;
            categories.into_iter().zip(colors).collect()
        }
        NodeColor::Continuous { .. } => HashMap::new(),
    };

    let nodes = nodes
        .into_iter()
        .map(|n| {
            let color_value = if continuous { n.color_value() } else { None };
            let fill = match (&color_axis, color_value, &n.category) {
                (Some(axis), Some(v), _) => axis.color_for(v),
                (None, _, Some(cat)) => discrete
                    .get(cat)
                    .cloned()
                    .unwrap_or_else(|| FALLBACK.to_string()),
                _ => FALLBACK.to_string(),
            };
            let leaf = n.depth + 1 == path.len();
            let hover: Vec<HoverField> = match n.rows.as_slice() {
                [r] if leaf => hover_idx
                    .iter()
                    .map(|(name, i)| (name.to_string(), table.rows()[*r][*i].to_string()))
                    .collect(),
                _ => Vec::new(),
            };
            HierarchyNode {
                id: n.id,
                parent: n.parent,
                label: n.label,
                depth: n.depth,
                value: n.value,
                color_value,
                fill,
                hover,
            }
        })
        .collect();

    Ok(Hierarchy {
        title: title.to_string(),
        style: params.style,
        nodes,
        color_axis,
    })
}

/// Path component for a node id; `\` and `/` are escaped so distinct paths
/// never share an id.
fn id_segment(label: &str) -> String {
    label.replace('\\', "\\\\").replace('/', "\\/")
}

/// Mean of the colour column weighted by `weights`, over rows where the
/// weight is numeric.
fn midpoint(table: &Table, rows: &[usize], color_idx: usize, weights: &str) -> Result<f64, ChartError> {
    let w_idx = table.column_index(weights)?;
    let (values, w): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|&r| {
            let row = &table.rows()[r];
            Some((num(row, color_idx)?, num(row, w_idx)?))
        })
        .unzip();
    weighted_mean(&values, &w, weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;
    use crate::data::model::Value;

    fn whd() -> Table {
        Table::from_rows(
            "whd",
            vec!["Region".into(), "Country".into(), "ratio".into(), "score".into()],
            vec![
                vec!["Europe".into(), "Finland".into(), Value::Float(1.0), Value::Float(7.8)],
                vec!["Europe".into(), "Norway".into(), Value::Float(0.5), Value::Float(7.5)],
                vec!["Africa".into(), "Chad".into(), Value::Float(0.5), Value::Float(4.0)],
                vec![Value::Null, "Nowhere".into(), Value::Float(0.5), Value::Float(1.0)],
            ],
        )
        .unwrap()
    }

    fn params(weights: Option<&'static str>) -> HierarchyParams<'static> {
        HierarchyParams {
            style: HierarchyStyle::Treemap,
            path: vec![
                PathLevel::Constant("world"),
                PathLevel::Column("Region"),
                PathLevel::Column("Country"),
            ],
            values: Some("ratio"),
            color: NodeColor::Continuous {
                column: "score",
                scale: ContinuousScale::RdBu,
                midpoint_weights: weights,
            },
            hover: vec!["ratio"],
        }
    }

    #[test]
    fn test_nodes_aggregate_values_and_colors() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let h = hierarchy(&whd(), &params(Some("ratio")), "tree", ctx).unwrap();
        let ids: Vec<&str> = h.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "world",
                "world/Europe",
                "world/Europe/Finland",
                "world/Europe/Norway",
                "world/Africa",
                "world/Africa/Chad"
            ]
        );
        let europe = &h.nodes[1];
        assert_eq!(europe.parent.as_deref(), Some("world"));
        assert_eq!(europe.value, 1.5);
        // (7.8·1 + 7.5·0.5) / 1.5
        assert!((europe.color_value.unwrap() - 7.7).abs() < 1e-9);
        assert_eq!(h.nodes[2].hover, vec![("ratio".to_string(), "1".to_string())]);
        assert!(h.nodes[1].hover.is_empty());

        let axis = h.color_axis.unwrap();
        // weighted midpoint (7.8 + 3.75 + 2.0) / 2.0
        assert!((axis.mid.unwrap() - 6.775).abs() < 1e-9);
        // range widened symmetrically around the midpoint
        assert!((axis.min - 4.0).abs() < 1e-9);
        assert!((axis.max - 9.55).abs() < 1e-9);
    }

    #[test]
    fn test_slash_in_labels_keeps_paths_apart() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "slash",
            vec!["Region".into(), "Country".into(), "ratio".into(), "score".into()],
            vec![
                vec!["a/b".into(), "c".into(), Value::Float(1.0), Value::Float(5.0)],
                vec!["a".into(), "b/c".into(), Value::Float(2.0), Value::Float(6.0)],
            ],
        )
        .unwrap();
        let h = hierarchy(&t, &params(None), "tree", ctx).unwrap();
        let ids: Vec<&str> = h.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["world", "world/a\\/b", "world/a\\/b/c", "world/a", "world/a/b\\/c"]
        );
        let leaves: Vec<(&str, f64)> = h
            .nodes
            .iter()
            .filter(|n| n.depth == 2)
            .map(|n| (n.label.as_str(), n.value))
            .collect();
        assert_eq!(leaves, vec![("c", 1.0), ("b/c", 2.0)]);
        assert_eq!(h.nodes[4].parent.as_deref(), Some("world/a"));
    }

    #[test]
    fn test_zero_weight_midpoint_is_error() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "w",
            vec!["Region".into(), "Country".into(), "ratio".into(), "score".into()],
            vec![vec!["Europe".into(), "Finland".into(), Value::Float(0.0), Value::Float(7.8)]],
        )
        .unwrap();
        assert!(matches!(
            hierarchy(&t, &params(Some("ratio")), "tree", ctx),
            Err(ChartError::ZeroWeight { .. })
        ));
    }

    #[test]
    fn test_discrete_colors_uniform_branches() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "survey",
            vec!["service".into(), "explore".into(), "hours".into()],
            vec![
                vec!["Spotify".into(), "Yes".into(), Value::Float(3.0)],
                vec!["Spotify".into(), "No".into(), Value::Float(1.0)],
                vec!["YouTube".into(), "Yes".into(), Value::Float(2.0)],
            ],
        )
        .unwrap();
        let p = HierarchyParams {
            style: HierarchyStyle::Sunburst,
            path: vec![PathLevel::Column("service"), PathLevel::Column("explore")],
            values: Some("hours"),
            color: NodeColor::Discrete {
                column: "service",
                palette: Palette::Plasma,
            },
            hover: vec![],
        };
        let h = hierarchy(&t, &p, "sun", ctx).unwrap();
        assert!(h.color_axis.is_none());
        assert_eq!(h.nodes[0].label, "Spotify");
        assert_eq!(h.nodes[0].value, 4.0);
        assert_eq!(h.nodes[0].fill, crate::color::PLASMA[0]);
        assert_eq!(h.nodes[1].fill, crate::color::PLASMA[0]);
        let youtube = h.nodes.iter().find(|n| n.id == "YouTube").unwrap();
        assert_eq!(youtube.fill, crate::color::PLASMA[1]);
    }
}
