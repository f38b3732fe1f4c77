//! Generic derive pipeline: one ordered list of steps per dataset.

use std::collections::HashMap;

use serde::Serialize;

use crate::catalog::StationCatalog;
use crate::data::filter::{RowFilter, apply_filter};
use crate::data::model::{Table, Value};
use crate::data::sources::{SourceKind, Sources};
use crate::error::TransformError;
use crate::transform::{impute, season, standardize};

/// Lookups shared by every step.
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub catalog: &'a StationCatalog,
    pub sources: &'a Sources,
}

/// One derivation applied to the working table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DeriveStep {
    Filter(RowFilter),
    Drop(Vec<String>),
    /// `target = source / divisor`
    Divide { source: String, target: String, divisor: f64 },
    /// `target = 1 / source`
    Reciprocal { source: String, target: String },
    /// `target = Σ sources`
    Sum { sources: Vec<String>, target: String },
    /// Season name from a month-first date column.
    Season { source: String, target: String },
    /// Region group of a station label.
    RegionGroup { source: String, target: String },
    /// Population z-score.
    Standardize { source: String, target: String },
    /// 1-based station rank in catalog order.
    StationRank { source: String, target: String },
    FillMeanRounded { column: String },
    FillConstant { column: String, value: Value },
    /// Add `lat` / `lon` from the station-coordinate source, matched on
    /// station name. Stations without coordinates get nulls.
    JoinCoordinates { key: String },
    /// Stable ascending sort.
    SortBy { column: String },
}

/// Run every step over a copy of `source`. The source itself is never mutated.
pub fn run(source: &Table, steps: &[DeriveStep], ctx: PipelineContext<'_>) -> Result<Table, TransformError> {
    let mut table = source.clone();
    for step in steps {
        table = apply(table, step, ctx)?;
    }
    log::debug!(
        "pipeline on '{}': {} steps, {} rows, {} columns",
        source.name,
        steps.len(),
        table.len(),
        table.columns().len()
    );
    Ok(table)
}

fn apply(mut table: Table, step: &DeriveStep, ctx: PipelineContext<'_>) -> Result<Table, TransformError> {
    match step {
        DeriveStep::Filter(filter) => return apply_filter(&table, filter),
        DeriveStep::Drop(columns) => table.drop_columns(columns)?,
        DeriveStep::Divide { source, target, divisor } => {
            if *divisor == 0.0 {
                return Err(TransformError::DivisionByZero {
                    column: source.clone(),
                    row: 0,
                });
            }
            let values = map_numeric(&table, source, |_, v| Ok(v / divisor))?;
            table.set_column(target, values)?;
        }
        DeriveStep::Reciprocal { source, target } => {
            let values = map_numeric(&table, source, |row, v| {
                if v == 0.0 {
                    Err(TransformError::DivisionByZero {
                        column: source.clone(),
                        row,
                    })
                } else {
                    Ok(1.0 / v)
                }
            })?;
            table.set_column(target, values)?;
        }
        DeriveStep::Sum { sources, target } => {
            let columns = sources
                .iter()
                .map(|c| table.numeric(c))
                .collect::<Result<Vec<_>, _>>()?;
            let values = (0..table.len())
                .map(|row| Value::Float(columns.iter().map(|col| col[row]).sum()))
                .collect();
            table.set_column(target, values)?;
        }
        DeriveStep::Season { source, target } => {
            let values = table
                .values(source)?
                .into_iter()
                .map(|cell| -> Result<Value, TransformError> {
                    let text = cell.as_str().ok_or_else(|| TransformError::InvalidDate {
                        value: cell.to_string(),
                        reason: "not a text cell".into(),
                    })?;
                    Ok(Value::from(season::season_of(text)?.as_str()))
                })
                .collect::<Result<Vec<_>, TransformError>>()?;
            table.set_column(target, values)?;
        }
        DeriveStep::RegionGroup { source, target } => {
            let values = table
                .values(source)?
                .into_iter()
                .map(|cell| {
                    ctx.catalog
                        .region_of_label(&cell.to_string())
                        .map(|r| Value::Integer(i64::from(r)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            table.set_column(target, values)?;
        }
        DeriveStep::Standardize { source, target } => {
            let z = standardize::z_scores(&table.numeric(source)?, source)?;
            table.set_column(target, z.into_iter().map(Value::Float).collect())?;
        }
        DeriveStep::StationRank { source, target } => {
            let values = station_ranks(&table, source, ctx.catalog)?;
            table.set_column(target, values)?;
        }
        DeriveStep::FillMeanRounded { column } => {
            impute::fill_mean_rounded(&mut table, column)?;
        }
        DeriveStep::FillConstant { column, value } => {
            impute::fill_constant(&mut table, column, value)?;
        }
        DeriveStep::JoinCoordinates { key } => join_coordinates(&mut table, key, ctx.sources)?,
        DeriveStep::SortBy { column } => table.sort_by_column(column)?,
    }
    Ok(table)
}

fn map_numeric(
    table: &Table,
    column: &str,
    f: impl Fn(usize, f64) -> Result<f64, TransformError>,
) -> Result<Vec<Value>, TransformError> {
    table
        .numeric(column)?
        .into_iter()
        .enumerate()
        .map(|(row, v)| f(row, v).map(Value::Float))
        .collect()
}

/// Rank of every station cell. Unlisted stations are an error.
pub fn station_ranks(table: &Table, column: &str, catalog: &StationCatalog) -> Result<Vec<Value>, TransformError> {
    table
        .values(column)?
        .into_iter()
        .map(|cell| catalog.rank(&cell.to_string()).map(|r| Value::Integer(i64::from(r))))
        .collect()
}

fn join_coordinates(table: &mut Table, key: &str, sources: &Sources) -> Result<(), TransformError> {
    let coords = sources.get(SourceKind::StationCoords)?;
    let names = coords.values("station_name")?;
    let lats = coords.values("lat")?;
    let lons = coords.values("lon")?;

    // First row wins when a station is listed twice.
    let mut lookup: HashMap<String, (Value, Value)> = HashMap::new();
    for ((name, lat), lon) in names.into_iter().zip(lats).zip(lons) {
        lookup
            .entry(name.to_string())
            .or_insert_with(|| (lat.clone(), lon.clone()));
    }

    let (lat, lon): (Vec<Value>, Vec<Value>) = table
        .values(key)?
        .into_iter()
        .map(|cell| {
            lookup
                .get(&cell.to_string())
                .cloned()
                .unwrap_or((Value::Null, Value::Null))
        })
        .unzip();
    let unmatched = lat.iter().filter(|v| v.is_null()).count();
    if unmatched > 0 {
        log::warn!("{unmatched} rows of '{}' have no station coordinates", table.name);
    }
    table.set_column("lat", lat)?;
    table.set_column("lon", lon)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Table {
        Table::from_rows(
            "events",
            vec![
                "station_name".into(),
                "stn_lab".into(),
                "date_start".into(),
                "duration".into(),
            ],
            vec![
                vec!["Sorel".into(), "sor".into(), "06-21-1990 00:00".into(), Value::Integer(48)],
                vec!["PointeClaire".into(), "ptc".into(), "01-02-1991 00:00".into(), Value::Integer(24)],
            ],
        )
        .unwrap()
    }

    fn coords() -> Table {
        Table::from_rows(
            "station_data",
            vec!["station_name".into(), "lat".into(), "lon".into()],
            vec![vec!["Sorel".into(), Value::Float(46.04), Value::Float(-73.11)]],
        )
        .unwrap()
    }

    #[test]
    fn test_coastal_like_steps() {
        let catalog = StationCatalog::st_lawrence();
        let sources = Sources::from_tables([(SourceKind::StationCoords, coords())]);
        let ctx = PipelineContext {
            catalog: &catalog,
            sources: &sources,
        };
        let steps = vec![
            DeriveStep::Divide {
                source: "duration".into(),
                target: "days".into(),
                divisor: 24.0,
            },
            DeriveStep::Season {
                source: "date_start".into(),
                target: "season".into(),
            },
            DeriveStep::RegionGroup {
                source: "stn_lab".into(),
                target: "domain".into(),
            },
            DeriveStep::StationRank {
                source: "station_name".into(),
                target: "rank".into(),
            },
            DeriveStep::JoinCoordinates {
                key: "station_name".into(),
            },
            DeriveStep::SortBy {
                column: "rank".into(),
            },
        ];
        let source = events();
        let out = run(&source, &steps, ctx).unwrap();

        assert_eq!(source, events(), "source must not be mutated");
        assert_eq!(out.values("station_name").unwrap()[0], &Value::from("PointeClaire"));
        assert_eq!(out.numeric("days").unwrap(), vec![1.0, 2.0]);
        assert_eq!(out.values("season").unwrap()[1], &Value::from("Summer"));
        assert_eq!(out.numeric("domain").unwrap(), vec![1.0, 2.0]);
        assert_eq!(out.values("lat").unwrap()[0], &Value::Null);
        assert_eq!(out.values("lon").unwrap()[1], &Value::Float(-73.11));
    }

    #[test]
    fn test_reciprocal_of_zero_is_error() {
        let t = Table::from_rows("r", vec!["rank".into()], vec![vec![Value::Integer(0)]]).unwrap();
        let catalog = StationCatalog::st_lawrence();
        let sources = Sources::default();
        let ctx = PipelineContext {
            catalog: &catalog,
            sources: &sources,
        };
        let step = DeriveStep::Reciprocal {
            source: "rank".into(),
            target: "ratio".into(),
        };
        assert!(matches!(
            run(&t, &[step], ctx),
            Err(TransformError::DivisionByZero { row: 0, .. })
        ));
    }

    #[test]
    fn test_join_requires_coordinate_source() {
        let catalog = StationCatalog::st_lawrence();
        let sources = Sources::default();
        let ctx = PipelineContext {
            catalog: &catalog,
            sources: &sources,
        };
        let step = DeriveStep::JoinCoordinates {
            key: "station_name".into(),
        };
        assert!(matches!(
            run(&events(), &[step], ctx),
            Err(TransformError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_null_date_is_invalid() {
        let t = Table::from_rows("d", vec!["date_start".into()], vec![vec![Value::Null]]).unwrap();
        let catalog = StationCatalog::st_lawrence();
        let sources = Sources::default();
        let ctx = PipelineContext {
            catalog: &catalog,
            sources: &sources,
        };
        let step = DeriveStep::Season {
            source: "date_start".into(),
            target: "season".into(),
        };
        assert!(matches!(run(&t, &[step], ctx), Err(TransformError::InvalidDate { .. })));
    }
}
