//! Station events on a map: one trace per station, one marker per event.

use super::spec::{GeoMarker, GeoPoint, GeoScatter, GeoTrace};
use super::{ChartContext, log_skipped, num, text};
use crate::data::model::Table;
use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq)]
pub struct GeoParams<'a> {
    pub station: &'a str,
    pub lat: &'a str,
    pub lon: &'a str,
    pub size: &'a str,
    /// Cells listed in the marker text, in this order.
    pub text: Vec<&'a str>,
    /// Catalog index of the station the map is centred on.
    pub center_station: usize,
    pub projection_scale: f64,
    pub land_color: &'a str,
}

pub fn geo_scatter(
    table: &Table,
    params: &GeoParams<'_>,
    title: &str,
    ctx: ChartContext<'_>,
) -> Result<GeoScatter, ChartError> {
    let station = table.column_index(params.station)?;
    let lat = table.column_index(params.lat)?;
    let lon = table.column_index(params.lon)?;
    let size = table.column_index(params.size)?;
    let text_idx = params
        .text
        .iter()
        .map(|c| table.column_index(c))
        .collect::<Result<Vec<_>, _>>()?;

    let position = |r: usize| -> Option<GeoPoint> {
        let row = &table.rows()[r];
        Some(GeoPoint {
            lat: num(row, lat)?,
            lon: num(row, lon)?,
        })
    };

    let mut skipped = 0;
    let mut traces = Vec::new();
    // Catalog order, stations without events left out.
    for info in ctx.catalog.stations() {
        let mut markers = Vec::new();
        for r in 0..table.len() {
            let row = &table.rows()[r];
            if text(row, station).as_deref() != Some(info.name.as_str()) {
                continue;
            }
            let (Some(p), Some(s)) = (position(r), num(row, size)) else {
                skipped += 1;
                continue;
            };
            markers.push(GeoMarker {
                position: p,
                size: s,
                text: text_idx.iter().map(|&i| row[i].to_string()).collect(),
            });
        }
        if !markers.is_empty() {
            traces.push(GeoTrace {
                name: info.name.clone(),
                color: info.color.clone(),
                markers,
            });
        }
    }
    log_skipped(title, skipped);
    if traces.is_empty() {
        return Err(ChartError::NoData(title.to_string()));
    }

    let center = ctx
        .catalog
        .get(params.center_station)
        .and_then(|info| {
            traces
                .iter()
                .find(|t| t.name == info.name)
                .map(|t| t.markers[0].position)
        })
        .or_else(|| mean_position(&traces));

    Ok(GeoScatter {
        title: title.to_string(),
        center,
        projection_scale: params.projection_scale,
        land_color: params.land_color.to_string(),
        traces,
    })
}

fn mean_position(traces: &[GeoTrace]) -> Option<GeoPoint> {
    let points: Vec<GeoPoint> = traces
        .iter()
        .flat_map(|t| t.markers.iter().map(|m| m.position))
        .collect();
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    Some(GeoPoint {
        lat: points.iter().map(|p| p.lat).sum::<f64>() / n,
        lon: points.iter().map(|p| p.lon).sum::<f64>() / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StationCatalog;
    use crate::data::model::Value;

    fn params() -> GeoParams<'static> {
        GeoParams {
            station: "station_name",
            lat: "lat",
            lon: "lon",
            size: "max",
            text: vec!["stn_lab", "max"],
            center_station: 2,
            projection_scale: 30.0,
            land_color: "#d9d9d9",
        }
    }

    fn row(name: &str, lab: &str, lat: Value, lon: Value, max: f64) -> Vec<Value> {
        vec![name.into(), lab.into(), lat, lon, Value::Float(max)]
    }

    fn columns() -> Vec<String> {
        ["station_name", "stn_lab", "lat", "lon", "max"]
            .map(String::from)
            .to_vec()
    }

    #[test]
    fn test_one_trace_per_station_in_catalog_order() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "events",
            columns(),
            vec![
                row("Sorel", "sor", Value::Float(46.0), Value::Float(-73.1), 2.5),
                row("Varennes", "var", Value::Float(45.7), Value::Float(-73.4), 3.0),
                row("Sorel", "sor", Value::Float(46.0), Value::Float(-73.1), 2.0),
                row("Rimouski", "rim", Value::Null, Value::Null, 4.0),
            ],
        )
        .unwrap();
        let chart = geo_scatter(&t, &params(), "map", ctx).unwrap();
        let names: Vec<&str> = chart.traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Varennes", "Sorel"]);
        assert_eq!(chart.traces[1].markers.len(), 2);
        assert_eq!(chart.traces[1].markers[0].text, vec!["sor", "2.5000"]);
        assert_eq!(chart.traces[1].color, "#6495ed");
        assert_eq!(chart.center, Some(GeoPoint { lat: 45.7, lon: -73.4 }));
    }

    #[test]
    fn test_center_falls_back_to_mean() {
        let catalog = StationCatalog::st_lawrence();
        let ctx = ChartContext { catalog: &catalog };
        let t = Table::from_rows(
            "events",
            columns(),
            vec![
                row("Sorel", "sor", Value::Float(46.0), Value::Float(-74.0), 1.0),
                row("Sorel", "sor", Value::Float(48.0), Value::Float(-72.0), 1.0),
            ],
        )
        .unwrap();
        let chart = geo_scatter(&t, &params(), "map", ctx).unwrap();
        assert_eq!(chart.center, Some(GeoPoint { lat: 47.0, lon: -73.0 }));
    }
}
