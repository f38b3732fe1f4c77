//! Per-(station, season) event counts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::catalog::StationCatalog;
use crate::data::model::{Table, Value};
use crate::error::TransformError;
use crate::transform::season::Season;

/// Count matrix: one row per station present in the input (in catalog
/// order), one column per season in [`Season::ORDER`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonCounts {
    pub stations: Vec<String>,
    pub counts: Vec<[u64; 4]>,
}

/// Group by station and season and count. Every station must be in the
/// catalog; every season cell must be a season name.
pub fn season_counts(
    table: &Table,
    station_column: &str,
    season_column: &str,
    catalog: &StationCatalog,
) -> Result<SeasonCounts, TransformError> {
    let stations = table.values(station_column)?;
    let seasons = table.values(season_column)?;

    // rank → (name, counts)
    let mut by_rank: BTreeMap<u32, (String, [u64; 4])> = BTreeMap::new();
    for (station, season) in stations.into_iter().zip(seasons) {
        let name = station.to_string();
        let rank = catalog.rank(&name)?;
        let season = season_name(season).ok_or_else(|| TransformError::UnexpectedValue {
            column: season_column.to_string(),
            value: season.to_string(),
        })?;
        let col = Season::ORDER.iter().position(|s| *s == season).unwrap_or(0);
        by_rank.entry(rank).or_insert_with(|| (name, [0; 4])).1[col] += 1;
    }

    let (stations, counts) = by_rank.into_values().unzip();
    Ok(SeasonCounts { stations, counts })
}

fn season_name(v: &Value) -> Option<Season> {
    v.as_str().and_then(Season::from_name)
}
