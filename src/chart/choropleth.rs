use super::spec::{Choropleth, ChoroplethFrame, ChoroplethRegion, ColorAxis};
use super::{frames, log_skipped, num, text};
use crate::color::ContinuousScale;
use crate::data::model::Table;
use crate::error::ChartError;

#[derive(Debug, Clone, PartialEq)]
pub struct ChoroplethParams<'a> {
    /// ISO-3166 alpha-3 codes.
    pub location: &'a str,
    pub name: &'a str,
    pub value: &'a str,
    pub hover: Vec<&'a str>,
    pub scale: ContinuousScale,
    pub frame: Option<&'a str>,
}

/// Regions coloured by `value`; one colour axis spans every frame.
pub fn choropleth(table: &Table, params: &ChoroplethParams<'_>, title: &str) -> Result<Choropleth, ChartError> {
    let location = table.column_index(params.location)?;
    let name = table.column_index(params.name)?;
    let value = table.column_index(params.value)?;
    let hover = params
        .hover
        .iter()
        .map(|c| table.column_index(c).map(|i| (*c, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let rows: Vec<usize> = (0..table.len())
        .filter(|&r| {
            let row = &table.rows()[r];
            text(row, location).is_some() && num(row, value).is_some()
        })
        .collect();
    log_skipped(title, table.len() - rows.len());

    let color_axis = ColorAxis::new(
        params.value,
        params.scale,
        rows.iter().filter_map(|&r| num(&table.rows()[r], value)),
        None,
    )
    .ok_or_else(|| ChartError::NoData(title.to_string()))?;

    let out = frames(table, rows, params.frame)?
        .into_iter()
        .map(|(key, frame_rows)| {
            let regions = frame_rows
                .iter()
                .filter_map(|&r| {
                    let row = &table.rows()[r];
                    let v = num(row, value)?;
                    let code = text(row, location)?;
                    Some(ChoroplethRegion {
                        name: text(row, name).unwrap_or_else(|| code.clone()),
                        location: code,
                        value: v,
                        fill: color_axis.color_for(v),
                        hover: hover
                            .iter()
                            .map(|(field, i)| (field.to_string(), row[*i].to_string()))
                            .collect(),
                    })
                })
                .collect();
            ChoroplethFrame { key, regions }
        })
        .collect();

    Ok(Choropleth {
        title: title.to_string(),
        color_axis,
        frames: out,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Value;

    #[test]
    fn test_animated_frames_share_axis() {
        let t = Table::from_rows(
            "whd",
            vec!["iso_alpha".into(), "Country".into(), "score".into(), "Year".into()],
            vec![
                vec!["FIN".into(), "Finland".into(), Value::Float(7.8), Value::Integer(2019)],
                vec!["TCD".into(), "Chad".into(), Value::Float(4.0), Value::Integer(2018)],
                vec![Value::Null, "Kosovo".into(), Value::Float(6.0), Value::Integer(2018)],
            ],
        )
        .unwrap();
        let params = ChoroplethParams {
            location: "iso_alpha",
            name: "Country",
            value: "score",
            hover: vec!["Year"],
            scale: ContinuousScale::RdBu,
            frame: Some("Year"),
        };
        let chart = choropleth(&t, &params, "map").unwrap();
        assert_eq!(chart.frames.len(), 2);
        assert_eq!(chart.frames[0].key.as_deref(), Some("2018"));
        assert_eq!(chart.frames[0].regions.len(), 1);
        assert_eq!(chart.color_axis.min, 4.0);
        assert_eq!(chart.color_axis.max, 7.8);
        let fin = &chart.frames[1].regions[0];
        assert_eq!(fin.location, "FIN");
        assert_eq!(fin.fill, "#053061");
        assert_eq!(fin.hover, vec![("Year".to_string(), "2019".to_string())]);
    }
}
