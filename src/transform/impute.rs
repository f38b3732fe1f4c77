//! Missing-value imputation.

use crate::data::model::{Table, Value};
use crate::error::TransformError;
use crate::transform::standardize::mean;

/// Fill nulls with the column mean rounded half-to-even. Returns the fill
/// value, or `None` when nothing needed filling.
pub fn fill_mean_rounded(table: &mut Table, column: &str) -> Result<Option<f64>, TransformError> {
    let cells = table.values(column)?;
    let mut present = Vec::with_capacity(cells.len());
    for (row, cell) in cells.iter().enumerate() {
        match cell {
            Value::Null => {}
            other => present.push(other.as_f64().ok_or_else(|| TransformError::NotNumeric {
                column: column.to_string(),
                row,
                value: other.to_string(),
            })?),
        }
    }
    if present.len() == cells.len() {
        return Ok(None);
    }
    let fill = mean(&present)
        .ok_or_else(|| TransformError::DegenerateDistribution {
            column: column.to_string(),
        })?
        .round_ties_even();

    let filled: Vec<Value> = cells
        .into_iter()
        .map(|c| if c.is_null() { Value::Float(fill) } else { c.clone() })
        .collect();
    log::debug!("imputed '{column}' nulls with {fill}");
    table.set_column(column, filled)?;
    Ok(Some(fill))
}

/// Fill nulls with a constant. Returns the number of cells filled.
pub fn fill_constant(table: &mut Table, column: &str, value: &Value) -> Result<usize, TransformError> {
    let cells = table.values(column)?;
    let missing = cells.iter().filter(|c| c.is_null()).count();
    if missing == 0 {
        return Ok(0);
    }
    let filled: Vec<Value> = cells
        .into_iter()
        .map(|c| if c.is_null() { value.clone() } else { c.clone() })
        .collect();
    table.set_column(column, filled)?;
    Ok(missing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn survey() -> Table {
        Table::from_rows(
            "survey",
            vec!["Age".into(), "Composer".into()],
            vec![
                vec![Value::Integer(18), "Yes".into()],
                vec![Value::Null, Value::Null],
                vec![Value::Integer(21), "No".into()],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_fill_mean_rounds_half_to_even() {
        let mut t = survey();
        // mean(18, 21) = 19.5 → 20
        assert_eq!(fill_mean_rounded(&mut t, "Age").unwrap(), Some(20.0));
        assert_eq!(t.rows()[1][0], Value::Float(20.0));
        assert_eq!(t.rows()[0][0], Value::Integer(18));
    }

    #[test]
    fn test_fill_mean_noop_without_nulls() {
        let mut t = survey();
        fill_mean_rounded(&mut t, "Age").unwrap();
        let before = t.clone();
        assert_eq!(fill_mean_rounded(&mut t, "Age").unwrap(), None);
        assert_eq!(t, before);
    }

    #[test]
    fn test_fill_mean_rejects_text() {
        let mut t = survey();
        assert_eq!(
            fill_mean_rounded(&mut t, "Composer").unwrap_err().to_string(),
            "column 'Composer', row 0: 'Yes' is not numeric"
        );
    }

    #[test]
    fn test_fill_constant() {
        let mut t = survey();
        assert_eq!(fill_constant(&mut t, "Composer", &"No".into()).unwrap(), 1);
        assert_eq!(t.rows()[1][1], Value::from("No"));
        assert_eq!(fill_constant(&mut t, "Composer", &"No".into()).unwrap(), 0);
    }

    #[test]
    fn test_all_null_column_is_degenerate() {
        let mut t = Table::from_rows("t", vec!["Age".into()], vec![vec![Value::Null]]).unwrap();
        assert!(matches!(
            fill_mean_rounded(&mut t, "Age"),
            Err(TransformError::DegenerateDistribution { .. })
        ));
    }
}
