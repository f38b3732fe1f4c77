use serde::Serialize;

use super::model::{Table, Value};
use crate::error::TransformError;

// ---------------------------------------------------------------------------
// Row predicates
// ---------------------------------------------------------------------------

/// A single-column row predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowFilter {
    /// Keep rows whose cell equals the value.
    Equals { column: String, value: Value },
    /// Keep rows whose cell differs from the value. Nulls are dropped.
    NotEquals { column: String, value: Value },
    /// Keep rows whose numeric cell is strictly greater than the threshold.
    /// Nulls and text cells are dropped.
    GreaterThan { column: String, threshold: f64 },
}

impl RowFilter {
    pub fn column(&self) -> &str {
        match self {
            RowFilter::Equals { column, .. }
            | RowFilter::NotEquals { column, .. }
            | RowFilter::GreaterThan { column, .. } => column,
        }
    }

    fn matches(&self, cell: &Value) -> bool {
        match self {
            RowFilter::Equals { value, .. } => cell == value || numeric_eq(cell, value),
            RowFilter::NotEquals { value, .. } => {
                !cell.is_null() && cell != value && !numeric_eq(cell, value)
            }
            RowFilter::GreaterThan { threshold, .. } => {
                cell.as_f64().is_some_and(|v| v > *threshold)
            }
        }
    }
}

/// `2019` and `2019.0` compare equal.
fn numeric_eq(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Return indices of rows that pass the filter.
pub fn filtered_indices(table: &Table, filter: &RowFilter) -> Result<Vec<usize>, TransformError> {
    let idx = table.column_index(filter.column())?;
    Ok(table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(&row[idx]))
        .map(|(i, _)| i)
        .collect())
}

/// A new table holding only the rows that pass the filter.
pub fn apply_filter(table: &Table, filter: &RowFilter) -> Result<Table, TransformError> {
    let keep = filtered_indices(table, filter)?;
    log::debug!(
        "filter on '{}' kept {}/{} rows of '{}'",
        filter.column(),
        keep.len(),
        table.len(),
        table.name
    );
    Ok(table.select_rows(&keep))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn happiness() -> Table {
        Table::from_rows(
            "whd",
            vec!["Country".into(), "Year".into(), "Score".into()],
            vec![
                vec!["Norway".into(), Value::Integer(2015), Value::Float(7.5)],
                vec!["Norway".into(), Value::Integer(2019), Value::Float(7.55)],
                vec!["Chad".into(), Value::Integer(2019), Value::Float(4.35)],
                vec!["Peru".into(), Value::Integer(2019), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_equals_matches_numeric_across_types() {
        let f = RowFilter::Equals {
            column: "Year".into(),
            value: Value::Float(2019.0),
        };
        assert_eq!(filtered_indices(&happiness(), &f).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_greater_than_drops_nulls() {
        let f = RowFilter::GreaterThan {
            column: "Score".into(),
            threshold: 5.0,
        };
        let t = apply_filter(&happiness(), &f).unwrap();
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_not_equals() {
        let f = RowFilter::NotEquals {
            column: "Country".into(),
            value: "Norway".into(),
        };
        assert_eq!(filtered_indices(&happiness(), &f).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_unknown_column_is_error() {
        let f = RowFilter::GreaterThan {
            column: "GDP".into(),
            threshold: 0.0,
        };
        assert!(filtered_indices(&happiness(), &f).is_err());
    }
}
