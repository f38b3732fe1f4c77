use std::fmt;

use serde::Serialize;

use crate::error::TransformError;

// ---------------------------------------------------------------------------
// Value – a single cell of a table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the dtypes found in the source
/// files. Frames group rows in a `BTreeMap` and tables sort by value, so
/// `Value` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so Value can key a BTreeMap --
// Equality is defined by `cmp`, so floats compare with `total_cmp`.

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            // Mixed numeric columns sort by magnitude, integers first on ties.
            (Integer(a), Float(b)) => (*a as f64).total_cmp(b).then(Ordering::Less),
            (Float(a), Integer(b)) => a.total_cmp(&(*b as f64)).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::String(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl Value {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Best-effort type inference for a raw text cell.
    pub fn guess(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || matches!(trimmed, "NA" | "NaN" | "nan" | "null") {
            return Value::Null;
        }
        if let Ok(i) = trimmed.parse::<i64>() {
            return Value::Integer(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Value::Float(f);
        }
        match trimmed {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            _ => Value::String(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Table – a row-major in-memory table
// ---------------------------------------------------------------------------

/// A loaded or derived table. Rows always have one cell per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table, checking every row against the header width.
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self, TransformError> {
        let mut table = Table::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<(), TransformError> {
        if row.len() != self.columns.len() {
            return Err(TransformError::RaggedRow {
                row: self.rows.len(),
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Result<usize, TransformError> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| TransformError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// All cells of one column, in row order.
    pub fn values(&self, column: &str) -> Result<Vec<&Value>, TransformError> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|r| &r[idx]).collect())
    }

    /// A fully numeric column. Nulls and text cells are errors.
    pub fn numeric(&self, column: &str) -> Result<Vec<f64>, TransformError> {
        let idx = self.column_index(column)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, r)| {
                r[idx].as_f64().ok_or_else(|| TransformError::NotNumeric {
                    column: column.to_string(),
                    row,
                    value: r[idx].to_string(),
                })
            })
            .collect()
    }

    /// Replace an existing column or append a new one.
    pub fn set_column(&mut self, column: &str, values: Vec<Value>) -> Result<(), TransformError> {
        if values.len() != self.rows.len() {
            return Err(TransformError::RaggedRow {
                row: values.len().min(self.rows.len()),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        match self.columns.iter().position(|c| c == column) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(column.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(())
    }

    pub fn drop_columns(&mut self, columns: &[String]) -> Result<(), TransformError> {
        let mut indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>, _>>()?;
        indices.sort_unstable();
        indices.dedup();
        for idx in indices.into_iter().rev() {
            self.columns.remove(idx);
            for row in &mut self.rows {
                row.remove(idx);
            }
        }
        Ok(())
    }

    /// Keep only rows whose indices are listed, preserving their order.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    /// Stable sort by one column (nulls first).
    pub fn sort_by_column(&mut self, column: &str) -> Result<(), TransformError> {
        let idx = self.column_index(column)?;
        self.rows.sort_by(|a, b| a[idx].cmp(&b[idx]));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_rows(
            "sample",
            vec!["station".into(), "max".into()],
            vec![
                vec!["Sorel".into(), Value::Float(2.5)],
                vec!["Batiscan".into(), Value::Integer(3)],
                vec!["Sorel".into(), Value::Null],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_guess_types() {
        assert_eq!(Value::guess("12"), Value::Integer(12));
        assert_eq!(Value::guess("1.5"), Value::Float(1.5));
        assert_eq!(Value::guess(""), Value::Null);
        assert_eq!(Value::guess("NaN"), Value::Null);
        assert_eq!(Value::guess("True"), Value::Bool(true));
        assert_eq!(Value::guess("Rock"), Value::String("Rock".into()));
    }

    #[test]
    fn test_ragged_row_rejected() {
        let mut t = Table::new("t", vec!["a".into(), "b".into()]);
        let err = t.push_row(vec![Value::Integer(1)]).unwrap_err();
        assert!(matches!(err, TransformError::RaggedRow { expected: 2, found: 1, .. }));
    }

    #[test]
    fn test_numeric_rejects_null() {
        let err = sample().numeric("max").unwrap_err();
        assert!(matches!(err, TransformError::NotNumeric { row: 2, .. }));
    }

    #[test]
    fn test_missing_column() {
        let err = sample().values("min").unwrap_err();
        assert_eq!(
            err,
            TransformError::MissingColumn {
                table: "sample".into(),
                column: "min".into()
            }
        );
    }

    #[test]
    fn test_set_and_drop_columns() {
        let mut t = sample();
        t.set_column("days", vec![Value::Float(1.0); 3]).unwrap();
        assert_eq!(t.columns(), &["station", "max", "days"]);
        t.drop_columns(&["max".to_string()]).unwrap();
        assert_eq!(t.columns(), &["station", "days"]);
        assert_eq!(t.rows()[1], vec![Value::from("Batiscan"), Value::Float(1.0)]);
    }

    #[test]
    fn test_sort_is_stable_and_numeric() {
        let mut t = Table::from_rows(
            "t",
            vec!["rank".into(), "id".into()],
            vec![
                vec![Value::Integer(2), Value::Integer(0)],
                vec![Value::Float(1.5), Value::Integer(1)],
                vec![Value::Integer(2), Value::Integer(2)],
            ],
        )
        .unwrap();
        t.sort_by_column("rank").unwrap();
        let ids: Vec<_> = t.values("id").unwrap().into_iter().cloned().collect();
        assert_eq!(ids, vec![Value::Integer(1), Value::Integer(0), Value::Integer(2)]);
    }

    #[test]
    fn test_equality_agrees_with_ordering() {
        use std::cmp::Ordering;
        use std::collections::BTreeMap;

        let pairs = [
            (Value::Float(0.0), Value::Float(-0.0)),
            (Value::Float(f64::NAN), Value::Float(f64::NAN)),
            (Value::Integer(1), Value::Float(1.0)),
            (Value::from("a"), Value::from("a")),
        ];
        for (a, b) in &pairs {
            assert_eq!(a == b, a.cmp(b) == Ordering::Equal, "{a:?} vs {b:?}");
        }
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));

        let mut keys = BTreeMap::new();
        keys.insert(Value::Float(0.0), 1);
        keys.insert(Value::Float(-0.0), 2);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys.get(&Value::Float(0.0)), Some(&1));
    }
}
