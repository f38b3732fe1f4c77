use thiserror::Error;

use crate::data::sources::SourceKind;

// ---------------------------------------------------------------------------
// Transform errors
// ---------------------------------------------------------------------------

/// Failures raised while deriving columns from a loaded table.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NotNumeric {
        column: String,
        row: usize,
        value: String,
    },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    #[error("unknown station '{0}'")]
    UnknownStation(String),

    #[error("unknown station label '{0}'")]
    UnknownLabel(String),

    #[error("degenerate distribution in column '{column}': standard deviation is zero")]
    DegenerateDistribution { column: String },

    #[error("column '{column}', row {row}: division by zero")]
    DivisionByZero { column: String, row: usize },

    #[error("column '{column}': unexpected value '{value}'")]
    UnexpectedValue { column: String, value: String },

    #[error("invalid station catalog: {0}")]
    InvalidCatalog(String),

    #[error("source {source_kind} unavailable: {reason}")]
    SourceUnavailable {
        source_kind: SourceKind,
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// Chart errors
// ---------------------------------------------------------------------------

/// Failures raised while mapping a prepared table to a chart description.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("weights in column '{column}' sum to zero")]
    ZeroWeight { column: String },

    #[error("no plottable rows for {0}")]
    NoData(String),

    #[error("invalid chart parameter: {0}")]
    InvalidParameter(String),
}
