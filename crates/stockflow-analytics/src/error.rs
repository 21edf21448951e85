use crate::charts::ChartError;
use stockflow_table::{TableError, Value};

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("non-numeric value {value} ({kind}) in {table}[{column}] at row {row}")]
    NonNumeric {
        table: String,
        column: String,
        row: usize,
        value: Value,
        kind: &'static str,
    },

    #[error("cannot compare {table}[{column}] value {value} with {literal} at row {row}")]
    Incomparable {
        table: String,
        column: String,
        row: usize,
        value: Value,
        literal: Value,
    },

    #[error("integer overflow computing {column} at row {row}")]
    ArithmeticOverflow { column: String, row: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Chart(#[from] ChartError),
}
