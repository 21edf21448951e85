//! Row-wise derived columns.

use crate::error::{AnalyticsError, AnalyticsResult};
use stockflow_table::{Table, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
}

impl BinaryOp {
    fn apply_i64(self, a: i64, b: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => a.checked_add(b),
            BinaryOp::Subtract => a.checked_sub(b),
            BinaryOp::Multiply => a.checked_mul(b),
        }
    }

    fn apply_f64(self, a: f64, b: f64) -> f64 {
        match self {
            BinaryOp::Add => a + b,
            BinaryOp::Subtract => a - b,
            BinaryOp::Multiply => a * b,
        }
    }
}

/// `name = left <op> right`, evaluated per row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedColumn {
    pub name: String,
    pub op: BinaryOp,
    pub left: String,
    pub right: String,
}

impl DerivedColumn {
    pub fn new(
        name: impl Into<String>,
        left: impl Into<String>,
        op: BinaryOp,
        right: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            op,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn difference(
        name: impl Into<String>,
        minuend: impl Into<String>,
        subtrahend: impl Into<String>,
    ) -> Self {
        Self::new(name, minuend, BinaryOp::Subtract, subtrahend)
    }

    pub fn sum(name: impl Into<String>, left: impl Into<String>, right: impl Into<String>) -> Self {
        Self::new(name, left, BinaryOp::Add, right)
    }

    pub fn product(
        name: impl Into<String>,
        left: impl Into<String>,
        right: impl Into<String>,
    ) -> Self {
        Self::new(name, left, BinaryOp::Multiply, right)
    }

    /// Evaluate this column for every row of `table`.
    pub fn evaluate(&self, table: &Table) -> AnalyticsResult<Vec<Value>> {
        let left = table.require_column(&self.left)?;
        let right = table.require_column(&self.right)?;

        table
            .rows()
            .enumerate()
            .map(|(row, values)| self.evaluate_cell(table, row, &values[left], &values[right]))
            .collect()
    }

    fn evaluate_cell(
        &self,
        table: &Table,
        row: usize,
        a: &Value,
        b: &Value,
    ) -> AnalyticsResult<Value> {
        for (column, value) in [(&self.left, a), (&self.right, b)] {
            if !value.is_null() && !value.is_numeric() {
                return Err(AnalyticsError::NonNumeric {
                    table: table.name().to_string(),
                    column: column.clone(),
                    row,
                    value: value.clone(),
                    kind: value.type_name(),
                });
            }
        }

        match (a, b) {
            (Value::Integer(a), Value::Integer(b)) => self
                .op
                .apply_i64(*a, *b)
                .map(Value::Integer)
                .ok_or_else(|| AnalyticsError::ArithmeticOverflow {
                    column: self.name.clone(),
                    row,
                }),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => Ok(Value::from(self.op.apply_f64(a, b))),
                _ => Ok(Value::Null),
            },
        }
    }
}

/// Append `columns` to a copy of `table`, in order.
///
/// Each column sees the ones declared before it, so `B = A - x` may follow `A = y - z`.
pub fn derive_columns(table: &Table, columns: &[DerivedColumn]) -> AnalyticsResult<Table> {
    let mut out = table.clone();
    for column in columns {
        let values = column.evaluate(&out)?;
        out = out.with_column(column.name.clone(), values)?;
    }
    log::debug!(
        "derived {} column(s) over {} rows of {}",
        columns.len(),
        out.row_count(),
        out.name()
    );
    Ok(out)
}
