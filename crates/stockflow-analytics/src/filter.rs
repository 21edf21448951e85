//! Row predicates of the form `column <op> literal`.

use crate::error::{AnalyticsError, AnalyticsResult};
use std::cmp::Ordering;
use std::fmt;
use stockflow_table::{Table, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl Comparison {
    fn holds(self, ord: Ordering) -> bool {
        match self {
            Comparison::Lt => ord == Ordering::Less,
            Comparison::Le => ord != Ordering::Greater,
            Comparison::Gt => ord == Ordering::Greater,
            Comparison::Ge => ord != Ordering::Less,
            Comparison::Eq => ord == Ordering::Equal,
            Comparison::Ne => ord != Ordering::Equal,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Comparison::Lt => "<",
            Comparison::Le => "<=",
            Comparison::Gt => ">",
            Comparison::Ge => ">=",
            Comparison::Eq => "==",
            Comparison::Ne => "!=",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub op: Comparison,
    pub literal: Value,
}

impl Predicate {
    pub fn new(column: impl Into<String>, op: Comparison, literal: impl Into<Value>) -> Self {
        Self {
            column: column.into(),
            op,
            literal: literal.into(),
        }
    }

    pub fn lt(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Lt, literal)
    }

    pub fn ge(column: impl Into<String>, literal: impl Into<Value>) -> Self {
        Self::new(column, Comparison::Ge, literal)
    }

    /// Evaluate against one cell.
    ///
    /// Nulls never match. `None` means the cell cannot be compared with the literal.
    pub fn test(&self, value: &Value) -> Option<bool> {
        if value.is_null() {
            return Some(false);
        }
        let ord = value.partial_cmp_value(&self.literal)?;
        Some(self.op.holds(ord))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.column, self.op.symbol(), self.literal)
    }
}

/// The rows of `table` satisfying `predicate`, in their original order.
///
/// An empty result is a normal outcome.
pub fn filter_rows(table: &Table, predicate: &Predicate) -> AnalyticsResult<Table> {
    let idx = table.require_column(&predicate.column)?;

    let mut keep = Vec::new();
    for (row, value) in table.column_values(idx).enumerate() {
        match predicate.test(value) {
            Some(true) => keep.push(row),
            Some(false) => {}
            None => {
                return Err(AnalyticsError::Incomparable {
                    table: table.name().to_string(),
                    column: predicate.column.clone(),
                    row,
                    value: value.clone(),
                    literal: predicate.literal.clone(),
                })
            }
        }
    }

    log::debug!(
        "filter {predicate} kept {} of {} rows",
        keep.len(),
        table.row_count()
    );
    Ok(table.take_rows(&keep))
}
