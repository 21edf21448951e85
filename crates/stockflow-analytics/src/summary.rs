use crate::aggregate::{reduce_column, AggregationKind};
use crate::error::AnalyticsResult;
use std::collections::HashSet;
use stockflow_table::{Table, Value};

/// Process-wide totals over the joined table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Totals {
    /// Distinct non-null join-key values.
    pub distinct_keys: usize,
    pub total_ordered: Value,
    pub total_shipped: Value,
}

/// Number of distinct non-null values in `column`.
pub fn distinct_count(table: &Table, column: &str) -> AnalyticsResult<usize> {
    let idx = table.require_column(column)?;
    let distinct: HashSet<&Value> = table
        .column_values(idx)
        .filter(|v| !v.is_null())
        .collect();
    Ok(distinct.len())
}

/// Sum of the non-null values of `column`; `0` for an empty column.
pub fn column_sum(table: &Table, column: &str) -> AnalyticsResult<Value> {
    reduce_column(table, column, AggregationKind::Sum)
}

pub fn summarize(
    table: &Table,
    key: &str,
    ordered: &str,
    shipped: &str,
) -> AnalyticsResult<Totals> {
    Ok(Totals {
        distinct_keys: distinct_count(table, key)?,
        total_ordered: column_sum(table, ordered)?,
        total_shipped: column_sum(table, shipped)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_over_duplicated_keys() {
        let mut t =
            Table::new("T", vec!["ProductID", "QuantityOrdered", "QuantityShipped"]).unwrap();
        t.push_row(vec![1.into(), 40.into(), 50.into()]).unwrap();
        t.push_row(vec![1.into(), 10.into(), 5.into()]).unwrap();
        t.push_row(vec![2.into(), Value::Null, 60.into()]).unwrap();

        let totals = summarize(&t, "ProductID", "QuantityOrdered", "QuantityShipped").unwrap();
        assert_eq!(
            totals,
            Totals {
                distinct_keys: 2,
                total_ordered: Value::from(50),
                total_shipped: Value::from(115),
            }
        );
    }

    #[test]
    fn distinct_count_folds_integral_floats() {
        let mut t = Table::new("T", vec!["k"]).unwrap();
        for key in [Value::from(1), Value::from(1.0), Value::from(2), Value::from(f64::NAN)] {
            t.push_row(vec![key]).unwrap();
        }
        assert_eq!(distinct_count(&t, "k").unwrap(), 2);
    }

    #[test]
    fn empty_table_has_zero_totals() {
        let t = Table::new("T", vec!["k", "o", "s"]).unwrap();
        let totals = summarize(&t, "k", "o", "s").unwrap();
        assert_eq!(totals.distinct_keys, 0);
        assert_eq!(totals.total_ordered, Value::from(0));
        assert_eq!(totals.total_shipped, Value::from(0));
    }
}
