//! Stable group-by with sum/mean/count reducers.

use crate::error::{AnalyticsError, AnalyticsResult};
use std::collections::HashMap;
use stockflow_table::{Table, TableResult, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggregationKind {
    Sum,
    Average,
    /// Number of non-null values.
    Count,
}

/// One reduced output column of [`group_by`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggSpec {
    pub kind: AggregationKind,
    pub column: String,
    pub name: Option<String>,
}

impl AggSpec {
    pub fn sum(column: impl Into<String>) -> Self {
        Self::new(AggregationKind::Sum, column)
    }

    pub fn average(column: impl Into<String>) -> Self {
        Self::new(AggregationKind::Average, column)
    }

    pub fn count(column: impl Into<String>) -> Self {
        Self::new(AggregationKind::Count, column)
    }

    fn new(kind: AggregationKind, column: impl Into<String>) -> Self {
        Self {
            kind,
            column: column.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The output column name.
    pub fn output_name(&self) -> String {
        match (&self.name, self.kind) {
            (Some(name), _) => name.clone(),
            (None, AggregationKind::Average) => format!("{}_mean", self.column),
            (None, _) => self.column.clone(),
        }
    }
}

/// Running state of a single reducer.
#[derive(Clone, Debug)]
pub(crate) enum Accumulator {
    Sum {
        int: i64,
        float: f64,
        saw_float: bool,
    },
    Average {
        total: f64,
        count: usize,
    },
    Count(usize),
}

#[derive(Debug)]
pub(crate) enum UpdateError {
    NonNumeric,
    Overflow,
}

impl Accumulator {
    pub(crate) fn new(kind: AggregationKind) -> Self {
        match kind {
            AggregationKind::Sum => Accumulator::Sum {
                int: 0,
                float: 0.0,
                saw_float: false,
            },
            AggregationKind::Average => Accumulator::Average {
                total: 0.0,
                count: 0,
            },
            AggregationKind::Count => Accumulator::Count(0),
        }
    }

    pub(crate) fn update(&mut self, value: &Value) -> Result<(), UpdateError> {
        if value.is_null() {
            return Ok(());
        }
        match self {
            Accumulator::Count(n) => *n += 1,
            Accumulator::Sum {
                int,
                float,
                saw_float,
            } => match value {
                Value::Integer(v) => *int = int.checked_add(*v).ok_or(UpdateError::Overflow)?,
                Value::Number(v) => {
                    *float += v.0;
                    *saw_float = true;
                }
                _ => return Err(UpdateError::NonNumeric),
            },
            Accumulator::Average { total, count } => {
                let v = value.as_f64().ok_or(UpdateError::NonNumeric)?;
                *total += v;
                *count += 1;
            }
        }
        Ok(())
    }

    pub(crate) fn finish(&self) -> Value {
        match self {
            Accumulator::Sum {
                int,
                float,
                saw_float,
            } => {
                if *saw_float {
                    Value::from(*int as f64 + *float)
                } else {
                    Value::Integer(*int)
                }
            }
            Accumulator::Average { count: 0, .. } => Value::Null,
            Accumulator::Average { total, count } => Value::from(*total / *count as f64),
            Accumulator::Count(n) => Value::Integer(*n as i64),
        }
    }
}

/// Reduce every value of `column` with one accumulator.
pub(crate) fn reduce_column(
    table: &Table,
    column: &str,
    kind: AggregationKind,
) -> AnalyticsResult<Value> {
    let idx = table.require_column(column)?;
    let mut acc = Accumulator::new(kind);
    for (row, value) in table.column_values(idx).enumerate() {
        acc.update(value)
            .map_err(|err| update_error(table, column, row, value, err))?;
    }
    Ok(acc.finish())
}

pub(crate) fn update_error(
    table: &Table,
    column: &str,
    row: usize,
    value: &Value,
    err: UpdateError,
) -> AnalyticsError {
    match err {
        UpdateError::NonNumeric => AnalyticsError::NonNumeric {
            table: table.name().to_string(),
            column: column.to_string(),
            row,
            value: value.clone(),
            kind: value.type_name(),
        },
        UpdateError::Overflow => AnalyticsError::ArithmeticOverflow {
            column: column.to_string(),
            row,
        },
    }
}

/// Group `table` by `key` and reduce each group with `aggs`.
///
/// Output columns are `key` followed by one column per [`AggSpec`]. Groups appear in the order
/// their key first occurs in `table`. Rows with a null key belong to no group.
pub fn group_by(table: &Table, key: &str, aggs: &[AggSpec]) -> AnalyticsResult<Table> {
    let key_idx = table.require_column(key)?;
    let agg_idx = aggs
        .iter()
        .map(|agg| table.require_column(&agg.column))
        .collect::<TableResult<Vec<_>>>()?;

    let mut group_index: HashMap<&Value, usize> = HashMap::new();
    let mut keys: Vec<&Value> = Vec::new();
    let mut states: Vec<Vec<Accumulator>> = Vec::new();

    for (row, values) in table.rows().enumerate() {
        let key_value = &values[key_idx];
        if key_value.is_null() {
            continue;
        }
        let group = *group_index.entry(key_value).or_insert_with(|| {
            keys.push(key_value);
            states.push(aggs.iter().map(|agg| Accumulator::new(agg.kind)).collect());
            keys.len() - 1
        });

        for ((acc, &idx), agg) in states[group].iter_mut().zip(&agg_idx).zip(aggs) {
            let value = &values[idx];
            acc.update(value)
                .map_err(|err| update_error(table, &agg.column, row, value, err))?;
        }
    }

    let mut columns = vec![key.to_string()];
    columns.extend(aggs.iter().map(AggSpec::output_name));

    let mut out = Table::new(format!("{}_by_{key}", table.name()), columns)?;
    for (key_value, accs) in keys.into_iter().zip(&states) {
        let mut row = Vec::with_capacity(accs.len() + 1);
        row.push(key_value.clone());
        row.extend(accs.iter().map(Accumulator::finish));
        out.push_row(row)?;
    }

    log::debug!(
        "grouped {} rows of {} into {} group(s) by {key}",
        table.row_count(),
        table.name(),
        out.row_count()
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use stockflow_table::TableError;

    fn table() -> Table {
        let mut t = Table::new("T", vec!["k", "v"]).unwrap();
        for (k, v) in [
            (Value::from("B"), Value::from(1)),
            (Value::from("A"), Value::from(2)),
            (Value::from("B"), Value::Null),
            (Value::Null, Value::from(100)),
            (Value::from("A"), Value::from(4)),
            (Value::from("C"), Value::Null),
        ] {
            t.push_row(vec![k, v]).unwrap();
        }
        t
    }

    #[test]
    fn groups_follow_first_occurrence_and_skip_null_keys() {
        let out = group_by(
            &table(),
            "k",
            &[
                AggSpec::sum("v"),
                AggSpec::average("v"),
                AggSpec::count("v").with_name("n"),
            ],
        )
        .unwrap();

        assert_eq!(out.columns(), ["k", "v", "v_mean", "n"]);
        assert_eq!(
            out.rows().map(<[Value]>::to_vec).collect::<Vec<_>>(),
            vec![
                vec![Value::from("B"), Value::from(1), Value::from(1.0), Value::from(1)],
                vec![Value::from("A"), Value::from(6), Value::from(3.0), Value::from(2)],
                vec![Value::from("C"), Value::from(0), Value::Null, Value::from(0)],
            ]
        );
    }

    #[test]
    fn integer_and_integral_float_keys_share_a_group() {
        let mut t = Table::new("T", vec!["k", "v"]).unwrap();
        t.push_row(vec![1.into(), 10.into()]).unwrap();
        t.push_row(vec![1.0.into(), 5.into()]).unwrap();
        t.push_row(vec![2.5.into(), 1.into()]).unwrap();

        let out = group_by(&t, "k", &[AggSpec::sum("v")]).unwrap();
        assert_eq!(
            out.rows().map(<[Value]>::to_vec).collect::<Vec<_>>(),
            vec![
                vec![Value::Integer(1), Value::from(15)],
                vec![Value::from(2.5), Value::from(1)],
            ]
        );
    }

    #[test]
    fn nan_is_skipped_as_key_and_as_value() {
        let mut t = Table::new("T", vec!["k", "v"]).unwrap();
        t.push_row(vec![f64::NAN.into(), 10.into()]).unwrap();
        t.push_row(vec!["a".into(), f64::NAN.into()]).unwrap();
        t.push_row(vec!["a".into(), 4.0.into()]).unwrap();

        let out = group_by(&t, "k", &[AggSpec::average("v"), AggSpec::count("v")]).unwrap();
        assert_eq!(
            out.rows().map(<[Value]>::to_vec).collect::<Vec<_>>(),
            vec![vec![Value::from("a"), Value::from(4.0), Value::from(1)]]
        );
    }

    #[test]
    fn colliding_output_names_are_rejected() {
        let err = group_by(&table(), "k", &[AggSpec::sum("v"), AggSpec::sum("v")]).unwrap_err();
        assert!(matches!(
            err,
            AnalyticsError::Table(TableError::DuplicateColumn { .. })
        ));
    }

    #[test]
    fn empty_table_yields_empty_result_with_schema() {
        let t = Table::new("T", vec!["k", "v"]).unwrap();
        let out = group_by(&t, "k", &[AggSpec::sum("v")]).unwrap();
        assert!(out.is_empty());
        assert_eq!(out.columns(), ["k", "v"]);
    }

    #[test]
    fn mixed_sum_promotes_to_number() {
        let mut t = Table::new("T", vec!["k", "v"]).unwrap();
        t.push_row(vec!["a".into(), 1.into()]).unwrap();
        t.push_row(vec!["a".into(), 0.5.into()]).unwrap();
        let out = group_by(&t, "k", &[AggSpec::sum("v")]).unwrap();
        assert_eq!(out.value(0, "v"), Some(&Value::from(1.5)));
    }

    #[test]
    fn text_values_cannot_be_summed() {
        let mut t = Table::new("T", vec!["k", "v"]).unwrap();
        t.push_row(vec!["a".into(), "x".into()]).unwrap();
        let err = group_by(&t, "k", &[AggSpec::sum("v")]).unwrap_err();
        assert!(matches!(err, AnalyticsError::NonNumeric { .. }));
    }

    #[test]
    fn unknown_columns_are_configuration_errors() {
        assert!(group_by(&table(), "missing", &[]).is_err());
        assert!(group_by(&table(), "k", &[AggSpec::average("missing")]).is_err());
    }
}
