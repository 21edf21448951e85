//! Inner equality joins.
//!
//! [`hash_join`] is the building block: it is generic over the row types on both sides and
//! takes one key-extraction closure per side. Rows whose key is `None` never match. Table-level
//! joins ([`Table::inner_join`], [`join_all`]) resolve column names once and then delegate to it.
//!
//! Inner-join semantics drop every left row without a partner. That loss is part of the
//! contract: [`JoinOutcome::dropped_rows`] counts it and it is logged at `warn` level.

use crate::error::{TableError, TableResult};
use crate::table::Table;
use crate::value::Value;
use std::collections::HashMap;
use std::hash::Hash;

/// Matching row pairs produced by [`hash_join`].
///
/// Pairs are ordered by left row, then by right row within the same left row.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinIndices {
    pub left_indices: Vec<usize>,
    pub right_indices: Vec<usize>,
}

impl JoinIndices {
    pub fn len(&self) -> usize {
        self.left_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left_indices.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.left_indices
            .iter()
            .copied()
            .zip(self.right_indices.iter().copied())
    }
}

/// Hash join two row slices on extracted keys.
///
/// Produces the full cross-product for duplicate keys.
pub fn hash_join<L, R, K>(
    left: &[L],
    right: &[R],
    left_key: impl Fn(&L) -> Option<K>,
    right_key: impl Fn(&R) -> Option<K>,
) -> JoinIndices
where
    K: Eq + Hash,
{
    let mut index: HashMap<K, Vec<usize>> = HashMap::new();
    for (row, item) in right.iter().enumerate() {
        if let Some(key) = right_key(item) {
            index.entry(key).or_default().push(row);
        }
    }

    let mut out = JoinIndices::default();
    for (row, item) in left.iter().enumerate() {
        let Some(key) = left_key(item) else {
            continue;
        };
        let Some(matches) = index.get(&key) else {
            continue;
        };
        for &r in matches {
            out.left_indices.push(row);
            out.right_indices.push(r);
        }
    }
    out
}

/// Typed inner join returning cloned `(left, right)` pairs.
pub fn inner_join_by<L, R, K>(
    left: &[L],
    right: &[R],
    left_key: impl Fn(&L) -> K,
    right_key: impl Fn(&R) -> K,
) -> Vec<(L, R)>
where
    L: Clone,
    R: Clone,
    K: Eq + Hash,
{
    hash_join(left, right, |l| Some(left_key(l)), |r| Some(right_key(r)))
        .pairs()
        .map(|(l, r)| (left[l].clone(), right[r].clone()))
        .collect()
}

/// Result of a table-level join.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinOutcome {
    pub table: Table,
    /// Left-side rows removed because some joined table had no row with the same key.
    pub dropped_rows: usize,
}

impl Table {
    /// Inner join `self` with `other` on the column `key`.
    ///
    /// The output keeps `self`'s name, all of `self`'s columns, then `other`'s columns except
    /// the key. A column of `other` whose name is already taken is renamed
    /// `<other name>.<column>`.
    pub fn inner_join(&self, other: &Table, key: &str) -> TableResult<JoinOutcome> {
        let left_key = self.require_column(key)?;
        let right_key = other.require_column(key)?;

        let indices = hash_join(
            self.raw_rows(),
            other.raw_rows(),
            |row: &Vec<Value>| non_null(&row[left_key]),
            |row: &Vec<Value>| non_null(&row[right_key]),
        );

        let carried: Vec<usize> = (0..other.column_count())
            .filter(|&idx| idx != right_key)
            .collect();

        let mut columns: Vec<String> = self.columns().to_vec();
        for &idx in &carried {
            let name = &other.columns()[idx];
            if columns.iter().any(|c| c == name) {
                columns.push(format!("{}.{}", other.name(), name));
            } else {
                columns.push(name.clone());
            }
        }

        let mut table = Table::new(self.name(), columns)?;
        for (l, r) in indices.pairs() {
            let right_row = &other.raw_rows()[r];
            let mut row = self.raw_rows()[l].clone();
            row.extend(carried.iter().map(|&idx| right_row[idx].clone()));
            table.push_row(row)?;
        }

        let dropped_rows = count_unmatched(self.row_count(), &indices);
        if dropped_rows > 0 {
            log::warn!(
                "inner join {} x {} on {key} dropped {dropped_rows} unmatched row(s)",
                self.name(),
                other.name()
            );
        }
        log::debug!(
            "joined {} ({} rows) with {} ({} rows) into {} rows",
            self.name(),
            self.row_count(),
            other.name(),
            other.row_count(),
            table.row_count()
        );

        Ok(JoinOutcome {
            table,
            dropped_rows,
        })
    }
}

/// Joins N tables on one shared key column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetJoiner {
    key: String,
}

impl DatasetJoiner {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn join(&self, tables: &[Table]) -> TableResult<JoinOutcome> {
        join_all(tables, &self.key)
    }
}

/// Join two or more tables on `key`, left to right.
///
/// The key must exist in every table; this is checked before any rows are joined.
pub fn join_all(tables: &[Table], key: &str) -> TableResult<JoinOutcome> {
    let [first, rest @ ..] = tables else {
        return Err(TableError::NotEnoughTables(0));
    };
    if rest.is_empty() {
        return Err(TableError::NotEnoughTables(1));
    }
    for table in tables {
        table.require_column(key)?;
    }

    let mut acc = JoinOutcome {
        table: first.clone(),
        dropped_rows: 0,
    };
    for table in rest {
        let step = acc.table.inner_join(table, key)?;
        acc = JoinOutcome {
            table: step.table,
            dropped_rows: acc.dropped_rows + step.dropped_rows,
        };
    }
    Ok(acc)
}

fn non_null(value: &Value) -> Option<Value> {
    (!value.is_null()).then(|| value.clone())
}

fn count_unmatched(left_rows: usize, indices: &JoinIndices) -> usize {
    let mut matched = vec![false; left_rows];
    for &l in &indices.left_indices {
        matched[l] = true;
    }
    matched.iter().filter(|m| !**m).count()
}
