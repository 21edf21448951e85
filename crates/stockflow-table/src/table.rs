use crate::error::{TableError, TableResult};
use crate::record::Record;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;

/// An ordered, row-major table with a fixed column schema.
///
/// Every row holds exactly one value per column. Operations that change the shape of a table
/// (`with_column`, `select`, `filter_rows`, joins) return a new table and leave the input alone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// An empty table with the given schema. Column names must be unique.
    pub fn new(name: impl Into<String>, columns: Vec<impl Into<String>>) -> TableResult<Self> {
        let name = name.into();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let mut column_index = HashMap::with_capacity(columns.len());
        for (idx, column) in columns.iter().enumerate() {
            if column_index.insert(column.clone(), idx).is_some() {
                return Err(TableError::DuplicateColumn {
                    table: name,
                    column: column.clone(),
                });
            }
        }

        Ok(Self {
            name,
            columns,
            column_index,
            rows: Vec::new(),
        })
    }

    /// Build a table from statically typed records.
    pub fn from_records<R: Record>(records: impl IntoIterator<Item = R>) -> TableResult<Self> {
        let mut table = Table::new(R::TABLE, R::COLUMNS.to_vec())?;
        for record in records {
            table.push_row(record.into_row())?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> TableResult<()> {
        if row.len() != self.columns.len() {
            return Err(TableError::SchemaMismatch {
                table: self.name.clone(),
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows.push(row);
        Ok(())
    }

    pub fn column_idx(&self, column: &str) -> Option<usize> {
        self.column_index.get(column).copied()
    }

    /// Like [`Table::column_idx`] but reports a missing column as [`TableError::UnknownColumn`].
    pub fn require_column(&self, column: &str) -> TableResult<usize> {
        self.column_idx(column)
            .ok_or_else(|| TableError::UnknownColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_index.contains_key(column)
    }

    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_idx(column)?;
        self.value_by_idx(row, idx)
    }

    pub fn value_by_idx(&self, row: usize, idx: usize) -> Option<&Value> {
        self.rows.get(row)?.get(idx)
    }

    pub fn row(&self, row: usize) -> Option<&[Value]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Value]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    pub(crate) fn raw_rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Iterate the values of one column, top to bottom.
    pub fn column_values(&self, idx: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().filter_map(move |row| row.get(idx))
    }

    /// Return a copy of this table under a different name.
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Append a column, consuming the table.
    pub fn with_column(mut self, name: impl Into<String>, values: Vec<Value>) -> TableResult<Self> {
        let name = name.into();
        if self.column_index.contains_key(&name) {
            return Err(TableError::DuplicateColumn {
                table: self.name.clone(),
                column: name,
            });
        }
        if values.len() != self.rows.len() {
            return Err(TableError::ColumnLengthMismatch {
                table: self.name.clone(),
                column: name,
                expected: self.rows.len(),
                actual: values.len(),
            });
        }

        let idx = self.columns.len();
        self.columns.push(name.clone());
        self.column_index.insert(name, idx);
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(self)
    }

    /// Keep the rows for which `keep` returns true, in their original order.
    pub fn filter_rows(&self, mut keep: impl FnMut(&[Value]) -> bool) -> Table {
        let rows = self
            .rows
            .iter()
            .filter(|row| keep(row.as_slice()))
            .cloned()
            .collect();
        self.with_rows(rows)
    }

    /// Copy out the rows at `indices`, in the order given.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let rows = indices
            .iter()
            .filter_map(|&idx| self.rows.get(idx).cloned())
            .collect();
        self.with_rows(rows)
    }

    /// Project onto the named columns, in the order given.
    pub fn select(&self, columns: &[&str]) -> TableResult<Table> {
        let indices = columns
            .iter()
            .map(|c| self.require_column(c))
            .collect::<TableResult<Vec<_>>>()?;

        let mut out = Table::new(self.name.clone(), columns.to_vec())?;
        out.rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&idx| row[idx].clone()).collect())
            .collect();
        Ok(out)
    }

    /// Number of null cells per column, in schema order.
    pub fn null_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let nulls = self.column_values(idx).filter(|v| v.is_null()).count();
                (name.clone(), nulls)
            })
            .collect()
    }

    pub(crate) fn with_rows(&self, rows: Vec<Vec<Value>>) -> Table {
        Table {
            name: self.name.clone(),
            columns: self.columns.clone(),
            column_index: self.column_index.clone(),
            rows,
        }
    }
}

impl fmt::Display for Table {
    /// Render as an aligned text grid with a leading row-number column.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            return write!(f, "Empty table\nColumns: [{}]", self.columns.join(", "));
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();

        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                cells
                    .iter()
                    .map(|row| row[idx].len())
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, width) in self.columns.iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        for (row_idx, row) in cells.iter().enumerate() {
            write!(f, "\n{row_idx:<index_width$}")?;
            for (cell, width) in row.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn stock_table() -> Table {
        let mut t = Table::new("Inventory", vec!["ProductID", "Warehouse", "Stock"]).unwrap();
        t.push_row(vec![1.into(), "WH1".into(), 150.into()]).unwrap();
        t.push_row(vec![2.into(), "WH2".into(), Value::Null]).unwrap();
        t
    }

    #[test]
    fn push_row_rejects_wrong_width() {
        let mut t = stock_table();
        let err = t.push_row(vec![3.into()]).unwrap_err();
        assert!(matches!(
            err,
            TableError::SchemaMismatch {
                expected: 3,
                actual: 1,
                ..
            }
        ));
        assert_eq!(t.row_count(), 2);
    }

    #[test]
    fn with_column_rejects_duplicates_and_bad_lengths() {
        let err = stock_table()
            .with_column("Stock", vec![1.into(), 2.into()])
            .unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));

        let err = stock_table()
            .with_column("Extra", vec![1.into()])
            .unwrap_err();
        assert!(matches!(err, TableError::ColumnLengthMismatch { .. }));

        let t = stock_table()
            .with_column("Extra", vec![1.into(), 2.into()])
            .unwrap();
        assert_eq!(t.value(1, "Extra"), Some(&Value::from(2)));
    }

    #[test]
    fn select_projects_in_requested_order() {
        let t = stock_table().select(&["Stock", "ProductID"]).unwrap();
        assert_eq!(t.columns(), ["Stock", "ProductID"]);
        assert_eq!(t.row(0).unwrap(), &[Value::from(150), Value::from(1)]);

        let err = stock_table().select(&["Missing"]).unwrap_err();
        assert_eq!(err.to_string(), "unknown column Inventory[Missing]");
    }

    #[test]
    fn duplicate_column_names_are_rejected() {
        let err = Table::new("T", vec!["a", "b", "a"]).unwrap_err();
        assert_eq!(err.to_string(), "duplicate column T[a]");

        let err = stock_table().select(&["Stock", "Stock"]).unwrap_err();
        assert!(matches!(err, TableError::DuplicateColumn { .. }));
    }

    #[test]
    fn null_counts_follow_schema_order() {
        assert_eq!(
            stock_table().null_counts(),
            vec![
                ("ProductID".to_string(), 0),
                ("Warehouse".to_string(), 0),
                ("Stock".to_string(), 1),
            ]
        );
    }

    #[test]
    fn nan_cells_count_as_missing() {
        let mut t = Table::new("T", vec!["x"]).unwrap();
        t.push_row(vec![f64::NAN.into()]).unwrap();
        t.push_row(vec![1.5.into()]).unwrap();
        assert_eq!(t.null_counts(), vec![("x".to_string(), 1)]);
    }

    #[test]
    fn display_aligns_columns() {
        let rendered = stock_table().to_string();
        assert_eq!(
            rendered,
            "   ProductID  Warehouse  Stock\n0          1        WH1    150\n1          2        WH2    NaN"
        );
    }

    #[test]
    fn display_of_empty_table_lists_columns() {
        let t = Table::new("T", vec!["a", "b"]).unwrap();
        assert_eq!(t.to_string(), "Empty table\nColumns: [a, b]");
    }
}
