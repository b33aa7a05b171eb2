use std::collections::HashSet;

use crate::error::{CoreError, Result};
use crate::value::Value;

/// A named column of cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|value| value.is_missing()).count()
    }

    /// Numeric columns hold only numbers or missing cells; an all-missing
    /// column counts as numeric.
    pub fn is_numeric(&self) -> bool {
        !self
            .values
            .iter()
            .any(|value| matches!(value, Value::Text(_)))
    }

    pub fn numbers(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().map(Value::as_f64)
    }
}

/// Column-major table with row labels that survive row selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    index: Vec<usize>,
}

impl Table {
    /// Build a table from equally sized, uniquely named columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(Column::len).unwrap_or(0);
        let mut names = HashSet::new();
        for column in &columns {
            if !names.insert(column.name.as_str()) {
                return Err(CoreError::InvalidTable(format!(
                    "duplicate column name: {}",
                    column.name
                )));
            }
            if column.len() != rows {
                return Err(CoreError::InvalidTable(format!(
                    "column '{}' has {} value(s), expected {}",
                    column.name,
                    column.len(),
                    rows
                )));
            }
        }

        Ok(Self {
            columns,
            index: (0..rows).collect(),
        })
    }

    /// Build a table from row-major records.
    pub fn from_rows(headers: &[&str], rows: Vec<Vec<Value>>) -> Result<Self> {
        let mut columns = headers
            .iter()
            .map(|name| Column::new(*name, Vec::with_capacity(rows.len())))
            .collect::<Vec<_>>();

        for (row_idx, row) in rows.into_iter().enumerate() {
            if row.len() != headers.len() {
                return Err(CoreError::InvalidTable(format!(
                    "row {} has {} value(s), expected {}",
                    row_idx,
                    row.len(),
                    headers.len()
                )));
            }
            for (column, value) in columns.iter_mut().zip(row) {
                column.values.push(value);
            }
        }

        Self::new(columns)
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// A table is empty when it has no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0 || self.n_cols() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|col| col.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }

    pub fn column_mut(&mut self, name: &str) -> Option<&mut Column> {
        self.columns.iter_mut().find(|col| col.name == name)
    }

    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| CoreError::MissingColumn(name.to_string()))
    }

    /// Row labels, in row order.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Replace the row labels, e.g. to carry them over to a derived table.
    pub fn with_index(mut self, index: Vec<usize>) -> Result<Self> {
        if index.len() != self.n_rows() {
            return Err(CoreError::InvalidTable(format!(
                "index has {} label(s), expected {}",
                index.len(),
                self.n_rows()
            )));
        }
        self.index = index;
        Ok(self)
    }

    pub fn value(&self, column: &str, row: usize) -> Option<&Value> {
        self.column(column).and_then(|col| col.values.get(row))
    }

    pub fn row(&self, row: usize) -> Vec<&Value> {
        self.columns
            .iter()
            .filter_map(|col| col.values.get(row))
            .collect()
    }

    /// Replace a cell; fails when the column or row does not exist.
    pub fn set_value(&mut self, column: &str, row: usize, value: Value) -> Result<()> {
        let rows = self.n_rows();
        let col = self
            .column_mut(column)
            .ok_or_else(|| CoreError::MissingColumn(column.to_string()))?;
        let cell = col.values.get_mut(row).ok_or_else(|| {
            CoreError::InvalidTable(format!("row {row} out of bounds for {rows} row(s)"))
        })?;
        *cell = value;
        Ok(())
    }

    /// Add a column, replacing any existing column with the same name.
    pub fn with_column(&mut self, column: Column) -> Result<()> {
        if !self.columns.is_empty() && column.len() != self.n_rows() {
            return Err(CoreError::InvalidTable(format!(
                "column '{}' has {} value(s), expected {}",
                column.name,
                column.len(),
                self.n_rows()
            )));
        }
        if self.columns.is_empty() {
            self.index = (0..column.len()).collect();
        }
        match self.columns.iter_mut().find(|col| col.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    pub fn drop_column(&mut self, name: &str) -> Option<Column> {
        let position = self.columns.iter().position(|col| col.name == name)?;
        let column = self.columns.remove(position);
        if self.columns.is_empty() {
            self.index.clear();
        }
        Some(column)
    }

    /// Select rows by position, keeping their labels.
    pub fn take_rows(&self, positions: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: positions
                    .iter()
                    .filter_map(|pos| col.values.get(*pos).cloned())
                    .collect(),
            })
            .collect();
        let index = positions
            .iter()
            .filter_map(|pos| self.index.get(*pos).copied())
            .collect();

        Table { columns, index }
    }

    /// Keep the rows for which `keep(position)` returns true.
    pub fn filter_rows<F>(&self, mut keep: F) -> Table
    where
        F: FnMut(usize) -> bool,
    {
        let positions = (0..self.n_rows()).filter(|pos| keep(*pos)).collect::<Vec<_>>();
        self.take_rows(&positions)
    }
}

/// Anything that may or may not be a genuine table.
///
/// Loaders and callers hand the validator and the CSV writer values of
/// several shapes; only real tables pass the precondition checks.
pub trait Tabular {
    fn as_table(&self) -> Option<&Table>;

    /// Label used in type errors.
    fn kind(&self) -> &'static str;
}

impl Tabular for Table {
    fn as_table(&self) -> Option<&Table> {
        Some(self)
    }

    fn kind(&self) -> &'static str {
        "table"
    }
}

impl Tabular for Value {
    fn as_table(&self) -> Option<&Table> {
        None
    }

    fn kind(&self) -> &'static str {
        "scalar"
    }
}

impl Tabular for [Vec<Value>] {
    fn as_table(&self) -> Option<&Table> {
        None
    }

    fn kind(&self) -> &'static str {
        "array"
    }
}

impl Tabular for Vec<Vec<Value>> {
    fn as_table(&self) -> Option<&Table> {
        None
    }

    fn kind(&self) -> &'static str {
        "array"
    }
}
