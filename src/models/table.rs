//! Labeled table model: a row index plus named, typed columns

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{ValueError, ValueResult};

/// Typed storage for one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColumnData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    Text(Vec<String>),
    Bool(Vec<bool>),
}

impl ColumnData {
    /// Number of values in the column.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Int(values) => values.len(),
            ColumnData::Text(values) => values.len(),
            ColumnData::Bool(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type tag used in diagnostics and digests.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            ColumnData::Float(_) => "float",
            ColumnData::Int(_) => "int",
            ColumnData::Text(_) => "text",
            ColumnData::Bool(_) => "bool",
        }
    }
}

/// A named column of table data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn float(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, ColumnData::Float(values))
    }

    pub fn int(name: impl Into<String>, values: Vec<i64>) -> Self {
        Self::new(name, ColumnData::Int(values))
    }

    pub fn text(name: impl Into<String>, values: Vec<String>) -> Self {
        Self::new(name, ColumnData::Text(values))
    }

    pub fn bool(name: impl Into<String>, values: Vec<bool>) -> Self {
        Self::new(name, ColumnData::Bool(values))
    }
}

/// Labeled tabular value: ordered row labels plus rectangular columns.
///
/// The row index carries identity. Index labels need not be unique here
/// (uniqueness is the business of `Axis`), but every column must match the
/// index length and column names must be distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    index: Vec<String>,
    columns: Vec<Column>,
}

impl DataTable {
    /// Create a table from a row index and columns.
    ///
    /// # Rules
    ///
    /// - Every column must have exactly `index.len()` values
    /// - Column names must be distinct
    pub fn new(index: Vec<String>, columns: Vec<Column>) -> ValueResult<Self> {
        let rows = index.len();
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if column.data.len() != rows {
                return Err(ValueError::ColumnLength {
                    column: column.name.clone(),
                    expected: rows,
                    actual: column.data.len(),
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ValueError::DuplicateColumn {
                    name: column.name.clone(),
                });
            }
        }
        Ok(Self { index, columns })
    }

    /// Table with a positional `"0"`, `"1"`, ... row index.
    ///
    /// The index length is taken from the first column; an empty column
    /// list yields an empty table.
    pub fn with_positional_index(columns: Vec<Column>) -> ValueResult<Self> {
        let rows = columns.first().map(|column| column.data.len()).unwrap_or(0);
        let index = (0..rows).map(|i| i.to_string()).collect();
        Self::new(index, columns)
    }

    /// Table with row labels and no columns.
    pub fn from_index(index: Vec<String>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Number of columns.
    pub fn col_count(&self) -> usize {
        self.columns.len()
    }

    /// Row labels in table order.
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Columns in table order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}
