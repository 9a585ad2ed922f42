//! Data model for annotated matrices
//!
//! Defines the value representations the aligned mappings accept:
//! - `Axis`: ordered, unique labels fixing identity along one dimension
//! - `DataTable`: labeled table with a row index and typed columns
//! - `CsrMatrix`: row-compressed sparse matrix
//! - `RawValue` / `AlignedValue`: the boundary union handed in by callers
//!   and the classified union the mappings store

pub mod axis;
pub mod sparse;
pub mod table;
pub mod value;

pub use axis::{Axis, AxisKind};
pub use sparse::CsrMatrix;
pub use table::{Column, ColumnData, DataTable};
pub use value::{AlignedValue, RawValue, ValueKind};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while constructing model values.
///
/// These cover structural problems inside a single value (ragged tables,
/// malformed sparse layouts, duplicate labels). Whether a well-formed value
/// fits a particular mapping is decided later by the alignment checks.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValueError {
    /// A label appears more than once in an axis or row index
    #[error("duplicate label '{label}' at position {position}")]
    DuplicateLabel { label: String, position: usize },

    /// A table column's length disagrees with the row index
    #[error("column '{column}' has {actual} values but the table has {expected} rows")]
    ColumnLength {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two table columns share a name
    #[error("duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// Sparse index pointer has the wrong number of entries
    #[error("index pointer has {actual} entries, expected {expected}")]
    IndexPointerLength { expected: usize, actual: usize },

    /// Sparse index pointer decreases or does not start at zero
    #[error("index pointer is not monotone at position {position}")]
    IndexPointerOrder { position: usize },

    /// Sparse value/index storage disagrees with the index pointer
    #[error("{actual} stored entries, expected {expected}")]
    StoredLength { expected: usize, actual: usize },

    /// Sparse column index outside the matrix width
    #[error("column index {index} out of range in row {row} ({cols} columns)")]
    ColumnIndexRange { row: usize, index: usize, cols: usize },

    /// Sparse column indices within a row must be strictly increasing
    #[error("column indices of row {row} are not strictly increasing")]
    UnsortedRow { row: usize },

    /// Triplet coordinate outside the matrix shape
    #[error("entry ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    CoordinateRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The same coordinate appears twice in a triplet list
    #[error("entry ({row}, {col}) given more than once")]
    DuplicateCoordinate { row: usize, col: usize },
}

/// Result type for model construction.
pub type ValueResult<T> = Result<T, ValueError>;
