//! Accepted value representations and their classification

use std::fmt;

use ndarray::{Array2, ArrayD, Ix2};
use serde::{Deserialize, Serialize};

use super::{CsrMatrix, DataTable};
use crate::validation::{AlignmentError, AlignmentResult};

/// Discriminant of a stored aligned value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Dense,
    Table,
    Sparse,
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Dense => "dense",
            ValueKind::Table => "table",
            ValueKind::Sparse => "sparse",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A candidate value as handed over by the caller, before classification.
///
/// Dense input arrives with dynamic rank: the classifier, not the type
/// system, is what rejects wrong ranks, so callers can forward arbitrary
/// numeric blocks and get a typed error back instead of a compile failure
/// far from the data.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Dense numeric block of any rank
    Array(ArrayD<f64>),
    /// Labeled table with an explicit row index
    Table(DataTable),
    /// Row-compressed sparse matrix
    Sparse(CsrMatrix),
}

impl From<ArrayD<f64>> for RawValue {
    fn from(array: ArrayD<f64>) -> Self {
        RawValue::Array(array)
    }
}

impl From<Array2<f64>> for RawValue {
    fn from(array: Array2<f64>) -> Self {
        RawValue::Array(array.into_dyn())
    }
}

impl From<DataTable> for RawValue {
    fn from(table: DataTable) -> Self {
        RawValue::Table(table)
    }
}

impl From<CsrMatrix> for RawValue {
    fn from(matrix: CsrMatrix) -> Self {
        RawValue::Sparse(matrix)
    }
}

impl From<AlignedValue> for RawValue {
    fn from(value: AlignedValue) -> Self {
        match value {
            AlignedValue::Dense(array) => RawValue::Array(array.into_dyn()),
            AlignedValue::Table(table) => RawValue::Table(table),
            AlignedValue::Sparse(matrix) => RawValue::Sparse(matrix),
        }
    }
}

/// A classified value as stored by the aligned mappings.
///
/// Unlike [`RawValue`], every variant here is two-dimensional with a known
/// row extent, so alignment checks can treat all of them uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AlignedValue {
    Dense(Array2<f64>),
    Table(DataTable),
    Sparse(CsrMatrix),
}

impl AlignedValue {
    /// Classify a raw candidate into a storable value.
    ///
    /// Tables and sparse matrices carry their own validated structure and
    /// classify directly; dense blocks must be rank 2.
    pub fn classify(raw: RawValue) -> AlignmentResult<Self> {
        match raw {
            RawValue::Array(array) => {
                let rank = array.ndim();
                array
                    .into_dimensionality::<Ix2>()
                    .map(AlignedValue::Dense)
                    .map_err(|_| AlignmentError::UnsupportedValueType {
                        reason: format!("dense block of rank {rank}, expected rank 2"),
                    })
            }
            RawValue::Table(table) => Ok(AlignedValue::Table(table)),
            RawValue::Sparse(matrix) => Ok(AlignedValue::Sparse(matrix)),
        }
    }

    /// Discriminant of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            AlignedValue::Dense(_) => ValueKind::Dense,
            AlignedValue::Table(_) => ValueKind::Table,
            AlignedValue::Sparse(_) => ValueKind::Sparse,
        }
    }

    /// Extent along the row dimension.
    pub fn row_count(&self) -> usize {
        match self {
            AlignedValue::Dense(array) => array.nrows(),
            AlignedValue::Table(table) => table.row_count(),
            AlignedValue::Sparse(matrix) => matrix.rows(),
        }
    }

    /// Extent along the column dimension.
    pub fn col_count(&self) -> usize {
        match self {
            AlignedValue::Dense(array) => array.ncols(),
            AlignedValue::Table(table) => table.col_count(),
            AlignedValue::Sparse(matrix) => matrix.cols(),
        }
    }

    /// Row labels, for values that carry their own identity.
    pub fn row_labels(&self) -> Option<&[String]> {
        match self {
            AlignedValue::Table(table) => Some(table.index()),
            _ => None,
        }
    }

    pub fn as_dense(&self) -> Option<&Array2<f64>> {
        match self {
            AlignedValue::Dense(array) => Some(array),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&DataTable> {
        match self {
            AlignedValue::Table(table) => Some(table),
            _ => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&CsrMatrix> {
        match self {
            AlignedValue::Sparse(matrix) => Some(matrix),
            _ => None,
        }
    }
}
