//! Row-compressed sparse matrix model

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::{ValueError, ValueResult};

/// Sparse 2-D matrix in compressed sparse row layout.
///
/// `indptr` holds one entry per row plus one; row `r` owns the half-open
/// slice `indptr[r]..indptr[r + 1]` of `indices` and `data`. Column indices
/// are strictly increasing within each row, so explicit duplicates cannot
/// occur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsrMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl CsrMatrix {
    /// Create a matrix from raw compressed-row parts.
    ///
    /// # Rules
    ///
    /// - `indptr` has `rows + 1` entries, starts at 0 and never decreases
    /// - `indices` and `data` have the same length, equal to `indptr[rows]`
    /// - column indices are `< cols` and strictly increasing within a row
    pub fn new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> ValueResult<Self> {
        if indptr.len() != rows + 1 {
            return Err(ValueError::IndexPointerLength {
                expected: rows + 1,
                actual: indptr.len(),
            });
        }
        if indptr[0] != 0 {
            return Err(ValueError::IndexPointerOrder { position: 0 });
        }
        for (position, pair) in indptr.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ValueError::IndexPointerOrder {
                    position: position + 1,
                });
            }
        }
        if indices.len() != data.len() {
            return Err(ValueError::StoredLength {
                expected: indices.len(),
                actual: data.len(),
            });
        }
        if data.len() != indptr[rows] {
            return Err(ValueError::StoredLength {
                expected: indptr[rows],
                actual: data.len(),
            });
        }
        for row in 0..rows {
            let slice = &indices[indptr[row]..indptr[row + 1]];
            for &index in slice {
                if index >= cols {
                    return Err(ValueError::ColumnIndexRange { row, index, cols });
                }
            }
            if slice.windows(2).any(|pair| pair[1] <= pair[0]) {
                return Err(ValueError::UnsortedRow { row });
            }
        }
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Matrix of the given shape with no stored entries.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            indptr: vec![0; rows + 1],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Build a matrix from `(row, col, value)` triplets in any order.
    pub fn from_triplets(
        rows: usize,
        cols: usize,
        entries: &[(usize, usize, f64)],
    ) -> ValueResult<Self> {
        for &(row, col, _) in entries {
            if row >= rows || col >= cols {
                return Err(ValueError::CoordinateRange {
                    row,
                    col,
                    rows,
                    cols,
                });
            }
        }
        let mut sorted = entries.to_vec();
        sorted.sort_by_key(|&(row, col, _)| (row, col));
        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 && pair[0].1 == pair[1].1 {
                return Err(ValueError::DuplicateCoordinate {
                    row: pair[0].0,
                    col: pair[0].1,
                });
            }
        }

        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::with_capacity(sorted.len());
        let mut data = Vec::with_capacity(sorted.len());
        indptr.push(0);
        let mut cursor = 0;
        for row in 0..rows {
            while cursor < sorted.len() && sorted[cursor].0 == row {
                indices.push(sorted[cursor].1);
                data.push(sorted[cursor].2);
                cursor += 1;
            }
            indptr.push(indices.len());
        }
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)` shape pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Row offsets, one per row plus one.
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Column indices of the stored entries.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Stored values, row by row.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Value at `(row, col)`; zero where nothing is stored or the position
    /// lies outside the matrix.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row >= self.rows || col >= self.cols {
            return 0.0;
        }
        let span = self.indptr[row]..self.indptr[row + 1];
        match self.indices[span.clone()].binary_search(&col) {
            Ok(offset) => self.data[span.start + offset],
            Err(_) => 0.0,
        }
    }

    /// Dense copy of the matrix.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for row in 0..self.rows {
            for slot in self.indptr[row]..self.indptr[row + 1] {
                dense[[row, self.indices[slot]]] = self.data[slot];
            }
        }
        dense
    }
}
