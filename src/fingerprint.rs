//! State digest for change detection
//!
//! A deterministic SHA-256 digest over the full data state of an
//! [`AnnotatedMatrix`]: X, both metadata tables, every aligned mapping in
//! insertion order, and the unstructured annotations in sorted key order.
//! Each mapping group is fed under its own section tag and entry count, so
//! the same entry held by obsm, varm, or layers digests differently.
//! Two containers holding identical data produce identical digests; any
//! accepted mutation produces a different one. Timestamps are not part of
//! the digest, so a rejected write can be asserted against it directly.

use ndarray::Array2;
use sha2::{Digest, Sha256};

use crate::container::AnnotatedMatrix;
use crate::models::{AlignedValue, ColumnData, CsrMatrix, DataTable};

/// SHA-256 hex digest of a container's data state.
pub fn fingerprint(matrix: &AnnotatedMatrix) -> String {
    let mut hasher = Sha256::new();
    feed_labels(&mut hasher, matrix.obs_names());
    feed_labels(&mut hasher, matrix.var_names());
    feed_dense(&mut hasher, matrix.x());
    feed_table(&mut hasher, matrix.obs());
    feed_table(&mut hasher, matrix.var());
    // Section tags keep identical entries in different mappings from aliasing
    hasher.update(b"obsm");
    hasher.update(matrix.obsm().len().to_le_bytes());
    for (key, value) in matrix.obsm().iter() {
        feed_entry(&mut hasher, key, value);
    }
    hasher.update(b"varm");
    hasher.update(matrix.varm().len().to_le_bytes());
    for (key, value) in matrix.varm().iter() {
        feed_entry(&mut hasher, key, value);
    }
    hasher.update(b"layers");
    hasher.update(matrix.layers().len().to_le_bytes());
    for (key, value) in matrix.layers().iter() {
        feed_entry(&mut hasher, key, value);
    }
    hasher.update(b"uns");
    hasher.update(matrix.uns().len().to_le_bytes());
    let mut uns_keys: Vec<&String> = matrix.uns().keys().collect();
    uns_keys.sort();
    for key in uns_keys {
        hasher.update(key.as_bytes());
        hasher.update([0u8]);
        hasher.update(matrix.uns()[key].to_string().as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

impl AnnotatedMatrix {
    /// SHA-256 hex digest of this container's data state; see
    /// [`fingerprint`].
    pub fn fingerprint(&self) -> String {
        fingerprint(self)
    }
}

fn feed_labels(hasher: &mut Sha256, labels: &[String]) {
    hasher.update(labels.len().to_le_bytes());
    for label in labels {
        hasher.update(label.as_bytes());
        // NUL separator keeps adjacent labels from aliasing
        hasher.update([0u8]);
    }
}

fn feed_dense(hasher: &mut Sha256, array: &Array2<f64>) {
    hasher.update(array.nrows().to_le_bytes());
    hasher.update(array.ncols().to_le_bytes());
    for &value in array.iter() {
        hasher.update(value.to_bits().to_le_bytes());
    }
}

fn feed_table(hasher: &mut Sha256, table: &DataTable) {
    feed_labels(hasher, table.index());
    hasher.update(table.col_count().to_le_bytes());
    for column in table.columns() {
        hasher.update(column.name.as_bytes());
        hasher.update([0u8]);
        hasher.update(column.data.dtype_name().as_bytes());
        match &column.data {
            ColumnData::Float(values) => {
                for value in values {
                    hasher.update(value.to_bits().to_le_bytes());
                }
            }
            ColumnData::Int(values) => {
                for value in values {
                    hasher.update(value.to_le_bytes());
                }
            }
            ColumnData::Text(values) => {
                for value in values {
                    hasher.update(value.as_bytes());
                    hasher.update([0u8]);
                }
            }
            ColumnData::Bool(values) => {
                for value in values {
                    hasher.update([*value as u8]);
                }
            }
        }
    }
}

fn feed_sparse(hasher: &mut Sha256, matrix: &CsrMatrix) {
    hasher.update(matrix.rows().to_le_bytes());
    hasher.update(matrix.cols().to_le_bytes());
    for offset in matrix.indptr() {
        hasher.update(offset.to_le_bytes());
    }
    for index in matrix.indices() {
        hasher.update(index.to_le_bytes());
    }
    for value in matrix.data() {
        hasher.update(value.to_bits().to_le_bytes());
    }
}

fn feed_entry(hasher: &mut Sha256, key: &str, value: &AlignedValue) {
    hasher.update(key.as_bytes());
    hasher.update([0u8]);
    hasher.update(value.kind().name().as_bytes());
    match value {
        AlignedValue::Dense(array) => feed_dense(hasher, array),
        AlignedValue::Table(table) => feed_table(hasher, table),
        AlignedValue::Sparse(matrix) => feed_sparse(hasher, matrix),
    }
}
