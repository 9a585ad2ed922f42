//! Alignment checks and the errors they raise
//!
//! All functions here are read-only: they inspect a candidate against an
//! axis and report the first violation. Callers mutate state only after
//! every check has passed.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AlignedValue, Axis, AxisKind};

/// Errors raised when a value cannot join an aligned mapping.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum AlignmentError {
    /// The candidate's row count disagrees with the bound axis length
    #[error("value has {actual} rows but the {axis} axis has length {expected}")]
    DimensionMismatch {
        axis: AxisKind,
        expected: usize,
        actual: usize,
    },

    /// A labeled candidate's row labels disagree with the bound axis
    #[error("row label {position} is '{found}', expected '{expected}' ({axis} axis)")]
    LabelMismatch {
        axis: AxisKind,
        position: usize,
        expected: String,
        found: String,
    },

    /// The candidate is not one of the accepted value representations
    #[error("unsupported value: {reason}")]
    UnsupportedValueType { reason: String },

    /// Lookup or removal of a key the mapping does not hold
    #[error("key '{key}' not found")]
    KeyNotFound { key: String },
}

/// Result type for alignment operations.
pub type AlignmentResult<T> = Result<T, AlignmentError>;

/// Check that a value's row count equals the bound axis length.
///
/// # Examples
///
/// ```
/// use annotated_matrix_sdk::models::{AlignedValue, Axis, AxisKind};
/// use annotated_matrix_sdk::validation::validate_row_count;
/// use ndarray::Array2;
///
/// let axis = Axis::new(AxisKind::Observations, vec!["a".into(), "b".into()]).unwrap();
/// let value = AlignedValue::Dense(Array2::zeros((2, 7)));
/// assert!(validate_row_count(&value, &axis).is_ok());
///
/// let short = AlignedValue::Dense(Array2::zeros((1, 7)));
/// assert!(validate_row_count(&short, &axis).is_err());
/// ```
pub fn validate_row_count(value: &AlignedValue, axis: &Axis) -> AlignmentResult<()> {
    if value.row_count() != axis.len() {
        return Err(AlignmentError::DimensionMismatch {
            axis: axis.kind(),
            expected: axis.len(),
            actual: value.row_count(),
        });
    }
    Ok(())
}

/// Compare row labels element-wise, in order, against the axis labels.
///
/// Runs for every labeled value, including ones rebuilt with a positional
/// index: matching the axis length is not enough, the names themselves must
/// line up. The reported position is the first disagreement; a missing or
/// surplus label is reported with an empty string on the shorter side.
///
/// # Examples
///
/// ```
/// use annotated_matrix_sdk::models::{Axis, AxisKind};
/// use annotated_matrix_sdk::validation::validate_row_labels;
///
/// let axis = Axis::new(AxisKind::Observations, vec!["a".into(), "b".into()]).unwrap();
/// let labels = vec!["a".to_string(), "b".to_string()];
/// assert!(validate_row_labels(&labels, &axis).is_ok());
///
/// let renamed = vec!["a".to_string(), "x".to_string()];
/// assert!(validate_row_labels(&renamed, &axis).is_err());
/// ```
pub fn validate_row_labels(labels: &[String], axis: &Axis) -> AlignmentResult<()> {
    for (position, expected) in axis.labels().iter().enumerate() {
        match labels.get(position) {
            Some(found) if found == expected => {}
            Some(found) => {
                return Err(AlignmentError::LabelMismatch {
                    axis: axis.kind(),
                    position,
                    expected: expected.clone(),
                    found: found.clone(),
                });
            }
            None => {
                return Err(AlignmentError::LabelMismatch {
                    axis: axis.kind(),
                    position,
                    expected: expected.clone(),
                    found: String::new(),
                });
            }
        }
    }
    if labels.len() > axis.len() {
        return Err(AlignmentError::LabelMismatch {
            axis: axis.kind(),
            position: axis.len(),
            expected: String::new(),
            found: labels[axis.len()].clone(),
        });
    }
    Ok(())
}

/// Check a layer candidate against both axes: rows against observations,
/// columns against variables.
///
/// # Examples
///
/// ```
/// use annotated_matrix_sdk::models::{AlignedValue, Axis, AxisKind};
/// use annotated_matrix_sdk::validation::validate_layer_shape;
/// use ndarray::Array2;
///
/// let obs = Axis::new(AxisKind::Observations, vec!["a".into(), "b".into()]).unwrap();
/// let vars = Axis::new(AxisKind::Variables, vec!["x".into(), "y".into(), "z".into()]).unwrap();
///
/// let layer = AlignedValue::Dense(Array2::zeros((2, 3)));
/// assert!(validate_layer_shape(&layer, &obs, &vars).is_ok());
///
/// let wide = AlignedValue::Dense(Array2::zeros((2, 8)));
/// assert!(validate_layer_shape(&wide, &obs, &vars).is_err());
/// ```
pub fn validate_layer_shape(
    value: &AlignedValue,
    obs_axis: &Axis,
    var_axis: &Axis,
) -> AlignmentResult<()> {
    if value.row_count() != obs_axis.len() {
        return Err(AlignmentError::DimensionMismatch {
            axis: obs_axis.kind(),
            expected: obs_axis.len(),
            actual: value.row_count(),
        });
    }
    if value.col_count() != var_axis.len() {
        return Err(AlignmentError::DimensionMismatch {
            axis: var_axis.kind(),
            expected: var_axis.len(),
            actual: value.col_count(),
        });
    }
    Ok(())
}
