//! Validation functionality
//!
//! The alignment checks every mapping write runs before touching its
//! entries:
//! - row-count agreement with the bound axis
//! - positional label identity for labeled values
//! - both-axes shape agreement for layer values

pub mod alignment;

pub use alignment::{
    AlignmentError, AlignmentResult, validate_layer_shape, validate_row_count,
    validate_row_labels,
};
