//! Annotated Matrix SDK - validated container for annotated data matrices
//!
//! Provides a primary data matrix X together with named annotations that are
//! guaranteed to stay aligned with it:
//! - `models`: the accepted value representations (dense blocks, labeled
//!   tables, row-compressed sparse matrices) and the axis type
//! - `validation`: the alignment checks and their error taxonomy
//! - `mapping`: string-keyed mappings whose values must line up with an axis
//! - `container`: the parent [`AnnotatedMatrix`]
//! - `fingerprint`: deterministic state digest for change detection
//!
//! Writes validate before they store: a rejected value leaves the container
//! byte-for-byte as it was, and bulk replacement is all-or-nothing.

pub mod container;
#[cfg(feature = "fingerprint")]
pub mod fingerprint;
pub mod mapping;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use container::{AnnotatedMatrix, ContainerError};
pub use mapping::{AxisAlignedMap, LayerMap};
pub use models::{
    AlignedValue, Axis, AxisKind, Column, ColumnData, CsrMatrix, DataTable, RawValue, ValueError,
    ValueKind, ValueResult,
};
pub use validation::{AlignmentError, AlignmentResult};
