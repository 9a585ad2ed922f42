//! Axis model: ordered, unique labels along one matrix dimension

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ValueError, ValueResult};

/// Direction of an axis within the parent matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AxisKind {
    /// Rows of the parent matrix
    Observations,
    /// Columns of the parent matrix
    Variables,
}

impl fmt::Display for AxisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AxisKind::Observations => write!(f, "obs"),
            AxisKind::Variables => write!(f, "var"),
        }
    }
}

/// Ordered sequence of unique labels fixing identity along one dimension.
///
/// An axis is built once, together with its parent container, and never
/// mutated afterwards. Mappings hold it through a shared handle; changing
/// the labels means building a new container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    kind: AxisKind,
    labels: Vec<String>,
}

impl Axis {
    /// Create an axis from ordered labels.
    ///
    /// # Rules
    ///
    /// - Labels must be unique
    /// - Order is significant: position defines identity
    pub fn new(kind: AxisKind, labels: Vec<String>) -> ValueResult<Self> {
        let mut seen = HashSet::with_capacity(labels.len());
        for (position, label) in labels.iter().enumerate() {
            if !seen.insert(label.as_str()) {
                return Err(ValueError::DuplicateLabel {
                    label: label.clone(),
                    position,
                });
            }
        }
        Ok(Self { kind, labels })
    }

    /// Axis with positional labels `"0"`, `"1"`, ... of the given length.
    pub fn positional(kind: AxisKind, len: usize) -> Self {
        let labels = (0..len).map(|i| i.to_string()).collect();
        // positional labels are unique by construction
        Self { kind, labels }
    }

    /// Direction of this axis.
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Labels in axis order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Position of a label, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|held| held == label)
    }
}
