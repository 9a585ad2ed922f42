//! Axis-aligned mappings
//!
//! String-keyed stores whose every value must line up with the parent
//! matrix. [`AxisAlignedMap`] binds one axis and holds per-observation or
//! per-variable annotations; [`LayerMap`] binds both axes and holds
//! matrix-shaped siblings of X.
//!
//! Every write classifies and validates the candidate first and touches the
//! entries only after all checks pass, so a failed write leaves the mapping
//! exactly as it was. Bulk replacement is all-or-nothing.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::models::{AlignedValue, Axis, AxisKind, RawValue};
use crate::validation::{
    AlignmentError, AlignmentResult, validate_layer_shape, validate_row_count,
    validate_row_labels,
};

/// Insertion-ordered entry storage shared by the mapping types.
///
/// Keys live in both the hash map and the order vector; `order` holds each
/// key exactly once, in first-insertion order.
#[derive(Debug, Clone, Default)]
struct Entries {
    values: HashMap<String, AlignedValue>,
    order: Vec<String>,
}

impl Entries {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<&AlignedValue> {
        self.values.get(key)
    }

    fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    fn iter(&self) -> impl Iterator<Item = (&str, &AlignedValue)> + '_ {
        self.order
            .iter()
            .map(|key| (key.as_str(), &self.values[key]))
    }

    /// Insert a value, keeping the key's first position on overwrite.
    fn insert(&mut self, key: String, value: AlignedValue) -> Option<AlignedValue> {
        match self.values.insert(key.clone(), value) {
            Some(previous) => Some(previous),
            None => {
                self.order.push(key);
                None
            }
        }
    }

    fn remove(&mut self, key: &str) -> Option<AlignedValue> {
        let removed = self.values.remove(key)?;
        self.order.retain(|held| held != key);
        Some(removed)
    }
}

/// String-keyed store of values aligned to one axis of the parent matrix.
///
/// Every stored value satisfies `value.row_count() == axis.len()`, and
/// labeled values additionally carry row labels identical to the axis
/// labels, position by position. The axis itself is shared and immutable,
/// so stored values never fall out of alignment behind the mapping's back.
#[derive(Debug, Clone)]
pub struct AxisAlignedMap {
    axis: Arc<Axis>,
    entries: Entries,
}

impl AxisAlignedMap {
    /// Create an empty mapping bound to the given axis.
    pub fn new(axis: Arc<Axis>) -> Self {
        Self {
            axis,
            entries: Entries::default(),
        }
    }

    /// The bound axis.
    pub fn axis(&self) -> &Axis {
        &self.axis
    }

    /// Direction of the bound axis.
    pub fn axis_kind(&self) -> AxisKind {
        self.axis.kind()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AlignedValue)> + '_ {
        self.entries.iter()
    }

    /// Look up a stored value.
    pub fn get(&self, key: &str) -> AlignmentResult<&AlignedValue> {
        self.entries
            .get(key)
            .ok_or_else(|| AlignmentError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Classify and validate a candidate without storing it.
    fn validate(&self, raw: RawValue) -> AlignmentResult<AlignedValue> {
        let value = AlignedValue::classify(raw)?;
        validate_row_count(&value, &self.axis)?;
        if let Some(labels) = value.row_labels() {
            validate_row_labels(labels, &self.axis)?;
        }
        Ok(value)
    }

    /// Insert or overwrite a value after validating it.
    ///
    /// Returns the value previously stored under the key, if any. On error
    /// the mapping is untouched: classification and the axis checks all run
    /// before anything is written.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> AlignmentResult<Option<AlignedValue>> {
        let key = key.into();
        let value = self.validate(value.into())?;
        debug!(
            "stored '{}' in {} mapping ({}, {} x {})",
            key,
            self.axis.kind(),
            value.kind(),
            value.row_count(),
            value.col_count()
        );
        Ok(self.entries.insert(key, value))
    }

    /// Remove a stored value.
    ///
    /// Removing an absent key is an error, so misspelt keys never pass
    /// silently.
    pub fn remove(&mut self, key: &str) -> AlignmentResult<AlignedValue> {
        self.entries
            .remove(key)
            .ok_or_else(|| AlignmentError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Replace the full entry set atomically.
    ///
    /// Every candidate is validated into a staging set first; if any single
    /// candidate fails, that candidate's error is returned and the previous
    /// entries remain in place, all of them. Duplicate keys in the batch
    /// resolve last-wins while keeping the key's first position.
    pub fn replace_all<K, V, I>(&mut self, entries: I) -> AlignmentResult<()>
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut staged = Entries::default();
        for (key, raw) in entries {
            let key = key.into();
            match self.validate(raw.into()) {
                Ok(value) => {
                    staged.insert(key, value);
                }
                Err(error) => {
                    warn!(
                        "bulk replace of {} mapping abandoned at '{}': {}",
                        self.axis.kind(),
                        key,
                        error
                    );
                    return Err(error);
                }
            }
        }
        debug!(
            "replaced {} mapping: {} entries",
            self.axis.kind(),
            staged.len()
        );
        self.entries = staged;
        Ok(())
    }
}

/// String-keyed store of matrix-shaped values aligned to both axes.
///
/// Layer values are alternative renderings of X itself, so rows must match
/// the observation axis and columns the variable axis. Labeled tables are
/// one-axis values and are rejected here.
#[derive(Debug, Clone)]
pub struct LayerMap {
    obs_axis: Arc<Axis>,
    var_axis: Arc<Axis>,
    entries: Entries,
}

impl LayerMap {
    /// Create an empty layer mapping bound to both axes.
    pub fn new(obs_axis: Arc<Axis>, var_axis: Arc<Axis>) -> Self {
        Self {
            obs_axis,
            var_axis,
            entries: Entries::default(),
        }
    }

    /// The observation (row) axis.
    pub fn obs_axis(&self) -> &Axis {
        &self.obs_axis
    }

    /// The variable (column) axis.
    pub fn var_axis(&self) -> &Axis {
        &self.var_axis
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() == 0
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AlignedValue)> + '_ {
        self.entries.iter()
    }

    /// Look up a stored layer.
    pub fn get(&self, key: &str) -> AlignmentResult<&AlignedValue> {
        self.entries
            .get(key)
            .ok_or_else(|| AlignmentError::KeyNotFound {
                key: key.to_string(),
            })
    }

    fn validate(&self, raw: RawValue) -> AlignmentResult<AlignedValue> {
        let value = AlignedValue::classify(raw)?;
        if value.as_table().is_some() {
            return Err(AlignmentError::UnsupportedValueType {
                reason: "labeled tables cannot be stored as layers".to_string(),
            });
        }
        validate_layer_shape(&value, &self.obs_axis, &self.var_axis)?;
        Ok(value)
    }

    /// Insert or overwrite a layer after validating its shape against both
    /// axes. On error the mapping is untouched.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> AlignmentResult<Option<AlignedValue>> {
        let key = key.into();
        let value = self.validate(value.into())?;
        debug!(
            "stored layer '{}' ({}, {} x {})",
            key,
            value.kind(),
            value.row_count(),
            value.col_count()
        );
        Ok(self.entries.insert(key, value))
    }

    /// Remove a stored layer. Removing an absent key is an error.
    pub fn remove(&mut self, key: &str) -> AlignmentResult<AlignedValue> {
        self.entries
            .remove(key)
            .ok_or_else(|| AlignmentError::KeyNotFound {
                key: key.to_string(),
            })
    }

    /// Replace the full layer set atomically; see
    /// [`AxisAlignedMap::replace_all`].
    pub fn replace_all<K, V, I>(&mut self, entries: I) -> AlignmentResult<()>
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut staged = Entries::default();
        for (key, raw) in entries {
            let key = key.into();
            match self.validate(raw.into()) {
                Ok(value) => {
                    staged.insert(key, value);
                }
                Err(error) => {
                    warn!("bulk replace of layers abandoned at '{}': {}", key, error);
                    return Err(error);
                }
            }
        }
        debug!("replaced layers: {} entries", staged.len());
        self.entries = staged;
        Ok(())
    }
}
