//! Parent container
//!
//! [`AnnotatedMatrix`] owns the numeric block X, the observation and
//! variable metadata tables whose row labels define the two axes, the
//! axis-aligned mappings, the layer mapping, and unstructured annotations.
//! All mutation goes through container methods so the modification
//! timestamp stays honest: it moves on successful writes and stays put on
//! rejected ones.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::mapping::{AxisAlignedMap, LayerMap};
use crate::models::{AlignedValue, Axis, AxisKind, DataTable, RawValue, ValueError};
use crate::validation::{AlignmentError, AlignmentResult};

/// Errors raised while constructing the parent container.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ContainerError {
    /// X's shape disagrees with the metadata tables
    #[error("X has shape ({x_rows}, {x_cols}) but the metadata tables define {obs_rows} obs x {var_rows} vars")]
    ShapeMismatch {
        x_rows: usize,
        x_cols: usize,
        obs_rows: usize,
        var_rows: usize,
    },

    /// Metadata row labels could not form an axis
    #[error("invalid {axis} axis: {source}")]
    InvalidAxis {
        axis: AxisKind,
        #[source]
        source: ValueError,
    },
}

/// Annotated data matrix: X plus named, validated, axis-aligned annotations.
///
/// The two axes are fixed at construction from the metadata tables' row
/// labels and never change afterwards; every mapping holds a shared handle
/// to its axis, so nothing stored can drift out of alignment.
#[derive(Debug, Clone)]
pub struct AnnotatedMatrix {
    x: Array2<f64>,
    obs_axis: Arc<Axis>,
    var_axis: Arc<Axis>,
    obs: DataTable,
    var: DataTable,
    obsm: AxisAlignedMap,
    varm: AxisAlignedMap,
    layers: LayerMap,
    uns: HashMap<String, serde_json::Value>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnnotatedMatrix {
    /// Create a container from X and the metadata tables whose row labels
    /// become the axis labels.
    ///
    /// # Rules
    ///
    /// - `x.nrows()` must equal the obs table's row count, `x.ncols()` the
    ///   var table's
    /// - both tables' row labels must be unique
    pub fn new(x: Array2<f64>, obs: DataTable, var: DataTable) -> Result<Self, ContainerError> {
        if x.nrows() != obs.row_count() || x.ncols() != var.row_count() {
            return Err(ContainerError::ShapeMismatch {
                x_rows: x.nrows(),
                x_cols: x.ncols(),
                obs_rows: obs.row_count(),
                var_rows: var.row_count(),
            });
        }
        let obs_axis = Axis::new(AxisKind::Observations, obs.index().to_vec()).map_err(
            |source| ContainerError::InvalidAxis {
                axis: AxisKind::Observations,
                source,
            },
        )?;
        let var_axis =
            Axis::new(AxisKind::Variables, var.index().to_vec()).map_err(|source| {
                ContainerError::InvalidAxis {
                    axis: AxisKind::Variables,
                    source,
                }
            })?;
        info!(
            "created annotated matrix: {} obs x {} vars",
            obs_axis.len(),
            var_axis.len()
        );
        Ok(Self::assemble(x, Arc::new(obs_axis), Arc::new(var_axis), obs, var))
    }

    /// Container with positional labels derived from X's shape.
    pub fn from_shape(x: Array2<f64>) -> Self {
        let obs_axis = Arc::new(Axis::positional(AxisKind::Observations, x.nrows()));
        let var_axis = Arc::new(Axis::positional(AxisKind::Variables, x.ncols()));
        let obs = DataTable::from_index(obs_axis.labels().to_vec());
        let var = DataTable::from_index(var_axis.labels().to_vec());
        Self::assemble(x, obs_axis, var_axis, obs, var)
    }

    fn assemble(
        x: Array2<f64>,
        obs_axis: Arc<Axis>,
        var_axis: Arc<Axis>,
        obs: DataTable,
        var: DataTable,
    ) -> Self {
        let now = Utc::now();
        Self {
            obsm: AxisAlignedMap::new(Arc::clone(&obs_axis)),
            varm: AxisAlignedMap::new(Arc::clone(&var_axis)),
            layers: LayerMap::new(Arc::clone(&obs_axis), Arc::clone(&var_axis)),
            x,
            obs_axis,
            var_axis,
            obs,
            var,
            uns: HashMap::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The primary data matrix.
    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    /// Replace X with a block of the same shape.
    pub fn set_x(&mut self, x: Array2<f64>) -> AlignmentResult<()> {
        if x.nrows() != self.obs_axis.len() {
            return Err(AlignmentError::DimensionMismatch {
                axis: AxisKind::Observations,
                expected: self.obs_axis.len(),
                actual: x.nrows(),
            });
        }
        if x.ncols() != self.var_axis.len() {
            return Err(AlignmentError::DimensionMismatch {
                axis: AxisKind::Variables,
                expected: self.var_axis.len(),
                actual: x.ncols(),
            });
        }
        self.x = x;
        self.touch();
        Ok(())
    }

    /// Number of observations (rows of X).
    pub fn n_obs(&self) -> usize {
        self.obs_axis.len()
    }

    /// Number of variables (columns of X).
    pub fn n_vars(&self) -> usize {
        self.var_axis.len()
    }

    /// `(n_obs, n_vars)` shape pair.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_obs(), self.n_vars())
    }

    /// Observation metadata table.
    pub fn obs(&self) -> &DataTable {
        &self.obs
    }

    /// Variable metadata table.
    pub fn var(&self) -> &DataTable {
        &self.var
    }

    /// Observation labels in axis order.
    pub fn obs_names(&self) -> &[String] {
        self.obs_axis.labels()
    }

    /// Variable labels in axis order.
    pub fn var_names(&self) -> &[String] {
        self.var_axis.labels()
    }

    /// The observation axis.
    pub fn obs_axis(&self) -> &Axis {
        &self.obs_axis
    }

    /// The variable axis.
    pub fn var_axis(&self) -> &Axis {
        &self.var_axis
    }

    /// Observation-aligned mapping (read access).
    pub fn obsm(&self) -> &AxisAlignedMap {
        &self.obsm
    }

    /// Variable-aligned mapping (read access).
    pub fn varm(&self) -> &AxisAlignedMap {
        &self.varm
    }

    /// Layer mapping (read access).
    pub fn layers(&self) -> &LayerMap {
        &self.layers
    }

    /// Unstructured annotations (read access).
    pub fn uns(&self) -> &HashMap<String, serde_json::Value> {
        &self.uns
    }

    /// Creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Time of the last successful mutation.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Insert one observation-aligned value.
    pub fn insert_obsm(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> AlignmentResult<Option<AlignedValue>> {
        let previous = self.obsm.insert(key, value)?;
        self.touch();
        Ok(previous)
    }

    /// Remove one observation-aligned value.
    pub fn remove_obsm(&mut self, key: &str) -> AlignmentResult<AlignedValue> {
        let removed = self.obsm.remove(key)?;
        self.touch();
        Ok(removed)
    }

    /// Replace the observation-aligned mapping wholesale. All-or-nothing:
    /// on error the previous entries and the timestamp are untouched.
    pub fn set_obsm<K, V, I>(&mut self, entries: I) -> AlignmentResult<()>
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.obsm.replace_all(entries)?;
        self.touch();
        Ok(())
    }

    /// Insert one variable-aligned value.
    pub fn insert_varm(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> AlignmentResult<Option<AlignedValue>> {
        let previous = self.varm.insert(key, value)?;
        self.touch();
        Ok(previous)
    }

    /// Remove one variable-aligned value.
    pub fn remove_varm(&mut self, key: &str) -> AlignmentResult<AlignedValue> {
        let removed = self.varm.remove(key)?;
        self.touch();
        Ok(removed)
    }

    /// Replace the variable-aligned mapping wholesale.
    pub fn set_varm<K, V, I>(&mut self, entries: I) -> AlignmentResult<()>
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.varm.replace_all(entries)?;
        self.touch();
        Ok(())
    }

    /// Insert one layer.
    pub fn insert_layer(
        &mut self,
        key: impl Into<String>,
        value: impl Into<RawValue>,
    ) -> AlignmentResult<Option<AlignedValue>> {
        let previous = self.layers.insert(key, value)?;
        self.touch();
        Ok(previous)
    }

    /// Remove one layer.
    pub fn remove_layer(&mut self, key: &str) -> AlignmentResult<AlignedValue> {
        let removed = self.layers.remove(key)?;
        self.touch();
        Ok(removed)
    }

    /// Replace the layer mapping wholesale.
    pub fn set_layers<K, V, I>(&mut self, entries: I) -> AlignmentResult<()>
    where
        K: Into<String>,
        V: Into<RawValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.layers.replace_all(entries)?;
        self.touch();
        Ok(())
    }

    /// Store an unstructured annotation. Uns entries carry no alignment,
    /// so any JSON value is accepted.
    pub fn insert_uns(
        &mut self,
        key: impl Into<String>,
        value: serde_json::Value,
    ) -> Option<serde_json::Value> {
        let previous = self.uns.insert(key.into(), value);
        self.touch();
        previous
    }

    /// Remove an unstructured annotation, if present.
    pub fn remove_uns(&mut self, key: &str) -> Option<serde_json::Value> {
        let removed = self.uns.remove(key);
        if removed.is_some() {
            self.touch();
        }
        removed
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
