//! Per-point scalar attribute accessors.

use std::fmt;
use std::sync::Arc;

use crate::error::{GraphError, Result};

/// Read access to one scalar value per point.
///
/// Attribute storage lives outside this crate; probes only see an accessor.
/// Cloning is cheap and shares the accessor.
#[derive(Clone)]
pub struct ScalarAttribute {
    accessor: Arc<dyn Fn(usize) -> f64 + Send + Sync>,
    len: Option<usize>,
}

impl ScalarAttribute {
    /// Wrap a value array. Its length is checked against the point count.
    pub fn from_values(values: Vec<f64>) -> Self {
        let len = values.len();
        let values: Arc<[f64]> = values.into();
        Self {
            accessor: Arc::new(move |i| values.get(i).copied().unwrap_or(f64::NAN)),
            len: Some(len),
        }
    }

    /// Wrap an arbitrary accessor. No length check is possible.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(usize) -> f64 + Send + Sync + 'static,
    {
        Self {
            accessor: Arc::new(f),
            len: None,
        }
    }

    /// Read the value of point `i`.
    #[inline]
    pub fn get(&self, i: usize) -> f64 {
        (self.accessor)(i)
    }

    /// Number of stored values, if known.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    /// Check that the attribute covers `num_points` points.
    pub fn validate(&self, what: &'static str, num_points: usize) -> Result<()> {
        match self.len {
            Some(len) => GraphError::check_len(what, num_points, len),
            None => Ok(()),
        }
    }
}

impl From<Vec<f64>> for ScalarAttribute {
    fn from(values: Vec<f64>) -> Self {
        Self::from_values(values)
    }
}

impl fmt::Debug for ScalarAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalarAttribute")
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}
