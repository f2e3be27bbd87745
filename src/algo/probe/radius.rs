//! Search radius resolution.

use super::ScalarAttribute;
use crate::error::{GraphError, Result};

/// How far a probe looks around each point.
#[derive(Debug, Clone)]
pub enum SearchRadius {
    /// Same radius everywhere.
    Constant(f64),
    /// Radius read per point. Non-finite or negative values resolve to 0.
    Attribute(ScalarAttribute),
}

impl SearchRadius {
    /// The radius at point `i`.
    #[inline]
    pub fn resolve(&self, i: usize) -> f64 {
        match self {
            SearchRadius::Constant(r) => *r,
            SearchRadius::Attribute(attr) => {
                let r = attr.get(i);
                if r.is_finite() && r > 0.0 {
                    r
                } else {
                    0.0
                }
            }
        }
    }

    /// Check whether the radius is the same for every point.
    #[inline]
    pub fn is_constant(&self) -> bool {
        matches!(self, SearchRadius::Constant(_))
    }

    /// The constant radius, if any.
    #[inline]
    pub fn constant(&self) -> Option<f64> {
        match self {
            SearchRadius::Constant(r) => Some(*r),
            SearchRadius::Attribute(_) => None,
        }
    }

    /// Check the radius against a point count.
    ///
    /// # Errors
    /// - [`GraphError::InvalidParameter`] for a non-positive or non-finite constant
    /// - [`GraphError::LengthMismatch`] for an attribute of the wrong length
    pub fn validate(&self, num_points: usize) -> Result<()> {
        match self {
            SearchRadius::Constant(r) => {
                if r.is_finite() && *r > 0.0 {
                    Ok(())
                } else {
                    Err(GraphError::invalid_param(
                        "radius",
                        r,
                        "must be positive and finite",
                    ))
                }
            }
            SearchRadius::Attribute(attr) => attr.validate("radius attribute", num_points),
        }
    }
}

impl From<f64> for SearchRadius {
    fn from(r: f64) -> Self {
        SearchRadius::Constant(r)
    }
}

impl From<ScalarAttribute> for SearchRadius {
    fn from(attr: ScalarAttribute) -> Self {
        SearchRadius::Attribute(attr)
    }
}

impl Default for SearchRadius {
    fn default() -> Self {
        SearchRadius::Constant(1.0)
    }
}
