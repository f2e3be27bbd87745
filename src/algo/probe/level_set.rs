//! Level set connectivity.
//!
//! Points link to nearby points whose field value is within `tolerance` of
//! their own, preferring close neighbors with nearly equal values. The result
//! traces iso-lines of the field through the point cloud.

use rayon::prelude::*;

use super::{collect_from_generators, gather_candidates, ProbeContext, ScalarAttribute, SearchRadius};
use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;

/// Level set probe.
#[derive(Debug, Clone)]
pub struct LevelSetProbe {
    /// Neighborhood radius.
    pub radius: SearchRadius,

    /// The scalar field. Required.
    pub field: Option<ScalarAttribute>,

    /// Min-max normalize the field to `[0, 1]` before comparing (default: true).
    pub normalize: bool,

    /// Largest value difference that still counts as the same level.
    pub tolerance: f64,

    /// Maximum links per generator.
    pub max_connections: usize,

    /// Weight of distance against value difference in the ranking, in `[0, 1]`.
    pub distance_weight: f64,

    values: Vec<f64>,
}

impl LevelSetProbe {
    /// Create a level set probe without a field.
    pub fn new(radius: impl Into<SearchRadius>) -> Self {
        Self {
            radius: radius.into(),
            field: None,
            normalize: true,
            tolerance: 0.05,
            max_connections: 4,
            distance_weight: 0.5,
            values: Vec::new(),
        }
    }

    /// Set the scalar field.
    pub fn with_field(mut self, field: impl Into<ScalarAttribute>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set whether to normalize the field.
    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    /// Set the value tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the maximum number of links per generator.
    pub fn with_max_connections(mut self, max_connections: usize) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Set the distance weight.
    pub fn with_distance_weight(mut self, weight: f64) -> Self {
        self.distance_weight = weight;
        self
    }

    /// Validate configuration and snapshot the field.
    ///
    /// # Errors
    /// - [`GraphError::MissingAttribute`] without a field
    /// - [`GraphError::InvalidParameter`] for a bad tolerance, connection
    ///   count or distance weight
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        let field = self.field.as_ref().ok_or(GraphError::MissingAttribute {
            probe: "level-set",
            attribute: "field",
        })?;
        field.validate("field", ctx.num_points())?;
        self.radius.validate(ctx.num_points())?;

        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(GraphError::invalid_param(
                "tolerance",
                self.tolerance,
                "must be non-negative and finite",
            ));
        }
        if self.max_connections == 0 {
            return Err(GraphError::invalid_param(
                "max_connections",
                self.max_connections,
                "must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.distance_weight) {
            return Err(GraphError::invalid_param(
                "distance_weight",
                self.distance_weight,
                "must be in [0, 1]",
            ));
        }

        let n = ctx.num_points();
        let mut values: Vec<f64> = if ctx.is_parallel() {
            (0..n).into_par_iter().map(|i| field.get(i)).collect()
        } else {
            (0..n).map(|i| field.get(i)).collect()
        };

        if self.normalize {
            normalize(&mut values);
        }
        self.values = values;
        Ok(())
    }

    /// Snapshotted (and possibly normalized) field values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Link each generator to its best same-level neighbors.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        if self.values.len() != ctx.num_points() {
            return;
        }

        let w = self.distance_weight;
        let tolerance = self.tolerance;

        let found = collect_from_generators(ctx, |a, local| {
            let va = self.values[a];
            if !va.is_finite() {
                return;
            }
            let radius = self.radius.resolve(a);

            let mut ranked: Vec<(f64, f64, usize)> = gather_candidates(ctx, a, radius)
                .into_iter()
                .filter_map(|c| {
                    let delta = (self.values[c.index] - va).abs();
                    if delta.is_nan() || delta > tolerance {
                        return None;
                    }
                    let level = if tolerance > 0.0 { delta / tolerance } else { 0.0 };
                    let score = w * c.distance / radius + (1.0 - w) * level;
                    Some((score, c.distance, c.index))
                })
                .collect();

            ranked.sort_by(|x, y| {
                x.0.total_cmp(&y.0)
                    .then_with(|| x.1.total_cmp(&y.1))
                    .then_with(|| x.2.cmp(&y.2))
            });

            for &(_, _, b) in ranked.iter().take(self.max_connections) {
                local.insert(a, b);
            }
        });
        edges.extend_from(&found);
    }
}

/// Min-max normalize finite values to `[0, 1]`. A constant field maps to 0.
fn normalize(values: &mut [f64]) {
    let (min, max) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() {
        return;
    }

    let range = max - min;
    for v in values.iter_mut().filter(|v| v.is_finite()) {
        *v = if range > 0.0 { (*v - min) / range } else { 0.0 };
    }
}
