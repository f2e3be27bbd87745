//! Gradient flow connectivity.
//!
//! Each point links toward the neighbors its scalar field rises (or falls)
//! to, measured as slope `(value(b) - value(a)) / distance(a, b)`.

use super::{collect_from_generators, gather_candidates, ProbeContext, ScalarAttribute, SearchRadius};
use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;

/// Which way along the field edges are made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowDirection {
    /// Toward higher values.
    #[default]
    Uphill,
    /// Toward lower values.
    Downhill,
    /// Both ways.
    Both,
}

impl FlowDirection {
    fn uphill(self) -> bool {
        matches!(self, FlowDirection::Uphill | FlowDirection::Both)
    }

    fn downhill(self) -> bool {
        matches!(self, FlowDirection::Downhill | FlowDirection::Both)
    }
}

/// Gradient flow probe.
#[derive(Debug, Clone)]
pub struct GradientProbe {
    /// Neighborhood radius.
    pub radius: SearchRadius,

    /// The scalar field. Required.
    pub field: Option<ScalarAttribute>,

    /// Flow direction.
    pub direction: FlowDirection,

    /// Link only to the steepest neighbor per direction (default: true).
    pub steepest_only: bool,

    /// Minimum absolute slope for a link.
    pub min_slope: f64,
}

impl GradientProbe {
    /// Create a gradient probe without a field. Set one with
    /// [`with_field`](Self::with_field) before preparing.
    pub fn new(radius: impl Into<SearchRadius>) -> Self {
        Self {
            radius: radius.into(),
            field: None,
            direction: FlowDirection::default(),
            steepest_only: true,
            min_slope: 0.0,
        }
    }

    /// Set the scalar field.
    pub fn with_field(mut self, field: impl Into<ScalarAttribute>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set the flow direction.
    pub fn with_direction(mut self, direction: FlowDirection) -> Self {
        self.direction = direction;
        self
    }

    /// Link to every neighbor passing the slope filter, not just the steepest.
    pub fn all_slopes(mut self) -> Self {
        self.steepest_only = false;
        self
    }

    /// Set the minimum absolute slope.
    pub fn with_min_slope(mut self, min_slope: f64) -> Self {
        self.min_slope = min_slope;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    /// - [`GraphError::MissingAttribute`] without a field
    /// - [`GraphError::InvalidParameter`] for a negative or non-finite `min_slope`
    /// - radius and field length errors
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        let field = self.field.as_ref().ok_or(GraphError::MissingAttribute {
            probe: "gradient",
            attribute: "field",
        })?;
        field.validate("field", ctx.num_points())?;
        self.radius.validate(ctx.num_points())?;

        if !(self.min_slope.is_finite() && self.min_slope >= 0.0) {
            return Err(GraphError::invalid_param(
                "min_slope",
                self.min_slope,
                "must be non-negative and finite",
            ));
        }
        Ok(())
    }

    /// Link each generator along the field.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        let Some(field) = self.field.as_ref() else {
            return;
        };

        let up = self.direction.uphill();
        let down = self.direction.downhill();
        let min_slope = self.min_slope;

        let found = collect_from_generators(ctx, |a, local| {
            let va = field.get(a);
            if !va.is_finite() {
                return;
            }

            let mut steepest_up: Option<(usize, f64)> = None;
            let mut steepest_down: Option<(usize, f64)> = None;

            for c in gather_candidates(ctx, a, self.radius.resolve(a)) {
                if c.distance <= 0.0 {
                    continue;
                }
                let slope = (field.get(c.index) - va) / c.distance;
                if !slope.is_finite() {
                    continue;
                }

                if up && slope > min_slope {
                    if !self.steepest_only {
                        local.insert(a, c.index);
                    } else if steepest_up.map_or(true, |(_, s)| slope > s) {
                        steepest_up = Some((c.index, slope));
                    }
                }
                if down && slope < -min_slope {
                    if !self.steepest_only {
                        local.insert(a, c.index);
                    } else if steepest_down.map_or(true, |(_, s)| slope < s) {
                        steepest_down = Some((c.index, slope));
                    }
                }
            }

            for (b, _) in steepest_up.into_iter().chain(steepest_down) {
                local.insert(a, b);
            }
        });
        edges.extend_from(&found);
    }
}
