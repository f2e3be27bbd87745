//! Angular cone probes (Yao and Theta graphs).
//!
//! Space around each point is split into `num_cones` cones, each described by
//! its bisector direction. Every neighbor falls into the cone whose bisector is
//! closest in angle to the direction toward it, and each cone keeps one
//! neighbor:
//!
//! - **Yao**: the nearest one
//! - **Theta**: the one whose projection onto the bisector is shortest

use std::f64::consts::PI;

use nalgebra::Vector3;

use super::{collect_from_generators, gather_candidates, ProbeContext, SearchRadius};
use crate::error::{GraphError, Result};
use crate::geometry::Projection;
use crate::graph::EdgeSet;

/// Which neighbor each cone keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConeVariant {
    /// Smallest Euclidean distance.
    #[default]
    Yao,
    /// Smallest distance along the cone bisector.
    Theta,
}

/// How cone bisectors are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConeLayout {
    /// Evenly around the axis, in the plane perpendicular to it.
    #[default]
    Planar,
    /// Over the whole sphere on a Fibonacci lattice whose pole is the axis.
    Spherical,
}

/// Angular cone probe.
#[derive(Debug, Clone)]
pub struct ConeProbe {
    /// Neighborhood radius.
    pub radius: SearchRadius,

    /// Number of cones (at least 1).
    pub num_cones: usize,

    /// Reference axis.
    pub axis: Vector3<f64>,

    /// Selection rule within each cone.
    pub variant: ConeVariant,

    /// Bisector layout.
    pub layout: ConeLayout,

    bisectors: Vec<Vector3<f64>>,
}

impl ConeProbe {
    /// Create a Yao probe with six planar cones around `+Z`.
    pub fn new(radius: impl Into<SearchRadius>) -> Self {
        Self {
            radius: radius.into(),
            num_cones: 6,
            axis: Vector3::z(),
            variant: ConeVariant::default(),
            layout: ConeLayout::default(),
            bisectors: Vec::new(),
        }
    }

    /// Set the number of cones.
    pub fn with_num_cones(mut self, num_cones: usize) -> Self {
        self.num_cones = num_cones;
        self
    }

    /// Set the reference axis.
    pub fn with_axis(mut self, axis: Vector3<f64>) -> Self {
        self.axis = axis;
        self
    }

    /// Set the selection rule.
    pub fn with_variant(mut self, variant: ConeVariant) -> Self {
        self.variant = variant;
        self
    }

    /// Set the bisector layout.
    pub fn with_layout(mut self, layout: ConeLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Unit bisector directions for the current configuration.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] for zero cones or a zero axis.
    pub fn bisectors(&self) -> Result<Vec<Vector3<f64>>> {
        if self.num_cones == 0 {
            return Err(GraphError::invalid_param(
                "num_cones",
                self.num_cones,
                "must be at least 1",
            ));
        }

        let frame = Projection::from_normal(self.axis)?;
        let (u, v) = frame.axes();
        let w = frame.normal();
        let n = self.num_cones;

        let dirs = match self.layout {
            ConeLayout::Planar => {
                let sector = 2.0 * PI / n as f64;
                (0..n)
                    .map(|k| {
                        let theta = (k as f64 + 0.5) * sector;
                        u * theta.cos() + v * theta.sin()
                    })
                    .collect()
            }
            ConeLayout::Spherical => {
                let golden_angle = PI * (3.0 - 5.0_f64.sqrt());
                (0..n)
                    .map(|k| {
                        let z = 1.0 - (2.0 * k as f64 + 1.0) / n as f64;
                        let r = (1.0 - z * z).max(0.0).sqrt();
                        let phi = k as f64 * golden_angle;
                        (u * (r * phi.cos()) + v * (r * phi.sin()) + w * z).normalize()
                    })
                    .collect()
            }
        };
        Ok(dirs)
    }

    /// Validate configuration and cache the bisectors.
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        self.radius.validate(ctx.num_points())?;
        self.bisectors = self.bisectors()?;
        Ok(())
    }

    /// Index of the cone containing `direction`. Ties go to the lower index.
    fn cone_of(&self, direction: &Vector3<f64>) -> (usize, f64) {
        let mut best = (0, f64::NEG_INFINITY);
        for (k, b) in self.bisectors.iter().enumerate() {
            let dot = b.dot(direction);
            if dot > best.1 {
                best = (k, dot);
            }
        }
        best
    }

    /// Link each generator to the best neighbor of every cone.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        if self.bisectors.is_empty() {
            return;
        }

        let found = collect_from_generators(ctx, |a, local| {
            let mut best: Vec<Option<(f64, usize)>> = vec![None; self.bisectors.len()];

            for c in gather_candidates(ctx, a, self.radius.resolve(a)) {
                if c.distance <= 0.0 {
                    continue;
                }
                let (cone, dot) = self.cone_of(&c.direction);
                let score = match self.variant {
                    ConeVariant::Yao => c.distance,
                    ConeVariant::Theta => c.distance * dot,
                };

                let better = match best[cone] {
                    None => true,
                    Some((s, i)) => score < s || (score == s && c.index < i),
                };
                if better {
                    best[cone] = Some((score, c.index));
                }
            }

            for (_, b) in best.into_iter().flatten() {
                local.insert(a, b);
            }
        });
        edges.extend_from(&found);
    }
}
