//! Edge probing over point clouds.
//!
//! A probe looks at the neighborhood of each point and decides which pairs of
//! points become undirected edges. Five strategies are available:
//!
//! - [`DensityProbe`]: DBSCAN-style core/border connectivity
//! - [`GradientProbe`]: connect along the slope of a scalar field
//! - [`LevelSetProbe`]: connect points with similar field values
//! - [`SpannerProbe`]: greedy geometric t-spanner
//! - [`ConeProbe`]: Yao and Theta graphs over angular cones
//!
//! Probes share a two-step contract. `prepare` validates configuration and
//! caches per-pass state; an error there means the probe is skipped.
//! `process_all` then appends edges to an [`EdgeSet`]. Points whose
//! `can_generate` flag is off never originate edges, and edge targets always
//! accept connections.
//!
//! # Example
//!
//! ```
//! use plexus::algo::probe::{ConeProbe, DensityProbe, ProbeContext, ProbeOrchestrator};
//! use plexus::spatial::HashGrid;
//! use nalgebra::Point3;
//!
//! let points: Vec<Point3<f64>> = (0..25)
//!     .map(|i| Point3::new((i % 5) as f64, (i / 5) as f64, 0.0))
//!     .collect();
//! let grid = HashGrid::from_points(&points, 1.0).unwrap();
//! let ctx = ProbeContext::new(&points, &grid);
//!
//! let mut orchestrator = ProbeOrchestrator::new()
//!     .with_probe(DensityProbe::new(1.01))
//!     .with_probe(ConeProbe::new(1.5));
//! let report = orchestrator.run(&ctx);
//! assert!(report.skipped.is_empty());
//! assert!(!report.edges.is_empty());
//! ```

mod attribute;
mod candidate;
mod cone;
mod density;
mod gradient;
mod level_set;
mod orchestrator;
mod radius;
mod spanner;

pub use attribute::ScalarAttribute;
pub use candidate::{gather_candidates, gather_candidates_with, Candidate};
pub use cone::{ConeLayout, ConeProbe, ConeVariant};
pub use density::{BorderLinks, CoreLinks, DensityClass, DensityProbe};
pub use gradient::{FlowDirection, GradientProbe};
pub use level_set::LevelSetProbe;
pub use orchestrator::{ProbeOrchestrator, ProbeReport};
pub use radius::SearchRadius;
pub use spanner::{SpannerCandidate, SpannerProbe};

use nalgebra::Point3;
use rayon::prelude::*;

use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;
use crate::spatial::SpatialIndex;

/// Read-only inputs of one probing pass.
pub struct ProbeContext<'a> {
    positions: &'a [Point3<f64>],
    can_generate: Vec<bool>,
    accept_connections: Vec<bool>,
    index: &'a dyn SpatialIndex,
    parallel: bool,
}

impl<'a> ProbeContext<'a> {
    /// Create a context where every point generates and accepts edges.
    pub fn new(positions: &'a [Point3<f64>], index: &'a dyn SpatialIndex) -> Self {
        Self {
            positions,
            can_generate: vec![true; positions.len()],
            accept_connections: vec![true; positions.len()],
            index,
            parallel: true,
        }
    }

    /// Set which points may originate edges.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] if there is not one flag per point.
    pub fn with_generators(mut self, flags: Vec<bool>) -> Result<Self> {
        GraphError::check_len("generator flags", self.positions.len(), flags.len())?;
        self.can_generate = flags;
        Ok(self)
    }

    /// Set which points may be connected to.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] if there is not one flag per point.
    pub fn with_connectables(mut self, flags: Vec<bool>) -> Result<Self> {
        GraphError::check_len("connectable flags", self.positions.len(), flags.len())?;
        self.accept_connections = flags;
        Ok(self)
    }

    /// Set whether probes may use parallel execution (default: true).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.positions.len()
    }

    /// All positions.
    #[inline]
    pub fn positions(&self) -> &'a [Point3<f64>] {
        self.positions
    }

    /// Position of point `i`.
    #[inline]
    pub fn position(&self, i: usize) -> &'a Point3<f64> {
        &self.positions[i]
    }

    /// Check whether point `i` may originate edges.
    #[inline]
    pub fn can_generate(&self, i: usize) -> bool {
        self.can_generate[i]
    }

    /// Check whether point `i` may be connected to.
    #[inline]
    pub fn accepts(&self, i: usize) -> bool {
        self.accept_connections[i]
    }

    /// Check whether point `i` takes part in probing at all.
    #[inline]
    pub fn is_active(&self, i: usize) -> bool {
        self.can_generate[i] || self.accept_connections[i]
    }

    /// The spatial index.
    #[inline]
    pub fn index(&self) -> &'a dyn SpatialIndex {
        self.index
    }

    /// Check whether parallel execution is enabled.
    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }
}

impl std::fmt::Debug for ProbeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeContext")
            .field("num_points", &self.positions.len())
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

/// Run `emit` for every generator and collect the edges it proposes.
///
/// In parallel mode each rayon worker fills its own set and the sets are
/// merged at the end, so no locking is needed.
pub(crate) fn collect_from_generators<F>(ctx: &ProbeContext<'_>, emit: F) -> EdgeSet
where
    F: Fn(usize, &mut EdgeSet) + Sync + Send,
{
    let n = ctx.num_points();
    if ctx.is_parallel() {
        (0..n)
            .into_par_iter()
            .filter(|&i| ctx.can_generate(i))
            .fold(EdgeSet::new, |mut local, i| {
                emit(i, &mut local);
                local
            })
            .reduce(EdgeSet::new, EdgeSet::merge)
    } else {
        let mut edges = EdgeSet::new();
        for i in (0..n).filter(|&i| ctx.can_generate(i)) {
            emit(i, &mut edges);
        }
        edges
    }
}

/// One configured probing strategy.
#[derive(Debug, Clone)]
pub enum Probe {
    /// Density connectivity.
    Density(DensityProbe),
    /// Gradient flow.
    Gradient(GradientProbe),
    /// Level set.
    LevelSet(LevelSetProbe),
    /// Greedy spanner.
    Spanner(SpannerProbe),
    /// Angular cones.
    Cone(ConeProbe),
}

impl Probe {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Probe::Density(_) => "density",
            Probe::Gradient(_) => "gradient",
            Probe::LevelSet(_) => "level-set",
            Probe::Spanner(_) => "spanner",
            Probe::Cone(_) => "cone",
        }
    }

    /// The search radius of this probe.
    pub fn radius(&self) -> &SearchRadius {
        match self {
            Probe::Density(p) => &p.radius,
            Probe::Gradient(p) => &p.radius,
            Probe::LevelSet(p) => &p.radius,
            Probe::Spanner(p) => &p.radius,
            Probe::Cone(p) => &p.radius,
        }
    }

    /// Validate configuration and cache per-pass state.
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        match self {
            Probe::Density(p) => p.prepare(ctx),
            Probe::Gradient(p) => p.prepare(ctx),
            Probe::LevelSet(p) => p.prepare(ctx),
            Probe::Spanner(p) => p.prepare(ctx),
            Probe::Cone(p) => p.prepare(ctx),
        }
    }

    /// Append this probe's edges to `edges`.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        match self {
            Probe::Density(p) => p.process_all(ctx, edges),
            Probe::Gradient(p) => p.process_all(ctx, edges),
            Probe::LevelSet(p) => p.process_all(ctx, edges),
            Probe::Spanner(p) => p.process_all(ctx, edges),
            Probe::Cone(p) => p.process_all(ctx, edges),
        }
    }
}

impl From<DensityProbe> for Probe {
    fn from(p: DensityProbe) -> Self {
        Probe::Density(p)
    }
}

impl From<GradientProbe> for Probe {
    fn from(p: GradientProbe) -> Self {
        Probe::Gradient(p)
    }
}

impl From<LevelSetProbe> for Probe {
    fn from(p: LevelSetProbe) -> Self {
        Probe::LevelSet(p)
    }
}

impl From<SpannerProbe> for Probe {
    fn from(p: SpannerProbe) -> Self {
        Probe::Spanner(p)
    }
}

impl From<ConeProbe> for Probe {
    fn from(p: ConeProbe) -> Self {
        Probe::Cone(p)
    }
}
