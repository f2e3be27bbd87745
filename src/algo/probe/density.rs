//! Density connectivity (DBSCAN-style).
//!
//! A point is **core** when at least `min_points` other active points lie
//! within its radius. Core points link to their neighbors; non-core points
//! next to a core point are **border** points and may link back to the core;
//! everything else is **noise**.

use rayon::prelude::*;

use super::{
    collect_from_generators, gather_candidates, gather_candidates_with, ProbeContext,
    SearchRadius,
};
use crate::error::Result;
use crate::graph::EdgeSet;

/// Which neighbors a core point links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoreLinks {
    /// Every accepting neighbor.
    #[default]
    All,
    /// Only accepting core neighbors.
    CoreOnly,
}

/// Which neighbors a border point links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderLinks {
    /// Border points generate no edges.
    None,
    /// The closest accepting core neighbor.
    #[default]
    NearestCore,
    /// Every accepting core neighbor.
    AllCore,
}

/// Classification of a point after [`DensityProbe::prepare`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityClass {
    /// Enough neighbors to be dense.
    Core,
    /// Not dense, but next to a core point.
    Border,
    /// Not dense and no core point nearby.
    Noise,
    /// Neither generates nor accepts edges.
    Skipped,
}

/// DBSCAN-style connectivity probe.
#[derive(Debug, Clone)]
pub struct DensityProbe {
    /// Neighborhood radius.
    pub radius: SearchRadius,

    /// Minimum neighbor count (the point itself excluded) for a core point.
    pub min_points: usize,

    /// Links made by core points.
    pub core_links: CoreLinks,

    /// Links made by border points.
    pub border_links: BorderLinks,

    classes: Vec<DensityClass>,
}

impl DensityProbe {
    /// Create a density probe with default options.
    pub fn new(radius: impl Into<SearchRadius>) -> Self {
        Self {
            radius: radius.into(),
            min_points: 4,
            core_links: CoreLinks::default(),
            border_links: BorderLinks::default(),
            classes: Vec::new(),
        }
    }

    /// Set the minimum neighbor count.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Set which neighbors core points link to.
    pub fn with_core_links(mut self, links: CoreLinks) -> Self {
        self.core_links = links;
        self
    }

    /// Set which neighbors border points link to.
    pub fn with_border_links(mut self, links: BorderLinks) -> Self {
        self.border_links = links;
        self
    }

    /// Classify every point.
    ///
    /// # Errors
    /// Fails if the radius is invalid.
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        self.radius.validate(ctx.num_points())?;

        let n = ctx.num_points();
        let radius = &self.radius;
        let count_neighbors = |i: usize| -> Option<usize> {
            if !ctx.is_active(i) {
                return None;
            }
            let r = radius.resolve(i);
            Some(gather_candidates_with(ctx, i, r, |j| ctx.is_active(j)).len())
        };

        let counts: Vec<Option<usize>> = if ctx.is_parallel() {
            (0..n).into_par_iter().map(count_neighbors).collect()
        } else {
            (0..n).map(count_neighbors).collect()
        };

        let min_points = self.min_points;
        let is_core = |j: usize| counts[j].is_some_and(|c| c >= min_points);
        let classify = |i: usize| -> DensityClass {
            if counts[i].is_none() {
                return DensityClass::Skipped;
            }
            if is_core(i) {
                return DensityClass::Core;
            }
            let r = radius.resolve(i);
            let near_core = gather_candidates_with(ctx, i, r, |j| ctx.is_active(j))
                .iter()
                .any(|c| is_core(c.index));
            if near_core {
                DensityClass::Border
            } else {
                DensityClass::Noise
            }
        };

        self.classes = if ctx.is_parallel() {
            (0..n).into_par_iter().map(classify).collect()
        } else {
            (0..n).map(classify).collect()
        };

        log::debug!(
            "density: {} core points out of {}",
            self.classes
                .iter()
                .filter(|&&c| c == DensityClass::Core)
                .count(),
            n
        );
        Ok(())
    }

    /// Class of point `i`. Points are [`DensityClass::Skipped`] until the
    /// probe is prepared.
    #[inline]
    pub fn class_of(&self, i: usize) -> DensityClass {
        self.classes
            .get(i)
            .copied()
            .unwrap_or(DensityClass::Skipped)
    }

    /// Check whether point `i` is a core point.
    #[inline]
    pub fn is_core(&self, i: usize) -> bool {
        self.class_of(i) == DensityClass::Core
    }

    /// Link core and border points according to the configured policies.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        let found = collect_from_generators(ctx, |i, local| {
            let class = self.class_of(i);
            if !matches!(class, DensityClass::Core | DensityClass::Border) {
                return;
            }
            if class == DensityClass::Border && self.border_links == BorderLinks::None {
                return;
            }

            let candidates = gather_candidates(ctx, i, self.radius.resolve(i));
            match class {
                DensityClass::Core => {
                    for c in &candidates {
                        if self.core_links == CoreLinks::All || self.is_core(c.index) {
                            local.insert(i, c.index);
                        }
                    }
                }
                DensityClass::Border => {
                    let mut cores = candidates.iter().filter(|c| self.is_core(c.index));
                    match self.border_links {
                        BorderLinks::NearestCore => {
                            if let Some(c) = cores.next() {
                                local.insert(i, c.index);
                            }
                        }
                        BorderLinks::AllCore => {
                            for c in cores {
                                local.insert(i, c.index);
                            }
                        }
                        BorderLinks::None => {}
                    }
                }
                DensityClass::Noise | DensityClass::Skipped => {}
            }
        });
        edges.extend_from(&found);
    }
}
