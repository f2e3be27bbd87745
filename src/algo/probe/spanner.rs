//! Greedy geometric spanner.
//!
//! Candidate pairs are visited shortest first. A pair becomes an edge only if
//! the graph built so far has no path between its endpoints of length at most
//! `stretch_factor` times their distance. The output is a t-spanner of the
//! candidate graph: every candidate pair ends up connected by a path no longer
//! than `t * distance`.
//!
//! Later decisions depend on earlier ones, so this probe always runs on a
//! single thread.

use super::{gather_candidates_with, ProbeContext, SearchRadius};
use crate::algo::shortest_path::{path_distance, Adjacency};
use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;

/// An eligible point pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpannerCandidate {
    /// First endpoint (the point it was discovered from).
    pub a: usize,
    /// Second endpoint.
    pub b: usize,
    /// Euclidean distance between the endpoints.
    pub distance: f64,
}

/// Greedy spanner probe.
#[derive(Debug, Clone)]
pub struct SpannerProbe {
    /// Neighborhood radius.
    pub radius: SearchRadius,

    /// Allowed detour factor `t >= 1`.
    pub stretch_factor: f64,

    /// Cap on the number of candidate pairs (shortest are kept).
    pub max_candidates: usize,
}

impl SpannerProbe {
    /// Create a spanner probe with default options.
    pub fn new(radius: impl Into<SearchRadius>) -> Self {
        Self {
            radius: radius.into(),
            stretch_factor: 2.0,
            max_candidates: 100_000,
        }
    }

    /// Set the stretch factor.
    pub fn with_stretch_factor(mut self, t: f64) -> Self {
        self.stretch_factor = t;
        self
    }

    /// Set the candidate cap.
    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    /// Validate configuration.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] if `stretch_factor < 1` or
    /// `max_candidates == 0`, or a radius error.
    pub fn prepare(&mut self, ctx: &ProbeContext<'_>) -> Result<()> {
        self.radius.validate(ctx.num_points())?;

        if !(self.stretch_factor.is_finite() && self.stretch_factor >= 1.0) {
            return Err(GraphError::invalid_param(
                "stretch_factor",
                self.stretch_factor,
                "must be finite and >= 1",
            ));
        }
        if self.max_candidates == 0 {
            return Err(GraphError::invalid_param(
                "max_candidates",
                self.max_candidates,
                "must be at least 1",
            ));
        }
        Ok(())
    }

    /// All eligible pairs sorted by ascending distance.
    ///
    /// A pair is eligible when one endpoint generates and the other accepts.
    /// Pairs are discovered in ascending point order, deduplicated, stably
    /// sorted (equal distances keep discovery order) and cut to
    /// `max_candidates`.
    pub fn candidates(&self, ctx: &ProbeContext<'_>) -> Vec<SpannerCandidate> {
        let mut seen = EdgeSet::new();
        let mut list = Vec::new();

        for a in 0..ctx.num_points() {
            if !ctx.is_active(a) {
                continue;
            }
            let eligible = |b: usize| {
                (ctx.can_generate(a) && ctx.accepts(b)) || (ctx.can_generate(b) && ctx.accepts(a))
            };
            for c in gather_candidates_with(ctx, a, self.radius.resolve(a), eligible) {
                if seen.insert(a, c.index) {
                    list.push(SpannerCandidate {
                        a,
                        b: c.index,
                        distance: c.distance,
                    });
                }
            }
        }

        list.sort_by(|x, y| x.distance.total_cmp(&y.distance));

        if list.len() > self.max_candidates {
            log::debug!(
                "spanner: keeping {} of {} candidates",
                self.max_candidates,
                list.len()
            );
            list.truncate(self.max_candidates);
        }
        list
    }

    /// Feed sorted candidates through the greedy test.
    ///
    /// `adjacency` holds the graph built so far and grows with every accepted
    /// edge. Accepted edges are also added to `edges`. Returns the number of
    /// accepted candidates.
    pub fn grow(
        &self,
        candidates: &[SpannerCandidate],
        adjacency: &mut Adjacency,
        edges: &mut EdgeSet,
    ) -> usize {
        let mut accepted = 0;
        for c in candidates {
            let limit = self.stretch_factor * c.distance;
            if path_distance(adjacency, c.a, c.b, limit) > limit {
                adjacency.add_edge(c.a, c.b, c.distance);
                edges.insert(c.a, c.b);
                accepted += 1;
            }
        }
        accepted
    }

    /// Build the spanner over all candidates.
    pub fn process_all(&self, ctx: &ProbeContext<'_>, edges: &mut EdgeSet) {
        let candidates = self.candidates(ctx);
        let mut adjacency = Adjacency::new(ctx.num_points());
        let accepted = self.grow(&candidates, &mut adjacency, edges);
        log::debug!(
            "spanner: accepted {} of {} candidates (t = {})",
            accepted,
            candidates.len(),
            self.stretch_factor
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::HashGrid;
    use nalgebra::Point3;

    /// Jittered grid without randomness.
    fn create_jittered_grid(n: usize) -> Vec<Point3<f64>> {
        let mut points = Vec::new();
        for j in 0..n {
            for i in 0..n {
                let k = (j * n + i) as f64;
                points.push(Point3::new(
                    i as f64 + 0.2 * (k * 1.7).sin(),
                    j as f64 + 0.2 * (k * 2.3).cos(),
                    0.0,
                ));
            }
        }
        points
    }

    #[test]
    fn test_invalid_options() {
        let points = create_jittered_grid(2);
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        assert!(SpannerProbe::new(2.0)
            .with_stretch_factor(0.5)
            .prepare(&ctx)
            .is_err());
        assert!(SpannerProbe::new(2.0)
            .with_max_candidates(0)
            .prepare(&ctx)
            .is_err());
        assert!(SpannerProbe::new(2.0).prepare(&ctx).is_ok());
    }

    #[test]
    fn test_candidates_sorted_and_unique() {
        let points = create_jittered_grid(4);
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let probe = SpannerProbe::new(1.6);
        let candidates = probe.candidates(&ctx);
        assert!(!candidates.is_empty());

        let mut seen = EdgeSet::new();
        for pair in candidates.windows(2) {
            assert!(pair[0].distance <= pair[1].distance);
        }
        for c in &candidates {
            assert!(c.a < c.b, "pairs are discovered from the lower index");
            assert!(seen.insert(c.a, c.b));
        }
    }

    #[test]
    fn test_candidate_cap_keeps_shortest() {
        let points = create_jittered_grid(4);
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let all = SpannerProbe::new(1.6).candidates(&ctx);
        let capped = SpannerProbe::new(1.6).with_max_candidates(5).candidates(&ctx);
        assert_eq!(capped.len(), 5);
        assert_eq!(&all[..5], &capped[..]);
    }

    #[test]
    fn test_stretch_property() {
        let points = create_jittered_grid(6);
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let t = 1.5;
        let mut probe = SpannerProbe::new(2.0).with_stretch_factor(t);
        probe.prepare(&ctx).unwrap();

        let mut edges = EdgeSet::new();
        probe.process_all(&ctx, &mut edges);
        assert!(!edges.is_empty());

        let candidates = probe.candidates(&ctx);
        assert!(edges.len() < candidates.len());

        // Every candidate pair has a short enough path in the output
        let adjacency = Adjacency::from_edges(&edges, &points);
        for c in &candidates {
            let limit = t * c.distance;
            let d = path_distance(&adjacency, c.a, c.b, limit + 1e-9);
            assert!(d <= limit + 1e-9, "pair {}-{} stretched to {}", c.a, c.b, d);
        }
    }

    #[test]
    fn test_replay_accepts_only_necessary_edges() {
        let points = create_jittered_grid(5);
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let probe = SpannerProbe::new(1.8).with_stretch_factor(1.3);
        let candidates = probe.candidates(&ctx);

        let mut adjacency = Adjacency::new(points.len());
        let mut edges = EdgeSet::new();
        let accepted = probe.grow(&candidates, &mut adjacency, &mut edges);
        assert_eq!(accepted, edges.len());

        // Replaying: each accepted edge had no short path before it was added
        let mut replay = Adjacency::new(points.len());
        for c in &candidates {
            let limit = 1.3 * c.distance;
            let before = path_distance(&replay, c.a, c.b, limit);
            if edges.contains(c.a, c.b) {
                assert!(before > limit);
                replay.add_edge(c.a, c.b, c.distance);
            } else {
                assert!(before <= limit);
            }
        }
    }

    #[test]
    fn test_stretch_one_keeps_collinear_shortcuts_out() {
        // Collinear points: 0-2 is exactly as long as 0-1-2
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let probe = SpannerProbe::new(2.5).with_stretch_factor(1.0);
        let mut edges = EdgeSet::new();
        probe.process_all(&ctx, &mut edges);
        assert_eq!(edges.len(), 2);
        assert!(!edges.contains(0, 2));
    }

    #[test]
    fn test_generator_flags() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        // Only the middle point generates, nobody accepts the middle
        let ctx = ProbeContext::new(&points, &grid)
            .with_generators(vec![false, true, false])
            .unwrap()
            .with_connectables(vec![true, false, true])
            .unwrap();

        let candidates = SpannerProbe::new(2.5).candidates(&ctx);
        let pairs: Vec<(usize, usize)> = candidates.iter().map(|c| (c.a, c.b)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 2)]);
    }
}
