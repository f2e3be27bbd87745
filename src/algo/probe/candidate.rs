//! Neighbor gathering shared by all probes.

use nalgebra::Vector3;

use super::ProbeContext;
use crate::spatial::Aabb;

/// A point found within the search radius of a probing point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// Index of the neighbor.
    pub index: usize,
    /// Euclidean distance to the neighbor.
    pub distance: f64,
    /// Squared distance to the neighbor.
    pub distance_squared: f64,
    /// Unit direction from the probing point to the neighbor. Zero for
    /// coincident points.
    pub direction: Vector3<f64>,
}

/// Neighbors of `point` within `radius` that accept connections.
///
/// Sorted by ascending distance, ties by index. The point itself is never
/// included.
pub fn gather_candidates(ctx: &ProbeContext<'_>, point: usize, radius: f64) -> Vec<Candidate> {
    gather_candidates_with(ctx, point, radius, |j| ctx.accepts(j))
}

/// Neighbors of `point` within `radius` that pass `filter`.
///
/// Sorted by ascending distance, ties by index.
pub fn gather_candidates_with<F>(
    ctx: &ProbeContext<'_>,
    point: usize,
    radius: f64,
    filter: F,
) -> Vec<Candidate>
where
    F: Fn(usize) -> bool,
{
    if !(radius.is_finite() && radius > 0.0) {
        return Vec::new();
    }

    let origin = ctx.position(point);
    let radius_squared = radius * radius;
    let bounds = Aabb::from_center_extent(*origin, radius);
    let num_points = ctx.num_points();

    let mut found = Vec::new();
    ctx.index().for_each_in_box(&bounds, &mut |j| {
        if j == point || j >= num_points || !filter(j) {
            return;
        }
        let offset = ctx.position(j) - origin;
        let distance_squared = offset.norm_squared();
        if distance_squared > radius_squared {
            return;
        }
        let distance = distance_squared.sqrt();
        let direction = if distance > 0.0 {
            offset / distance
        } else {
            Vector3::zeros()
        };
        found.push(Candidate {
            index: j,
            distance,
            distance_squared,
            direction,
        });
    });

    found.sort_by(|a, b| {
        a.distance_squared
            .total_cmp(&b.distance_squared)
            .then_with(|| a.index.cmp(&b.index))
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::HashGrid;
    use nalgebra::Point3;

    fn line_points() -> Vec<Point3<f64>> {
        (0..6).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect()
    }

    #[test]
    fn test_sorted_and_excludes_self() {
        let points = line_points();
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);

        let found = gather_candidates(&ctx, 2, 2.0);
        let ids: Vec<usize> = found.iter().map(|c| c.index).collect();
        assert_eq!(ids, vec![1, 3, 0, 4]);

        assert!((found[0].distance - 1.0).abs() < 1e-10);
        assert!((found[0].distance_squared - 1.0).abs() < 1e-10);
        assert!((found[0].direction - Vector3::new(-1.0, 0.0, 0.0)).norm() < 1e-10);
    }

    #[test]
    fn test_respects_accept_flags() {
        let points = line_points();
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid)
            .with_connectables(vec![true, false, true, true, true, true])
            .unwrap();

        let ids: Vec<usize> = gather_candidates(&ctx, 2, 1.5)
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(ids, vec![3]);
    }

    #[test]
    fn test_invalid_radius_finds_nothing() {
        let points = line_points();
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);
        assert!(gather_candidates(&ctx, 0, 0.0).is_empty());
        assert!(gather_candidates(&ctx, 0, f64::NAN).is_empty());
    }

    #[test]
    fn test_custom_filter() {
        let points = line_points();
        let grid = HashGrid::from_points(&points, 1.0).unwrap();
        let ctx = ProbeContext::new(&points, &grid);
        let ids: Vec<usize> = gather_candidates_with(&ctx, 0, 10.0, |j| j % 2 == 0)
            .iter()
            .map(|c| c.index)
            .collect();
        assert_eq!(ids, vec![2, 4]);
    }
}
