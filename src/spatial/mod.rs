//! Spatial queries over point sets.
//!
//! Probes never walk the point cloud directly. They ask a [`SpatialIndex`]
//! for the points inside an axis-aligned box and then filter by exact
//! distance. [`HashGrid`] is the bundled implementation; any structure that
//! can enumerate point indices inside a box can stand in for it.

mod grid;

pub use grid::HashGrid;

use nalgebra::{Point3, Vector3};

/// Something that can report which points fall inside a box.
///
/// Implementations must be safe to query from several rayon workers at once.
pub trait SpatialIndex: Sync {
    /// Call `visit` once for every indexed point inside `bounds`.
    fn for_each_in_box(&self, bounds: &Aabb, visit: &mut dyn FnMut(usize));
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Point3<f64>,
    /// Maximum corner.
    pub max: Point3<f64>,
}

impl Aabb {
    /// Create a box from its corners.
    pub fn new(min: Point3<f64>, max: Point3<f64>) -> Self {
        Self { min, max }
    }

    /// Create a cube of half-size `extent` around `center`.
    pub fn from_center_extent(center: Point3<f64>, extent: f64) -> Self {
        let e = Vector3::repeat(extent);
        Self {
            min: center - e,
            max: center + e,
        }
    }

    /// The tightest box around `points`, or `None` if there are none.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut min = *first;
        let mut max = *first;

        for p in &points[1..] {
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        Some(Self { min, max })
    }

    /// Check whether `p` lies inside the box (boundary included).
    #[inline]
    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    /// Check whether two boxes overlap.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        (0..3).all(|i| self.min[i] <= other.max[i] && other.min[i] <= self.max[i])
    }

    /// The center of the box.
    #[inline]
    pub fn center(&self) -> Point3<f64> {
        nalgebra::center(&self.min, &self.max)
    }

    /// The full size of the box along each axis.
    #[inline]
    pub fn extent(&self) -> Vector3<f64> {
        self.max - self.min
    }
}

/// Brute-force index over a point list. Useful for small inputs.
impl SpatialIndex for Vec<Point3<f64>> {
    fn for_each_in_box(&self, bounds: &Aabb, visit: &mut dyn FnMut(usize)) {
        for (i, p) in self.iter().enumerate() {
            if bounds.contains(p) {
                visit(i);
            }
        }
    }
}
