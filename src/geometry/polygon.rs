//! Planar polygon measurements.
//!
//! Polygons are slices of 2D points with an implicit closing segment from the
//! last point back to the first.

use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};

/// Orientation of a closed polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Winding {
    /// Negative signed area.
    Clockwise,
    /// Positive signed area.
    #[default]
    CounterClockwise,
}

impl Winding {
    /// Winding implied by a signed area. Zero counts as counter-clockwise.
    #[inline]
    pub fn of(signed_area: f64) -> Self {
        if signed_area < 0.0 {
            Winding::Clockwise
        } else {
            Winding::CounterClockwise
        }
    }
}

/// Signed area (shoelace formula). Positive for counter-clockwise polygons.
pub fn signed_area(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }

    let mut twice = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        twice += a.x * b.y - b.x * a.y;
    }
    twice * 0.5
}

/// Length of the closed boundary.
pub fn perimeter(polygon: &[Point2<f64>]) -> f64 {
    let n = polygon.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| (polygon[(i + 1) % n] - polygon[i]).norm())
        .sum()
}

/// Isoperimetric quotient `4 * pi * area / perimeter^2`, 1 for a circle.
pub fn compactness(area: f64, perimeter: f64) -> f64 {
    if perimeter <= 0.0 {
        return 0.0;
    }
    (4.0 * PI * area.abs() / (perimeter * perimeter)).clamp(0.0, 1.0)
}

/// Area centroid, or the vertex average for polygons without area.
pub fn centroid(polygon: &[Point2<f64>]) -> Point2<f64> {
    let n = polygon.len();
    if n == 0 {
        return Point2::origin();
    }

    let mut cx = 0.0;
    let mut cy = 0.0;
    let mut twice_area = 0.0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        let cross = a.x * b.y - b.x * a.y;
        twice_area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
    }

    if twice_area.abs() < f64::EPSILON {
        let sum = polygon
            .iter()
            .fold(Vector2::zeros(), |acc, p| acc + p.coords);
        return Point2::from(sum / n as f64);
    }

    let k = 1.0 / (3.0 * twice_area);
    Point2::new(cx * k, cy * k)
}

/// Axis-aligned bounds `(min, max)`, or `None` for an empty polygon.
pub fn bounds(polygon: &[Point2<f64>]) -> Option<(Point2<f64>, Point2<f64>)> {
    let first = polygon.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &polygon[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

/// Check whether every turn goes the same way. Straight collinear runs are
/// allowed. Repeated consecutive points are ignored.
pub fn is_convex(polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    let points: Vec<Point2<f64>> = (0..n)
        .filter(|&i| polygon[i] != polygon[(i + 1) % n])
        .map(|i| polygon[i])
        .collect();
    let n = points.len();
    if n < 3 {
        return false;
    }

    let mut sign = 0.0;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        let (ab, bc) = (b - a, c - b);
        let turn = cross(&ab, &bc);
        if turn.abs() < 1e-12 {
            // Doubling back is a reflex turn
            if ab.dot(&bc) < 0.0 {
                return false;
            }
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

/// Crossing-number point-in-polygon test.
pub fn is_point_in_polygon(point: &Point2<f64>, polygon: &[Point2<f64>]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x = pi.x + (point.y - pi.y) * (pj.x - pi.x) / (pj.y - pi.y);
            if point.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Check whether two boundary segments properly cross.
///
/// `nodes[i]` is the graph node behind `polygon[i]`. Segments that share a
/// node touch by construction and are never compared, which also skips the
/// back-and-forth segments produced by dangling edges.
pub fn has_self_crossing(polygon: &[Point2<f64>], nodes: &[usize]) -> bool {
    let n = polygon.len();
    if n < 4 || nodes.len() != n {
        return false;
    }

    for i in 0..n {
        let i2 = (i + 1) % n;
        for j in (i + 1)..n {
            let j2 = (j + 1) % n;
            let shares = nodes[i] == nodes[j]
                || nodes[i] == nodes[j2]
                || nodes[i2] == nodes[j]
                || nodes[i2] == nodes[j2];
            if shares {
                continue;
            }
            if segments_cross(&polygon[i], &polygon[i2], &polygon[j], &polygon[j2]) {
                return true;
            }
        }
    }
    false
}

#[inline]
fn cross(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

#[inline]
fn orient(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> f64 {
    cross(&(b - a), &(c - a))
}

/// Proper crossing: the segments intersect at a single interior point.
fn segments_cross(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>, d: &Point2<f64>) -> bool {
    let d1 = orient(a, b, c);
    let d2 = orient(a, b, d);
    let d3 = orient(c, d, a);
    let d4 = orient(c, d, b);
    d1 * d2 < 0.0 && d3 * d4 < 0.0
}
