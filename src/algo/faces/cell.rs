//! Cells: validated polygons built from enumerated faces.

use nalgebra::Point2;

use crate::geometry::polygon::{self, Winding};
use crate::graph::{FaceId, HalfEdgeId, NodeId};

/// Relative tolerance below which a face encloses no area.
const AREA_EPSILON: f64 = 1e-10;

/// Check whether `area` is negligible for a shape whose bounding box has the
/// given diagonal.
#[inline]
pub(crate) fn is_negligible_area(area: f64, diagonal: f64) -> bool {
    area.abs() <= AREA_EPSILON * diagonal * diagonal
}

/// One closed walk around a face, as enumerated.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFace {
    /// Face index, equal to the position in the enumerated list.
    pub id: FaceId,

    /// Origin node of every half-edge on the walk, in walk order.
    pub nodes: Vec<NodeId>,

    /// The half-edges walked, `halfedges[i]` leaves `nodes[i]`.
    pub halfedges: Vec<HalfEdgeId>,

    /// Signed area of the walk. Bounded faces are positive, the unbounded
    /// face negative.
    pub signed_area: f64,
}

impl RawFace {
    /// Number of nodes on the walk (leaf neighbors count twice).
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the walk is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Winding of the walk.
    #[inline]
    pub fn winding(&self) -> Winding {
        Winding::of(self.signed_area)
    }
}

/// Measurements of a cell polygon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellData {
    /// Unsigned area.
    pub area: f64,
    /// Signed area of the face as walked.
    pub signed_area: f64,
    /// Boundary length.
    pub perimeter: f64,
    /// `4 * pi * area / perimeter^2`.
    pub compactness: f64,
    /// Area centroid.
    pub centroid: Point2<f64>,
    /// Bounding box minimum.
    pub min: Point2<f64>,
    /// Bounding box maximum.
    pub max: Point2<f64>,
    /// Whether the polygon is convex.
    pub is_convex: bool,
    /// Whether the face was walked clockwise (the unbounded face).
    pub is_clockwise: bool,
    /// Whether any boundary node is a leaf.
    pub has_leaves: bool,
}

impl CellData {
    /// Length of the bounding box diagonal.
    #[inline]
    pub fn bounds_size(&self) -> f64 {
        (self.max - self.min).norm()
    }
}

/// A polygon bounded by graph edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// The face this cell was built from.
    pub face: FaceId,
    /// Boundary nodes, smallest index first, in the requested winding.
    pub nodes: Vec<NodeId>,
    /// Boundary positions matching `nodes`.
    pub polygon: Vec<Point2<f64>>,
    /// Measurements.
    pub data: CellData,
}

impl Cell {
    /// Check whether a point lies inside the cell.
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        polygon::is_point_in_polygon(point, &self.polygon)
    }

    /// Number of boundary points.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check whether the cell has no boundary.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Convexity filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectFilter {
    /// Keep every cell.
    #[default]
    Both,
    /// Keep convex cells only.
    ConvexOnly,
    /// Keep concave cells only.
    ConcaveOnly,
}

/// Why a geometrically valid cell was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// The boundary touches a leaf node.
    Leaves,
    /// Too few or too many boundary nodes.
    PointCount,
    /// A boundary segment is too short or too long.
    SegmentLength,
    /// Bounding box diagonal out of range.
    BoundsSize,
    /// Perimeter out of range.
    Perimeter,
    /// Compactness out of range.
    Compactness,
    /// Area out of range.
    Area,
    /// Wrong convexity.
    Aspect,
    /// The cell contains a hole point.
    Hole,
    /// An earlier face produced the same boundary.
    Duplicate,
    /// The area is within [`CellConstraints::wrapper_tolerance`] of the
    /// unbounded face's area.
    Wrapper,
}

/// Why a face could not become a cell at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degeneracy {
    /// Fewer than three boundary points.
    TooFewPoints,
    /// The boundary encloses no area.
    ZeroArea,
    /// Two boundary segments cross.
    SelfIntersecting,
}

/// Result of turning a [`RawFace`] into a [`Cell`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellOutcome {
    /// The cell passed every constraint.
    Success(Cell),
    /// The cell is valid geometry but a constraint rejected it.
    FailedConstraints {
        /// The rejected cell.
        cell: Cell,
        /// The first constraint that failed.
        reason: Rejection,
    },
    /// The face has no usable polygon.
    Degenerate(Degeneracy),
}

impl CellOutcome {
    /// Check whether the cell was accepted.
    #[inline]
    pub fn is_success(&self) -> bool {
        matches!(self, CellOutcome::Success(_))
    }

    /// The cell, accepted or rejected.
    pub fn cell(&self) -> Option<&Cell> {
        match self {
            CellOutcome::Success(cell) | CellOutcome::FailedConstraints { cell, .. } => Some(cell),
            CellOutcome::Degenerate(_) => None,
        }
    }
}

/// Limits applied when building cells.
///
/// # Example
///
/// ```
/// use plexus::algo::faces::{AspectFilter, CellConstraints};
///
/// let constraints = CellConstraints::default()
///     .with_area(0.5, f64::INFINITY)
///     .with_aspect(AspectFilter::ConvexOnly)
///     .with_keep_cells_with_leaves(false);
/// assert_eq!(constraints.min_point_count, 3);
/// ```
#[derive(Debug, Clone)]
pub struct CellConstraints {
    /// Output winding of cell polygons.
    pub winding: Winding,

    /// Convexity filter.
    pub aspect: AspectFilter,

    /// Keep cells whose boundary touches a leaf node (default: true).
    pub keep_cells_with_leaves: bool,

    /// Repeat leaf nodes in the output boundary (default: false).
    pub duplicate_leaf_points: bool,

    /// Route the unbounded face to [`FaceCells::wrapper`](super::FaceCells)
    /// instead of the cell list (default: true).
    pub omit_wrapper: bool,

    /// Still return the unbounded face as a cell when it is the only one
    /// (default: true).
    pub keep_wrapper_if_sole: bool,

    /// With `omit_wrapper`, also reject cells whose area differs from the
    /// unbounded face's area by at most this fraction of it. 0 disables.
    pub wrapper_tolerance: f64,

    /// Minimum number of walk nodes.
    pub min_point_count: usize,
    /// Maximum number of walk nodes.
    pub max_point_count: usize,

    /// Minimum bounding box diagonal.
    pub min_bounds_size: f64,
    /// Maximum bounding box diagonal.
    pub max_bounds_size: f64,

    /// Minimum area.
    pub min_area: f64,
    /// Maximum area.
    pub max_area: f64,

    /// Minimum perimeter.
    pub min_perimeter: f64,
    /// Maximum perimeter.
    pub max_perimeter: f64,

    /// Minimum boundary segment length.
    pub min_segment_length: f64,
    /// Maximum boundary segment length.
    pub max_segment_length: f64,

    /// Minimum compactness.
    pub min_compactness: f64,
    /// Maximum compactness.
    pub max_compactness: f64,

    /// Cells containing any of these points are rejected.
    pub holes: Vec<Point2<f64>>,
}

impl Default for CellConstraints {
    fn default() -> Self {
        Self {
            winding: Winding::CounterClockwise,
            aspect: AspectFilter::Both,
            keep_cells_with_leaves: true,
            duplicate_leaf_points: false,
            omit_wrapper: true,
            keep_wrapper_if_sole: true,
            wrapper_tolerance: 0.0,
            min_point_count: 3,
            max_point_count: usize::MAX,
            min_bounds_size: 0.0,
            max_bounds_size: f64::INFINITY,
            min_area: 0.0,
            max_area: f64::INFINITY,
            min_perimeter: 0.0,
            max_perimeter: f64::INFINITY,
            min_segment_length: 0.0,
            max_segment_length: f64::INFINITY,
            min_compactness: 0.0,
            max_compactness: 1.0,
            holes: Vec::new(),
        }
    }
}

impl CellConstraints {
    /// Set the output winding.
    pub fn with_winding(mut self, winding: Winding) -> Self {
        self.winding = winding;
        self
    }

    /// Set the convexity filter.
    pub fn with_aspect(mut self, aspect: AspectFilter) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set whether cells touching leaves are kept.
    pub fn with_keep_cells_with_leaves(mut self, keep: bool) -> Self {
        self.keep_cells_with_leaves = keep;
        self
    }

    /// Set whether leaf nodes are repeated in the boundary.
    pub fn with_duplicate_leaf_points(mut self, duplicate: bool) -> Self {
        self.duplicate_leaf_points = duplicate;
        self
    }

    /// Set whether the unbounded face is kept out of the cell list.
    pub fn with_omit_wrapper(mut self, omit: bool) -> Self {
        self.omit_wrapper = omit;
        self
    }

    /// Set whether a lone unbounded face is still returned.
    pub fn with_keep_wrapper_if_sole(mut self, keep: bool) -> Self {
        self.keep_wrapper_if_sole = keep;
        self
    }

    /// Set the relative area tolerance for cells mistaken for the wrapper.
    pub fn with_wrapper_tolerance(mut self, tolerance: f64) -> Self {
        self.wrapper_tolerance = tolerance;
        self
    }

    /// Check whether a cell of `area` matches the unbounded face's area.
    pub(crate) fn matches_wrapper(&self, area: f64, wrapper_area: f64) -> bool {
        self.omit_wrapper
            && self.wrapper_tolerance > 0.0
            && (area - wrapper_area).abs() <= self.wrapper_tolerance * wrapper_area
    }

    /// Set the node count range.
    pub fn with_point_count(mut self, min: usize, max: usize) -> Self {
        self.min_point_count = min;
        self.max_point_count = max;
        self
    }

    /// Set the bounding box diagonal range.
    pub fn with_bounds_size(mut self, min: f64, max: f64) -> Self {
        self.min_bounds_size = min;
        self.max_bounds_size = max;
        self
    }

    /// Set the area range.
    pub fn with_area(mut self, min: f64, max: f64) -> Self {
        self.min_area = min;
        self.max_area = max;
        self
    }

    /// Set the perimeter range.
    pub fn with_perimeter(mut self, min: f64, max: f64) -> Self {
        self.min_perimeter = min;
        self.max_perimeter = max;
        self
    }

    /// Set the segment length range.
    pub fn with_segment_length(mut self, min: f64, max: f64) -> Self {
        self.min_segment_length = min;
        self.max_segment_length = max;
        self
    }

    /// Set the compactness range.
    pub fn with_compactness(mut self, min: f64, max: f64) -> Self {
        self.min_compactness = min;
        self.max_compactness = max;
        self
    }

    /// Add a hole point.
    pub fn with_hole(mut self, point: Point2<f64>) -> Self {
        self.holes.push(point);
        self
    }

    /// Check a built cell against the limits, in a fixed order.
    ///
    /// `segment_lengths` are the lengths of the walk's segments, before any
    /// leaf duplication.
    pub(crate) fn check(&self, cell: &Cell, walk_len: usize, segment_lengths: &[f64]) -> Option<Rejection> {
        let data = &cell.data;
        let outside = |v: f64, min: f64, max: f64| v < min || v > max;

        if data.has_leaves && !self.keep_cells_with_leaves {
            return Some(Rejection::Leaves);
        }
        if walk_len < self.min_point_count || walk_len > self.max_point_count {
            return Some(Rejection::PointCount);
        }
        if segment_lengths
            .iter()
            .any(|&l| outside(l, self.min_segment_length, self.max_segment_length))
        {
            return Some(Rejection::SegmentLength);
        }
        if outside(data.bounds_size(), self.min_bounds_size, self.max_bounds_size) {
            return Some(Rejection::BoundsSize);
        }
        if outside(data.perimeter, self.min_perimeter, self.max_perimeter) {
            return Some(Rejection::Perimeter);
        }
        if outside(data.compactness, self.min_compactness, self.max_compactness) {
            return Some(Rejection::Compactness);
        }
        if outside(data.area, self.min_area, self.max_area) {
            return Some(Rejection::Area);
        }
        match self.aspect {
            AspectFilter::ConvexOnly if !data.is_convex => return Some(Rejection::Aspect),
            AspectFilter::ConcaveOnly if data.is_convex => return Some(Rejection::Aspect),
            _ => {}
        }
        if self.holes.iter().any(|h| cell.contains(h)) {
            return Some(Rejection::Hole);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_cell() -> Cell {
        let polygon = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        Cell {
            face: FaceId::new(0),
            nodes: (0..4).map(NodeId::new).collect(),
            data: CellData {
                area: 4.0,
                signed_area: 4.0,
                perimeter: 8.0,
                compactness: polygon::compactness(4.0, 8.0),
                centroid: Point2::new(1.0, 1.0),
                min: Point2::new(0.0, 0.0),
                max: Point2::new(2.0, 2.0),
                is_convex: true,
                is_clockwise: false,
                has_leaves: false,
            },
            polygon,
        }
    }

    #[test]
    fn test_defaults_accept() {
        let cell = square_cell();
        let constraints = CellConstraints::default();
        assert_eq!(constraints.check(&cell, 4, &[2.0; 4]), None);
    }

    #[test]
    fn test_rejection_reasons() {
        let cell = square_cell();
        let segments = [2.0; 4];

        let c = CellConstraints::default().with_point_count(5, 10);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::PointCount));

        let c = CellConstraints::default().with_segment_length(0.0, 1.5);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::SegmentLength));

        let c = CellConstraints::default().with_bounds_size(3.0, f64::INFINITY);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::BoundsSize));

        let c = CellConstraints::default().with_perimeter(0.0, 7.0);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::Perimeter));

        let c = CellConstraints::default().with_compactness(0.9, 1.0);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::Compactness));

        let c = CellConstraints::default().with_area(5.0, f64::INFINITY);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::Area));

        let c = CellConstraints::default().with_aspect(AspectFilter::ConcaveOnly);
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::Aspect));

        let c = CellConstraints::default().with_hole(Point2::new(1.0, 1.0));
        assert_eq!(c.check(&cell, 4, &segments), Some(Rejection::Hole));

        let c = CellConstraints::default().with_hole(Point2::new(5.0, 1.0));
        assert_eq!(c.check(&cell, 4, &segments), None);
    }

    #[test]
    fn test_check_order() {
        // Both leaves and area fail; leaves are checked first
        let mut cell = square_cell();
        cell.data.has_leaves = true;
        let c = CellConstraints::default()
            .with_keep_cells_with_leaves(false)
            .with_area(10.0, 20.0);
        assert_eq!(c.check(&cell, 4, &[2.0; 4]), Some(Rejection::Leaves));
    }

    #[test]
    fn test_matches_wrapper() {
        let c = CellConstraints::default();
        assert!(!c.matches_wrapper(4.0, 4.0));

        let c = c.with_wrapper_tolerance(0.05);
        assert!(c.matches_wrapper(4.0, 4.0));
        assert!(c.matches_wrapper(3.9, 4.0));
        assert!(!c.matches_wrapper(3.0, 4.0));

        // Only meaningful when the wrapper is split out
        let c = c.with_omit_wrapper(false);
        assert!(!c.matches_wrapper(4.0, 4.0));
    }

    #[test]
    fn test_negligible_area() {
        assert!(is_negligible_area(0.0, 0.0));
        assert!(is_negligible_area(1e-14, 1.0));
        assert!(!is_negligible_area(1e-3, 1.0));
    }

    #[test]
    fn test_outcome_accessors() {
        let cell = square_cell();
        let ok = CellOutcome::Success(cell.clone());
        assert!(ok.is_success());
        assert!(ok.cell().is_some());

        let failed = CellOutcome::FailedConstraints {
            cell,
            reason: Rejection::Area,
        };
        assert!(!failed.is_success());
        assert!(failed.cell().is_some());

        assert!(CellOutcome::Degenerate(Degeneracy::ZeroArea).cell().is_none());
    }
}
