//! Walking faces of a [`HalfEdgeGraph`] and turning them into cells.

use std::collections::HashSet;

use nalgebra::Point2;
use rayon::prelude::*;

use super::cell::{
    is_negligible_area, Cell, CellConstraints, CellData, CellOutcome, Degeneracy, RawFace,
    Rejection,
};
use crate::algo::Progress;
use crate::geometry::polygon::{self, Winding};
use crate::graph::{FaceId, HalfEdgeGraph, HalfEdgeId, NodeId};

/// Face counts above which cells are built in parallel.
const PARALLEL_THRESHOLD: usize = 32;

/// How far an enumerator has progressed. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EnumeratorState {
    /// Half-edges are linked, no face has been walked.
    Built,
    /// Raw faces are cached.
    RawFacesEnumerated,
    /// Cells have been built at least once.
    CellsBuilt,
}

/// Output of [`FaceEnumerator::enumerate_all_faces`].
#[derive(Debug, Clone, Default)]
pub struct FaceCells {
    /// Accepted cells, in face order.
    pub cells: Vec<Cell>,

    /// Valid cells rejected by a constraint, when requested.
    pub failed: Vec<(Cell, Rejection)>,

    /// The unbounded face, when it was routed out of `cells`.
    pub wrapper: Option<Cell>,
}

/// Enumerates the faces of a planar half-edge graph.
///
/// The face walk is a single sequential pass that labels every half-edge with
/// its face. After that the enumerator is only read, so cells can be built
/// from many threads at once.
///
/// # Example
///
/// ```
/// use plexus::algo::faces::{CellConstraints, FaceEnumerator};
/// use plexus::graph::{Edge, HalfEdgeGraph};
/// use nalgebra::Point2;
///
/// let positions = vec![
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(1.0, 1.0),
///     Point2::new(0.0, 1.0),
/// ];
/// let edges: Vec<Edge> = [(0, 1), (1, 2), (2, 3), (3, 0)]
///     .iter()
///     .filter_map(|&(a, b)| Edge::try_new(a, b))
///     .collect();
///
/// let graph = HalfEdgeGraph::build(&edges, positions).unwrap();
/// let mut enumerator = FaceEnumerator::new(graph);
///
/// assert_eq!(enumerator.enumerate_raw_faces().len(), 2);
/// let faces = enumerator.enumerate_all_faces(&CellConstraints::default(), false);
/// assert_eq!(faces.cells.len(), 1);
/// assert!(faces.wrapper.is_some());
/// ```
#[derive(Debug)]
pub struct FaceEnumerator {
    graph: HalfEdgeGraph,
    raw_faces: Vec<RawFace>,
    state: EnumeratorState,
    progress: Progress,
}

impl FaceEnumerator {
    /// Take ownership of a built graph.
    pub fn new(graph: HalfEdgeGraph) -> Self {
        Self {
            graph,
            raw_faces: Vec::new(),
            state: EnumeratorState::Built,
            progress: Progress::none(),
        }
    }

    /// Set the progress reporter used by [`enumerate_all_faces`](Self::enumerate_all_faces).
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// The underlying graph. Half-edge faces are set once faces are enumerated.
    #[inline]
    pub fn graph(&self) -> &HalfEdgeGraph {
        &self.graph
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> EnumeratorState {
        self.state
    }

    /// Cached raw faces, empty before enumeration.
    #[inline]
    pub fn raw_faces(&self) -> &[RawFace] {
        &self.raw_faces
    }

    /// Number of enumerated faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.raw_faces.len()
    }

    /// A raw face by id.
    pub fn face(&self, id: FaceId) -> Option<&RawFace> {
        if !id.is_valid() {
            return None;
        }
        self.raw_faces.get(id.index())
    }

    /// Positions of a face's walk.
    pub fn face_polygon(&self, face: &RawFace) -> Vec<Point2<f64>> {
        face.nodes
            .iter()
            .map(|&n| *self.graph.position(n))
            .collect()
    }

    /// Walk every face once and cache the result.
    ///
    /// Each unvisited half-edge starts a walk along `next` links until the
    /// walk returns to it. Walks shorter than three nodes, and broken walks,
    /// are dropped and their half-edges keep an invalid face. Later calls
    /// return the cache.
    pub fn enumerate_raw_faces(&mut self) -> &[RawFace] {
        if self.state != EnumeratorState::Built {
            return &self.raw_faces;
        }

        let num_halfedges = self.graph.num_halfedges();
        let mut visited = vec![false; num_halfedges];
        let mut faces = Vec::new();
        let mut dropped = 0usize;

        for s in 0..num_halfedges {
            let start = HalfEdgeId::new(s);
            if visited[s] {
                continue;
            }

            let mut walk: Vec<HalfEdgeId> = Vec::new();
            let mut current = start;
            let mut closed = false;

            // One extra step sees the return to `start` after a full cover
            for _ in 0..=num_halfedges {
                if !current.is_valid() || current.index() >= num_halfedges {
                    break;
                }
                if visited[current.index()] {
                    closed = current == start;
                    break;
                }
                visited[current.index()] = true;
                walk.push(current);
                current = self.graph.next(current);
            }

            if !closed || walk.len() < 3 {
                dropped += 1;
                continue;
            }

            let id = FaceId::new(faces.len());
            let nodes: Vec<NodeId> = walk.iter().map(|&he| self.graph.origin(he)).collect();
            let positions: Vec<Point2<f64>> =
                nodes.iter().map(|&n| *self.graph.position(n)).collect();

            for &he in &walk {
                self.graph.set_face(he, id);
            }
            faces.push(RawFace {
                id,
                nodes,
                halfedges: walk,
                signed_area: polygon::signed_area(&positions),
            });
        }

        log::debug!(
            "enumerated {} faces from {} half-edges ({} walks dropped)",
            faces.len(),
            num_halfedges,
            dropped
        );

        self.raw_faces = faces;
        self.state = EnumeratorState::RawFacesEnumerated;
        &self.raw_faces
    }

    /// Turn one raw face into a cell.
    ///
    /// Only reads the graph, so it can run concurrently for different faces.
    pub fn build_cell_from_raw_face(
        &self,
        face: &RawFace,
        constraints: &CellConstraints,
    ) -> CellOutcome {
        if face.len() < 3 {
            return CellOutcome::Degenerate(Degeneracy::TooFewPoints);
        }

        let graph = &self.graph;
        let has_leaves = face.nodes.iter().any(|&n| graph.is_leaf(n));

        let mut nodes = Vec::with_capacity(face.len() + 2);
        for &n in &face.nodes {
            nodes.push(n);
            if constraints.duplicate_leaf_points && graph.is_leaf(n) {
                nodes.push(n);
            }
        }
        let mut polygon: Vec<Point2<f64>> = nodes.iter().map(|&n| *graph.position(n)).collect();

        let signed_area = polygon::signed_area(&polygon);
        let Some((min, max)) = polygon::bounds(&polygon) else {
            return CellOutcome::Degenerate(Degeneracy::TooFewPoints);
        };
        if is_negligible_area(signed_area, (max - min).norm()) {
            return CellOutcome::Degenerate(Degeneracy::ZeroArea);
        }
        let raw_ids: Vec<usize> = nodes.iter().map(|n| n.index()).collect();
        if polygon::has_self_crossing(&polygon, &raw_ids) {
            return CellOutcome::Degenerate(Degeneracy::SelfIntersecting);
        }

        let segment_lengths: Vec<f64> = (0..face.len())
            .map(|i| {
                let a = graph.position(face.nodes[i]);
                let b = graph.position(face.nodes[(i + 1) % face.len()]);
                (b - a).norm()
            })
            .collect();
        let perimeter: f64 = segment_lengths.iter().sum();
        let area = signed_area.abs();

        let data = CellData {
            area,
            signed_area,
            perimeter,
            compactness: polygon::compactness(area, perimeter),
            centroid: polygon::centroid(&polygon),
            min,
            max,
            is_convex: polygon::is_convex(&polygon),
            is_clockwise: signed_area < 0.0,
            has_leaves,
        };

        if Winding::of(signed_area) != constraints.winding {
            nodes.reverse();
            polygon.reverse();
        }

        // Smallest node first so equal faces give equal cells
        if let Some(lead) = nodes
            .iter()
            .enumerate()
            .min_by_key(|&(i, n)| (n.index(), i))
            .map(|(i, _)| i)
        {
            nodes.rotate_left(lead);
            polygon.rotate_left(lead);
        }

        let cell = Cell {
            face: face.id,
            nodes,
            polygon,
            data,
        };

        match constraints.check(&cell, face.len(), &segment_lengths) {
            None => CellOutcome::Success(cell),
            Some(reason) => CellOutcome::FailedConstraints { cell, reason },
        }
    }

    /// Enumerate faces and build every cell.
    ///
    /// Cells are built in parallel above a small face count. The unbounded
    /// face is handled according to `omit_wrapper` and
    /// `keep_wrapper_if_sole`. A cell whose boundary repeats an earlier face's
    /// is rejected as [`Rejection::Duplicate`], the earlier face winning. With
    /// `collect_failed`, valid cells rejected by a constraint are returned in
    /// [`FaceCells::failed`].
    pub fn enumerate_all_faces(
        &mut self,
        constraints: &CellConstraints,
        collect_failed: bool,
    ) -> FaceCells {
        self.enumerate_raw_faces();
        self.progress.report(1, 2, "faces enumerated");

        let this: &Self = self;
        let outcomes: Vec<CellOutcome> = if this.raw_faces.len() > PARALLEL_THRESHOLD {
            this.raw_faces
                .par_iter()
                .map(|face| this.build_cell_from_raw_face(face, constraints))
                .collect()
        } else {
            this.raw_faces
                .iter()
                .map(|face| this.build_cell_from_raw_face(face, constraints))
                .collect()
        };

        let wrapper_id = self.wrapper_face_index();
        let wrapper_area = wrapper_id
            .and_then(|id| self.face(id))
            .map(|face| face.signed_area.abs());
        let mut result = FaceCells::default();
        let mut seen: HashSet<Vec<NodeId>> = HashSet::new();
        let mut degenerate = 0usize;

        for outcome in outcomes {
            let (cell, rejection) = match outcome {
                CellOutcome::Success(cell) => (cell, None),
                CellOutcome::FailedConstraints { cell, reason } => (cell, Some(reason)),
                CellOutcome::Degenerate(_) => {
                    degenerate += 1;
                    continue;
                }
            };

            let is_wrapper = Some(cell.face) == wrapper_id;
            let rejection = if constraints.omit_wrapper && is_wrapper {
                if rejection.is_none() {
                    result.wrapper = Some(cell);
                    continue;
                }
                rejection
            } else if !seen.insert(cell.nodes.clone()) {
                // Boundaries are normalized, so equal node lists are the same cell
                Some(Rejection::Duplicate)
            } else if rejection.is_none()
                && wrapper_area.is_some_and(|w| constraints.matches_wrapper(cell.data.area, w))
            {
                Some(Rejection::Wrapper)
            } else {
                rejection
            };

            match rejection {
                None => result.cells.push(cell),
                Some(reason) if collect_failed => result.failed.push((cell, reason)),
                Some(_) => {}
            }
        }

        if constraints.keep_wrapper_if_sole && result.cells.is_empty() {
            if let Some(wrapper) = &result.wrapper {
                result.cells.push(wrapper.clone());
            }
        }

        log::debug!(
            "built {} cells ({} rejected, {} degenerate, wrapper {:?})",
            result.cells.len(),
            result.failed.len(),
            degenerate,
            wrapper_id
        );

        self.state = EnumeratorState::CellsBuilt;
        self.progress.report(2, 2, "cells built");
        result
    }

    /// The face containing `point`.
    ///
    /// Bounded faces are tested first, in face order, then the outer boundary
    /// of the unbounded face. Returns `None` when no face polygon contains the
    /// point, including before enumeration.
    pub fn find_face_containing(&self, point: &Point2<f64>) -> Option<FaceId> {
        let wrapper = self.wrapper_face_index();
        let inside = |face: &&RawFace| polygon::is_point_in_polygon(point, &self.face_polygon(face));

        self.raw_faces
            .iter()
            .filter(|face| Some(face.id) != wrapper)
            .find(&inside)
            .or_else(|| wrapper.and_then(|id| self.face(id)).filter(&inside))
            .map(|face| face.id)
    }

    /// The unbounded face: the clockwise face with the largest area.
    ///
    /// Faces enclosing no area never qualify. Ties keep the lower id. For a
    /// graph made of several disconnected pieces this returns the outer face
    /// of the largest piece.
    pub fn wrapper_face_index(&self) -> Option<FaceId> {
        let mut best: Option<(FaceId, f64)> = None;

        for face in &self.raw_faces {
            if face.winding() != Winding::Clockwise {
                continue;
            }
            let polygon = self.face_polygon(face);
            let diagonal = polygon::bounds(&polygon).map_or(0.0, |(lo, hi)| (hi - lo).norm());
            if is_negligible_area(face.signed_area, diagonal) {
                continue;
            }

            let area = face.signed_area.abs();
            if best.map_or(true, |(_, a)| area > a) {
                best = Some((face.id, area));
            }
        }
        best.map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::faces::{AspectFilter, CellConstraints};
    use crate::graph::Edge;

    fn build(positions: Vec<Point2<f64>>, pairs: &[(u32, u32)]) -> FaceEnumerator {
        let edges: Vec<Edge> = pairs
            .iter()
            .filter_map(|&(a, b)| Edge::try_new(a, b))
            .collect();
        FaceEnumerator::new(HalfEdgeGraph::build(&edges, positions).unwrap())
    }

    fn create_square() -> FaceEnumerator {
        build(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            &[(0, 1), (1, 2), (2, 3), (3, 0)],
        )
    }

    /// A 2x1 rectangle split in the middle: two unit squares sharing an edge.
    fn create_two_squares() -> FaceEnumerator {
        build(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 1.0),
                Point2::new(1.0, 1.0),
                Point2::new(0.0, 1.0),
            ],
            &[(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0), (1, 4)],
        )
    }

    /// A grid of `n x n` unit squares.
    fn create_grid(n: usize) -> FaceEnumerator {
        let side = n + 1;
        let mut positions = Vec::new();
        for j in 0..side {
            for i in 0..side {
                positions.push(Point2::new(i as f64, j as f64));
            }
        }
        let mut pairs = Vec::new();
        for j in 0..side {
            for i in 0..side {
                let v = (j * side + i) as u32;
                if i + 1 < side {
                    pairs.push((v, v + 1));
                }
                if j + 1 < side {
                    pairs.push((v, v + side as u32));
                }
            }
        }
        build(positions, &pairs)
    }

    #[test]
    fn test_square_has_two_faces() {
        let mut e = create_square();
        assert_eq!(e.state(), EnumeratorState::Built);

        let faces = e.enumerate_raw_faces();
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|f| f.len() == 4));

        let wrapper = e.wrapper_face_index().unwrap();
        let wrapper_face = e.face(wrapper).unwrap();
        assert_eq!(wrapper_face.winding(), Winding::Clockwise);
        assert!((wrapper_face.signed_area + 1.0).abs() < 1e-10);

        let inner = e.raw_faces().iter().find(|f| f.id != wrapper).unwrap();
        assert!((inner.signed_area - 1.0).abs() < 1e-10);
        assert_eq!(e.state(), EnumeratorState::RawFacesEnumerated);
    }

    #[test]
    fn test_faces_label_halfedges() {
        let mut e = create_two_squares();
        e.enumerate_raw_faces();
        assert_eq!(e.num_faces(), 3);

        for face in e.raw_faces() {
            for &he in &face.halfedges {
                assert_eq!(e.graph().face_of(he), face.id);
            }
        }
        // Every half-edge belongs to exactly one face
        let total: usize = e.raw_faces().iter().map(|f| f.halfedges.len()).sum();
        assert_eq!(total, e.graph().num_halfedges());
    }

    #[test]
    fn test_raw_faces_are_cached() {
        let mut e = create_two_squares();
        let first = e.enumerate_raw_faces().to_vec();
        let second = e.enumerate_raw_faces().to_vec();
        assert_eq!(first, second);
    }

    #[test]
    fn test_tree_has_no_bounded_face() {
        // A path 0-1-2 walks a single zero-area loop
        let mut e = build(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 1.0),
            ],
            &[(0, 1), (1, 2)],
        );
        // The single walk covers every half-edge and is still kept
        assert_eq!(e.enumerate_raw_faces().len(), 1);
        assert_eq!(e.raw_faces()[0].len(), e.graph().num_halfedges());
        let id = e.raw_faces()[0].id;
        assert!(e.graph().halfedge_ids().all(|he| e.graph().face_of(he) == id));

        assert_eq!(e.wrapper_face_index(), None);
        assert_eq!(e.find_face_containing(&Point2::new(0.5, 0.5)), None);

        let face = e.raw_faces()[0].clone();
        assert_eq!(
            e.build_cell_from_raw_face(&face, &CellConstraints::default()),
            CellOutcome::Degenerate(Degeneracy::ZeroArea)
        );
    }

    #[test]
    fn test_single_edge_has_no_faces() {
        let mut e = build(
            vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)],
            &[(0, 1)],
        );
        assert!(e.enumerate_raw_faces().is_empty());
        // Both half-edges were dropped with the two-node walk
        assert!(e.graph().halfedge_ids().all(|he| !e.graph().face_of(he).is_valid()));

        let cells = e.enumerate_all_faces(&CellConstraints::default(), true);
        assert!(cells.cells.is_empty());
        assert!(cells.wrapper.is_none());
    }

    #[test]
    fn test_enumerate_all_faces_routes_wrapper() {
        let mut e = create_two_squares();
        let faces = e.enumerate_all_faces(&CellConstraints::default(), false);

        assert_eq!(faces.cells.len(), 2);
        let wrapper = faces.wrapper.unwrap();
        assert!(wrapper.data.is_clockwise);
        assert!((wrapper.data.area - 2.0).abs() < 1e-10);
        assert_eq!(e.state(), EnumeratorState::CellsBuilt);

        for cell in &faces.cells {
            assert!((cell.data.area - 1.0).abs() < 1e-10);
            assert!(cell.data.is_convex);
            // Output winding is counter-clockwise
            assert!(polygon::signed_area(&cell.polygon) > 0.0);
            // Smallest node leads
            let min = cell.nodes.iter().min().unwrap();
            assert_eq!(cell.nodes[0], *min);
        }
    }

    #[test]
    fn test_keep_wrapper_in_cells() {
        let mut e = create_two_squares();
        let constraints = CellConstraints::default().with_omit_wrapper(false);
        let faces = e.enumerate_all_faces(&constraints, false);
        assert_eq!(faces.cells.len(), 3);
        assert!(faces.wrapper.is_none());
    }

    #[test]
    fn test_wrapper_kept_when_sole() {
        // Reject both unit squares; only the 2x1 wrapper survives
        let mut e = create_two_squares();
        let constraints = CellConstraints::default().with_area(1.5, f64::INFINITY);
        let faces = e.enumerate_all_faces(&constraints, true);
        assert_eq!(faces.cells.len(), 1);
        assert!(faces.cells[0].data.is_clockwise);
        assert_eq!(faces.failed.len(), 2);
        assert!(faces.failed.iter().all(|(_, r)| *r == Rejection::Area));

        let mut e = create_two_squares();
        let constraints = constraints.with_keep_wrapper_if_sole(false);
        let faces = e.enumerate_all_faces(&constraints, false);
        assert!(faces.cells.is_empty());
        assert!(faces.failed.is_empty());
        assert!(faces.wrapper.is_some());
    }

    #[test]
    fn test_clockwise_output() {
        let mut e = create_square();
        let constraints = CellConstraints::default().with_winding(Winding::Clockwise);
        let faces = e.enumerate_all_faces(&constraints, false);
        assert_eq!(faces.cells.len(), 1);
        assert!(polygon::signed_area(&faces.cells[0].polygon) < 0.0);
        assert_eq!(faces.cells[0].nodes[0], NodeId::new(0));
    }

    #[test]
    fn test_leaves() {
        // Square with a dangling edge from node 2 into the square
        let mut e = build(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(2.0, 0.0),
                Point2::new(2.0, 2.0),
                Point2::new(0.0, 2.0),
                Point2::new(1.0, 1.0),
            ],
            &[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4)],
        );
        e.enumerate_raw_faces();
        let inner = e
            .raw_faces()
            .iter()
            .find(|f| f.signed_area > 0.0)
            .unwrap()
            .clone();
        // Walk visits node 2 twice around the dangling edge
        assert_eq!(inner.len(), 6);

        let kept = e.build_cell_from_raw_face(&inner, &CellConstraints::default());
        let cell = kept.cell().unwrap();
        assert!(kept.is_success());
        assert!(cell.data.has_leaves);
        assert!(!cell.data.is_convex);
        assert_eq!(cell.len(), 6);

        let duplicated = e.build_cell_from_raw_face(
            &inner,
            &CellConstraints::default().with_duplicate_leaf_points(true),
        );
        assert_eq!(duplicated.cell().unwrap().len(), 7);

        let rejected = e.build_cell_from_raw_face(
            &inner,
            &CellConstraints::default().with_keep_cells_with_leaves(false),
        );
        assert!(matches!(
            rejected,
            CellOutcome::FailedConstraints {
                reason: Rejection::Leaves,
                ..
            }
        ));

        let convex = e.build_cell_from_raw_face(
            &inner,
            &CellConstraints::default().with_aspect(AspectFilter::ConvexOnly),
        );
        assert!(matches!(
            convex,
            CellOutcome::FailedConstraints {
                reason: Rejection::Aspect,
                ..
            }
        ));
    }

    #[test]
    fn test_find_face_containing() {
        let mut e = create_two_squares();
        assert_eq!(e.find_face_containing(&Point2::new(0.5, 0.5)), None);

        e.enumerate_raw_faces();
        let wrapper = e.wrapper_face_index().unwrap();

        let left = e.find_face_containing(&Point2::new(0.5, 0.5)).unwrap();
        let right = e.find_face_containing(&Point2::new(1.5, 0.5)).unwrap();
        assert_ne!(left, right);
        assert_ne!(left, wrapper);
        assert_ne!(right, wrapper);

        let left_face = e.face(left).unwrap();
        assert!(left_face.nodes.contains(&NodeId::new(0)));

        // Outside every face polygon, including the outer boundary
        assert_eq!(e.find_face_containing(&Point2::new(5.0, 5.0)), None);
        assert_eq!(e.find_face_containing(&Point2::new(-0.5, 0.5)), None);
    }

    #[test]
    fn test_outside_point_on_square() {
        let mut e = create_square();
        e.enumerate_raw_faces();
        assert!(e.wrapper_face_index().is_some());

        let inner = e.find_face_containing(&Point2::new(0.5, 0.5));
        assert!(inner.is_some());
        assert_ne!(inner, e.wrapper_face_index());
        assert_eq!(e.find_face_containing(&Point2::new(50.0, 50.0)), None);
    }

    fn create_triangle() -> FaceEnumerator {
        build(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(0.0, 1.0),
            ],
            &[(0, 1), (1, 2), (2, 0)],
        )
    }

    #[test]
    fn test_duplicate_cells() {
        // Inner and outer faces of a triangle normalize to the same boundary
        let mut e = create_triangle();
        let constraints = CellConstraints::default().with_omit_wrapper(false);
        let faces = e.enumerate_all_faces(&constraints, true);

        assert_eq!(e.num_faces(), 2);
        assert_eq!(faces.cells.len(), 1);
        assert_eq!(
            faces.cells[0].nodes,
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2)]
        );
        assert_eq!(faces.failed.len(), 1);
        assert_eq!(faces.failed[0].1, Rejection::Duplicate);
        assert_eq!(faces.failed[0].0.nodes, faces.cells[0].nodes);

        // The wrapper is split out first, so the inner face is kept
        let mut e = create_triangle();
        let faces = e.enumerate_all_faces(&CellConstraints::default(), true);
        assert_eq!(faces.cells.len(), 1);
        assert!(!faces.cells[0].data.is_clockwise);
        assert!(faces.failed.is_empty());
        assert!(faces.wrapper.is_some());
    }

    #[test]
    fn test_wrapper_tolerance() {
        // The triangle's only bounded cell has the wrapper's area
        let mut e = create_triangle();
        let constraints = CellConstraints::default()
            .with_wrapper_tolerance(0.01)
            .with_keep_wrapper_if_sole(false);
        let faces = e.enumerate_all_faces(&constraints, true);
        assert!(faces.cells.is_empty());
        assert_eq!(faces.failed.len(), 1);
        assert_eq!(faces.failed[0].1, Rejection::Wrapper);
        assert!(faces.wrapper.is_some());

        // Keeping the sole wrapper brings it back as the only cell
        let mut e = create_triangle();
        let faces = e.enumerate_all_faces(&constraints.clone().with_keep_wrapper_if_sole(true), false);
        assert_eq!(faces.cells.len(), 1);
        assert!(faces.cells[0].data.is_clockwise);

        // Unit squares are far from the 2x1 wrapper
        let mut e = create_two_squares();
        let faces = e.enumerate_all_faces(&constraints, true);
        assert_eq!(faces.cells.len(), 2);
        assert!(faces.failed.is_empty());
    }

    #[test]
    fn test_parallel_grid() {
        // 6x6 squares: 37 faces, above the parallel threshold
        let mut e = create_grid(6);
        let faces = e.enumerate_all_faces(&CellConstraints::default(), false);
        assert_eq!(e.num_faces(), 37);
        assert_eq!(faces.cells.len(), 36);
        assert!((faces.wrapper.unwrap().data.area - 36.0).abs() < 1e-10);

        // Face order is preserved
        let ids: Vec<usize> = faces.cells.iter().map(|c| c.face.index()).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
    }
}
