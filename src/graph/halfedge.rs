//! Half-edge graph for planar edge sets.
//!
//! This module turns an undirected edge set with 2D positions into a
//! doubly-connected edge list whose `next` pointers trace the faces of the
//! planar embedding.
//!
//! # Structure
//!
//! - Each undirected edge is split into two **half-edges** pointing in opposite
//!   directions, linked as **twins**
//! - Each half-edge caches the **angle** of its direction, `atan2(dy, dx)`
//! - Each node stores its outgoing half-edges sorted by angle (counter-clockwise)
//! - `next(u -> v)` is the half-edge just before `v -> u` in `v`'s rotation,
//!   the sharpest left turn, which keeps the face on the left
//!
//! With this rule every bounded face is walked counter-clockwise (positive
//! signed area) and the unbounded face is walked clockwise. Dangling edges
//! are walked out and back inside the face that contains them.
//!
//! Faces are not created here. Half-edges start with an invalid face and are
//! labelled by [`FaceEnumerator`](crate::algo::faces::FaceEnumerator).

use std::collections::HashMap;

use nalgebra::Point2;

use super::edge::{directed_hash, Edge, EdgeSet};
use super::index::{FaceId, HalfEdgeId, NodeId};
use crate::error::{GraphError, Result};

/// A directed half of an undirected edge.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The node this half-edge leaves.
    pub origin: NodeId,

    /// The node this half-edge points to.
    pub target: NodeId,

    /// The opposite half-edge.
    pub twin: HalfEdgeId,

    /// The next half-edge around the face on the left.
    pub next: HalfEdgeId,

    /// The face this half-edge bounds, invalid until faces are enumerated.
    pub face: FaceId,

    /// Direction angle in radians, in `(-pi, pi]`.
    pub angle: f64,
}

impl HalfEdge {
    fn new(origin: NodeId, target: NodeId, angle: f64) -> Self {
        Self {
            origin,
            target,
            twin: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            angle,
        }
    }
}

/// A planar graph stored as half-edges with angular rotation systems.
#[derive(Debug, Clone)]
pub struct HalfEdgeGraph {
    positions: Vec<Point2<f64>>,
    halfedges: Vec<HalfEdge>,
    outgoing: Vec<Vec<HalfEdgeId>>,
    lookup: HashMap<u64, HalfEdgeId>,
}

impl HalfEdgeGraph {
    /// Build a half-edge graph from undirected edges and projected positions.
    ///
    /// Duplicate undirected edges are ignored.
    ///
    /// # Errors
    /// - [`GraphError::InvalidNodeIndex`] if an edge references a node outside `positions`
    /// - [`GraphError::SelfLoop`] if an edge connects a node to itself
    ///
    /// # Example
    /// ```
    /// use plexus::graph::{Edge, HalfEdgeGraph};
    /// use nalgebra::Point2;
    ///
    /// let positions = vec![
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(0.0, 1.0),
    /// ];
    /// let edges = vec![
    ///     Edge::try_new(0, 1).unwrap(),
    ///     Edge::try_new(1, 2).unwrap(),
    ///     Edge::try_new(2, 0).unwrap(),
    /// ];
    ///
    /// let graph = HalfEdgeGraph::build(&edges, positions).unwrap();
    /// assert_eq!(graph.num_halfedges(), 6);
    /// assert!(graph.is_valid());
    /// ```
    pub fn build(edges: &[Edge], positions: Vec<Point2<f64>>) -> Result<Self> {
        let num_nodes = positions.len();

        for (ei, edge) in edges.iter().enumerate() {
            for node in [edge.start, edge.end] {
                if node as usize >= num_nodes {
                    return Err(GraphError::InvalidNodeIndex {
                        edge: ei,
                        node: node as usize,
                    });
                }
            }
            if edge.start == edge.end {
                return Err(GraphError::SelfLoop {
                    node: edge.start as usize,
                });
            }
        }

        let mut graph = Self {
            positions,
            halfedges: Vec::with_capacity(edges.len() * 2),
            outgoing: vec![Vec::new(); num_nodes],
            lookup: HashMap::with_capacity(edges.len() * 2),
        };

        // First pass: twin pairs
        for edge in edges {
            let (a, b) = (edge.start, edge.end);
            if graph.lookup.contains_key(&directed_hash(a, b)) {
                log::trace!("ignoring duplicate edge {}-{}", a, b);
                continue;
            }

            let ab = HalfEdgeId::new(graph.halfedges.len());
            let ba = HalfEdgeId::new(graph.halfedges.len() + 1);

            let pa = graph.positions[a as usize];
            let pb = graph.positions[b as usize];
            let (d_ab, d_ba) = (pb - pa, pa - pb);

            let (na, nb) = (NodeId::new(a as usize), NodeId::new(b as usize));

            let mut he_ab = HalfEdge::new(na, nb, d_ab.y.atan2(d_ab.x));
            let mut he_ba = HalfEdge::new(nb, na, d_ba.y.atan2(d_ba.x));
            he_ab.twin = ba;
            he_ba.twin = ab;

            graph.halfedges.push(he_ab);
            graph.halfedges.push(he_ba);
            graph.lookup.insert(directed_hash(a, b), ab);
            graph.lookup.insert(directed_hash(b, a), ba);
            graph.outgoing[a as usize].push(ab);
            graph.outgoing[b as usize].push(ba);
        }

        // Second pass: counter-clockwise rotation per node
        let halfedges = &graph.halfedges;
        for fan in &mut graph.outgoing {
            fan.sort_by(|&x, &y| {
                let (hx, hy) = (&halfedges[x.index()], &halfedges[y.index()]);
                hx.angle
                    .total_cmp(&hy.angle)
                    .then_with(|| hx.target.cmp(&hy.target))
            });
        }

        // Third pass: next(twin(fan[k])) = fan[k - 1]
        for node in 0..num_nodes {
            let fan = &graph.outgoing[node];
            let len = fan.len();
            for k in 0..len {
                let incoming = graph.halfedges[fan[k].index()].twin;
                let following = fan[(k + len - 1) % len];
                graph.halfedges[incoming.index()].next = following;
            }
        }

        log::debug!(
            "built half-edge graph: {} nodes, {} half-edges",
            num_nodes,
            graph.halfedges.len()
        );

        Ok(graph)
    }

    /// Build from an edge set. Edges are inserted in sorted order so the
    /// resulting half-edge ids are deterministic.
    pub fn from_edge_set(edges: &EdgeSet, positions: Vec<Point2<f64>>) -> Result<Self> {
        Self::build(&edges.to_sorted_vec(), positions)
    }

    // ==================== Accessors ====================

    /// Get the number of nodes (including isolated ones).
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of undirected edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.halfedges.len() / 2
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get the projected position of a node.
    #[inline]
    pub fn position(&self, node: NodeId) -> &Point2<f64> {
        &self.positions[node.index()]
    }

    /// All projected positions.
    #[inline]
    pub fn positions(&self) -> &[Point2<f64>] {
        &self.positions
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the origin node of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> NodeId {
        self.halfedge(he).origin
    }

    /// Get the target node of a half-edge.
    #[inline]
    pub fn target(&self, he: HalfEdgeId) -> NodeId {
        self.halfedge(he).target
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Get the direction angle of a half-edge.
    #[inline]
    pub fn angle(&self, he: HalfEdgeId) -> f64 {
        self.halfedge(he).angle
    }

    /// Find the half-edge going from `origin` to `target`.
    pub fn find_halfedge(&self, origin: usize, target: usize) -> Option<HalfEdgeId> {
        if origin >= self.num_nodes() || target >= self.num_nodes() {
            return None;
        }
        self.lookup
            .get(&directed_hash(origin as u32, target as u32))
            .copied()
    }

    /// Outgoing half-edges of a node in counter-clockwise order.
    #[inline]
    pub fn outgoing(&self, node: NodeId) -> &[HalfEdgeId] {
        &self.outgoing[node.index()]
    }

    /// Number of edges incident to a node.
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.outgoing[node.index()].len()
    }

    /// Check whether a node has exactly one incident edge.
    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.degree(node) == 1
    }

    // ==================== Iteration ====================

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all half-edges with their IDs.
    pub fn halfedges(&self) -> impl Iterator<Item = (HalfEdgeId, &HalfEdge)> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .map(|(i, he)| (HalfEdgeId::new(i), he))
    }

    /// Iterate over the undirected edges, one per twin pair.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.halfedges
            .iter()
            .step_by(2)
            .filter_map(|he| Edge::try_new(he.origin.raw(), he.target.raw()))
    }

    // ==================== Mutation ====================

    pub(crate) fn set_face(&mut self, he: HalfEdgeId, face: FaceId) {
        self.halfedges[he.index()].face = face;
    }

    // ==================== Validation ====================

    /// Check that twin and next links are consistent.
    pub fn is_valid(&self) -> bool {
        for (id, he) in self.halfedges() {
            if !he.twin.is_valid() || he.twin.index() >= self.halfedges.len() {
                return false;
            }
            let twin = self.halfedge(he.twin);
            if twin.twin != id || twin.origin != he.target || twin.target != he.origin {
                return false;
            }

            if !he.next.is_valid() || he.next.index() >= self.halfedges.len() {
                return false;
            }
            if self.halfedge(he.next).origin != he.target {
                return false;
            }
        }

        self.outgoing.iter().enumerate().all(|(node, fan)| {
            fan.iter()
                .all(|&he| self.halfedge(he).origin.index() == node)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(u32, u32)]) -> Vec<Edge> {
        pairs
            .iter()
            .map(|&(a, b)| Edge::try_new(a, b).unwrap())
            .collect()
    }

    fn unit_square() -> HalfEdgeGraph {
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        HalfEdgeGraph::build(&edges(&[(0, 1), (1, 2), (2, 3), (3, 0)]), positions).unwrap()
    }

    #[test]
    fn test_square_counts() {
        let graph = unit_square();
        assert_eq!(graph.num_nodes(), 4);
        assert_eq!(graph.num_halfedges(), 8);
        assert_eq!(graph.num_edges(), 4);
        assert!(graph.is_valid());
    }

    #[test]
    fn test_twin_invariant() {
        let graph = unit_square();
        for he in graph.halfedge_ids() {
            let twin = graph.twin(he);
            assert_eq!(graph.twin(twin), he);
            assert_eq!(graph.origin(twin), graph.target(he));
            assert_eq!(graph.target(twin), graph.origin(he));
        }
    }

    #[test]
    fn test_next_walks_interior_ccw() {
        let graph = unit_square();
        let start = graph.find_halfedge(0, 1).unwrap();

        let mut nodes = Vec::new();
        let mut he = start;
        loop {
            nodes.push(graph.origin(he).index());
            he = graph.next(he);
            if he == start {
                break;
            }
        }
        assert_eq!(nodes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_dangling_edge_walked_inside() {
        // Square with an edge from corner 2 toward the center
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
            Point2::new(1.0, 1.0),
        ];
        let graph = HalfEdgeGraph::build(
            &edges(&[(0, 1), (1, 2), (2, 3), (3, 0), (2, 4)]),
            positions,
        )
        .unwrap();
        assert!(graph.is_valid());

        let start = graph.find_halfedge(0, 1).unwrap();
        let mut nodes = Vec::new();
        let mut he = start;
        loop {
            nodes.push(graph.origin(he).index());
            he = graph.next(he);
            if he == start {
                break;
            }
        }
        assert_eq!(nodes, vec![0, 1, 2, 4, 2, 3]);
    }

    #[test]
    fn test_outgoing_sorted_by_angle() {
        // Star around the origin
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        let graph =
            HalfEdgeGraph::build(&edges(&[(0, 1), (0, 2), (0, 3), (0, 4)]), positions).unwrap();

        let targets: Vec<usize> = graph
            .outgoing(NodeId::new(0))
            .iter()
            .map(|&he| graph.target(he).index())
            .collect();
        // -pi/2, 0, pi/2, pi
        assert_eq!(targets, vec![4, 3, 1, 2]);
        assert!(graph.is_leaf(NodeId::new(1)));
        assert_eq!(graph.degree(NodeId::new(0)), 4);
    }

    #[test]
    fn test_angles() {
        let graph = unit_square();
        let he = graph.find_halfedge(1, 2).unwrap();
        assert!((graph.angle(he) - std::f64::consts::FRAC_PI_2).abs() < 1e-10);
        let back = graph.find_halfedge(1, 0).unwrap();
        assert!((graph.angle(back) - std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn test_duplicate_edges_ignored() {
        let positions = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let list = vec![Edge::try_new(0, 1).unwrap(), Edge::try_new(1, 0).unwrap()];
        let graph = HalfEdgeGraph::build(&list, positions).unwrap();
        assert_eq!(graph.num_edges(), 1);
        // A lone edge: each half-edge is followed by its twin
        let he = graph.find_halfedge(0, 1).unwrap();
        assert_eq!(graph.next(he), graph.twin(he));
        assert!(graph.is_valid());
    }

    #[test]
    fn test_invalid_node_index() {
        let positions = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        let result = HalfEdgeGraph::build(&edges(&[(0, 1), (1, 5)]), positions);
        assert!(matches!(
            result,
            Err(GraphError::InvalidNodeIndex { edge: 1, node: 5 })
        ));
    }

    #[test]
    fn test_self_loop_rejected() {
        let positions = vec![Point2::new(0.0, 0.0)];
        let result = HalfEdgeGraph::build(&[Edge { start: 0, end: 0 }], positions);
        assert!(matches!(result, Err(GraphError::SelfLoop { node: 0 })));
    }

    #[test]
    fn test_isolated_nodes() {
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(5.0, 5.0),
        ];
        let graph = HalfEdgeGraph::build(&edges(&[(0, 1)]), positions).unwrap();
        assert_eq!(graph.degree(NodeId::new(2)), 0);
        assert!(graph.outgoing(NodeId::new(2)).is_empty());
    }

    #[test]
    fn test_from_edge_set() {
        let mut set = EdgeSet::new();
        set.insert(2, 0);
        set.insert(0, 1);
        set.insert(1, 2);
        let positions = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        let graph = HalfEdgeGraph::from_edge_set(&set, positions).unwrap();
        assert_eq!(graph.num_edges(), 3);
        let listed: Vec<Edge> = graph.edges().collect();
        assert_eq!(listed, set.to_sorted_vec());
    }
}
