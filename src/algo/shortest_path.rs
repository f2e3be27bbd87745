//! Shortest paths on weighted edge graphs.
//!
//! [`Adjacency`] is a growable weighted adjacency list. The greedy spanner
//! inserts edges into one while it runs and asks [`path_distance`] whether the
//! endpoints of each new candidate are already close enough through the graph.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use nalgebra::Point3;

use crate::graph::EdgeSet;

/// Weighted undirected adjacency lists.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    neighbors: Vec<Vec<(usize, f64)>>,
    num_edges: usize,
}

impl Adjacency {
    /// Create an adjacency over `num_nodes` nodes and no edges.
    pub fn new(num_nodes: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); num_nodes],
            num_edges: 0,
        }
    }

    /// Build from an edge set, weighting each edge by Euclidean length.
    pub fn from_edges(edges: &EdgeSet, positions: &[Point3<f64>]) -> Self {
        let mut adj = Self::new(positions.len());
        for e in edges.to_sorted_vec() {
            let (a, b) = (e.start as usize, e.end as usize);
            if a < positions.len() && b < positions.len() {
                adj.add_edge(a, b, (positions[b] - positions[a]).norm());
            }
        }
        adj
    }

    /// Add the undirected edge `{a, b}` with weight `w`.
    pub fn add_edge(&mut self, a: usize, b: usize, w: f64) {
        self.neighbors[a].push((b, w));
        self.neighbors[b].push((a, w));
        self.num_edges += 1;
    }

    /// Neighbors of `node` with edge weights.
    #[inline]
    pub fn neighbors(&self, node: usize) -> &[(usize, f64)] {
        &self.neighbors[node]
    }

    /// Number of nodes.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of undirected edges added.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    node: usize,
    distance: f64,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for a min-heap
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Graph distance between `source` and `target`, exploring no farther than
/// `limit`.
///
/// Returns `f64::INFINITY` when `target` is unreachable within the limit. The
/// search only touches nodes it settles, so repeated short queries on a large
/// graph stay cheap.
pub fn path_distance(adj: &Adjacency, source: usize, target: usize, limit: f64) -> f64 {
    if source == target {
        return 0.0;
    }
    if source >= adj.num_nodes() || target >= adj.num_nodes() {
        return f64::INFINITY;
    }

    let mut best: HashMap<usize, f64> = HashMap::new();
    let mut heap = BinaryHeap::new();
    best.insert(source, 0.0);
    heap.push(Entry {
        node: source,
        distance: 0.0,
    });

    while let Some(Entry { node, distance }) = heap.pop() {
        if node == target {
            return distance;
        }
        if best.get(&node).is_some_and(|&d| distance > d) {
            continue;
        }

        for &(next, w) in adj.neighbors(node) {
            let candidate = distance + w;
            if candidate > limit {
                continue;
            }
            let improved = best.get(&next).map_or(true, |&d| candidate < d);
            if improved {
                best.insert(next, candidate);
                heap.push(Entry {
                    node: next,
                    distance: candidate,
                });
            }
        }
    }

    f64::INFINITY
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Path graph 0 - 1 - 2 - ... with unit weights.
    fn create_chain(n: usize) -> Adjacency {
        let mut adj = Adjacency::new(n);
        for i in 1..n {
            adj.add_edge(i - 1, i, 1.0);
        }
        adj
    }

    /// n x n grid with unit edges, node id `j * n + i`.
    fn create_grid(n: usize) -> Adjacency {
        let mut adj = Adjacency::new(n * n);
        for j in 0..n {
            for i in 0..n {
                let v = j * n + i;
                if i + 1 < n {
                    adj.add_edge(v, v + 1, 1.0);
                }
                if j + 1 < n {
                    adj.add_edge(v, v + n, 1.0);
                }
            }
        }
        adj
    }

    #[test]
    fn test_chain_distances() {
        let adj = create_chain(5);
        assert_eq!(adj.num_edges(), 4);
        assert_eq!(adj.neighbors(2), &[(1, 1.0), (3, 1.0)]);

        for i in 0..5 {
            assert!((path_distance(&adj, 0, i, f64::INFINITY) - i as f64).abs() < 1e-10);
        }
    }

    #[test]
    fn test_shortcut_wins() {
        // 0 - 1 - 2 - 3 plus a direct 0 - 3 edge
        let mut adj = create_chain(4);
        adj.add_edge(0, 3, 2.5);
        assert!((path_distance(&adj, 0, 3, f64::INFINITY) - 2.5).abs() < 1e-10);
        assert!((path_distance(&adj, 1, 3, f64::INFINITY) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_path_distance_bounded() {
        let adj = create_grid(4);
        assert!((path_distance(&adj, 0, 15, f64::INFINITY) - 6.0).abs() < 1e-10);
        assert!((path_distance(&adj, 0, 15, 6.0) - 6.0).abs() < 1e-10);
        assert!(path_distance(&adj, 0, 15, 5.9).is_infinite());
        assert_eq!(path_distance(&adj, 3, 3, 0.0), 0.0);
    }

    #[test]
    fn test_disconnected() {
        let mut adj = Adjacency::new(4);
        adj.add_edge(0, 1, 1.0);
        adj.add_edge(2, 3, 1.0);
        assert!(path_distance(&adj, 0, 3, 100.0).is_infinite());
        assert!(path_distance(&adj, 0, 9, 100.0).is_infinite());
    }

    #[test]
    fn test_from_edges() {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ];
        let mut edges = EdgeSet::new();
        edges.insert(0, 1);
        edges.insert(1, 2);
        let adj = Adjacency::from_edges(&edges, &positions);
        assert!((path_distance(&adj, 0, 2, f64::INFINITY) - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_triangle_inequality_on_grid() {
        let adj = create_grid(3);
        for v in 0..adj.num_nodes() {
            let dv = path_distance(&adj, 0, v, f64::INFINITY);
            for &(u, w) in adj.neighbors(v) {
                let du = path_distance(&adj, 0, u, f64::INFINITY);
                assert!((dv - du).abs() <= w + 1e-10);
            }
        }
    }
}
