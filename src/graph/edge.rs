//! Undirected edges and deduplicating edge sets.
//!
//! An undirected edge between points `a` and `b` is keyed by a single `u64`
//! holding the smaller index in the high 32 bits and the larger in the low 32
//! bits, so `(a, b)` and `(b, a)` produce the same key.

use std::collections::HashSet;

/// Symmetric 64-bit key of the undirected edge `{a, b}`.
#[inline]
pub fn edge_hash(a: u32, b: u32) -> u64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    ((lo as u64) << 32) | hi as u64
}

/// Ordered 64-bit key of the directed pair `a -> b`.
#[inline]
pub(crate) fn directed_hash(a: u32, b: u32) -> u64 {
    ((a as u64) << 32) | b as u64
}

/// Split an edge key back into its `(smaller, larger)` endpoints.
#[inline]
pub fn unpack_edge(hash: u64) -> (u32, u32) {
    ((hash >> 32) as u32, hash as u32)
}

/// An undirected edge, stored with the smaller endpoint first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// The smaller endpoint.
    pub start: u32,
    /// The larger endpoint.
    pub end: u32,
}

impl Edge {
    /// Create an edge between two distinct points.
    ///
    /// Returns `None` for self-loops.
    pub fn try_new(a: u32, b: u32) -> Option<Self> {
        if a == b {
            return None;
        }
        let (start, end) = if a < b { (a, b) } else { (b, a) };
        Some(Self { start, end })
    }

    /// Rebuild an edge from its key.
    pub fn from_hash(hash: u64) -> Self {
        let (start, end) = unpack_edge(hash);
        Self { start, end }
    }

    /// The symmetric key of this edge.
    #[inline]
    pub fn hash(&self) -> u64 {
        edge_hash(self.start, self.end)
    }

    /// Given one endpoint, return the other.
    #[inline]
    pub fn other(&self, node: u32) -> u32 {
        if node == self.start {
            self.end
        } else {
            self.start
        }
    }
}

/// A set of undirected edges without duplicates or self-loops.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeSet {
    hashes: HashSet<u64>,
}

impl EdgeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty set with room for `capacity` edges.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hashes: HashSet::with_capacity(capacity),
        }
    }

    /// Insert the edge `{a, b}`.
    ///
    /// Returns `false` if the edge is a self-loop, already present, or has an
    /// endpoint that does not fit a `u32` index.
    #[inline]
    pub fn insert(&mut self, a: usize, b: usize) -> bool {
        match Self::key(a, b) {
            Some(hash) => self.hashes.insert(hash),
            None => false,
        }
    }

    /// Insert an edge. Self-loops are refused.
    #[inline]
    pub fn insert_edge(&mut self, edge: Edge) -> bool {
        if edge.start == edge.end {
            return false;
        }
        self.hashes.insert(edge.hash())
    }

    /// Check whether `{a, b}` is in the set.
    #[inline]
    pub fn contains(&self, a: usize, b: usize) -> bool {
        Self::key(a, b).is_some_and(|hash| self.hashes.contains(&hash))
    }

    fn key(a: usize, b: usize) -> Option<u64> {
        let (a, b) = (u32::try_from(a).ok()?, u32::try_from(b).ok()?);
        (a != b).then(|| edge_hash(a, b))
    }

    /// Number of edges.
    #[inline]
    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    /// Iterate over edges in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = Edge> + '_ {
        self.hashes.iter().map(|&h| Edge::from_hash(h))
    }

    /// Iterate over raw edge keys in unspecified order.
    pub fn hashes(&self) -> impl Iterator<Item = u64> + '_ {
        self.hashes.iter().copied()
    }

    /// Add every edge of `other` to this set.
    pub fn extend_from(&mut self, other: &EdgeSet) {
        self.hashes.extend(other.hashes.iter().copied());
    }

    /// Merge two sets, reusing the larger allocation.
    ///
    /// Used as the reduction step of parallel probing.
    pub fn merge(a: EdgeSet, b: EdgeSet) -> EdgeSet {
        let (mut big, small) = if a.len() >= b.len() { (a, b) } else { (b, a) };
        big.hashes.extend(small.hashes);
        big
    }

    /// All edges sorted by `(start, end)`.
    pub fn to_sorted_vec(&self) -> Vec<Edge> {
        let mut hashes: Vec<u64> = self.hashes.iter().copied().collect();
        hashes.sort_unstable();
        hashes.into_iter().map(Edge::from_hash).collect()
    }
}

impl FromIterator<Edge> for EdgeSet {
    fn from_iter<T: IntoIterator<Item = Edge>>(iter: T) -> Self {
        Self {
            hashes: iter
                .into_iter()
                .filter(|e| e.start != e.end)
                .map(|e| e.hash())
                .collect(),
        }
    }
}

impl Extend<Edge> for EdgeSet {
    fn extend<T: IntoIterator<Item = Edge>>(&mut self, iter: T) {
        for edge in iter {
            self.insert_edge(edge);
        }
    }
}
