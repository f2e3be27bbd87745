//! Graph data structures.
//!
//! This module provides the edge containers produced by probing and the
//! half-edge graph consumed by face enumeration.

mod edge;
mod halfedge;
mod index;

pub use edge::{edge_hash, unpack_edge, Edge, EdgeSet};
pub(crate) use edge::directed_hash;
pub use halfedge::{HalfEdge, HalfEdgeGraph};
pub use index::{FaceId, HalfEdgeId, NodeId};
