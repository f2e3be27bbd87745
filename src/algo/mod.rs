//! Graph construction and analysis algorithms.
//!
//! - **Probing**: building edge sets from point clouds ([`probe`])
//! - **Faces**: enumerating the cells of a planar graph ([`faces`])
//! - **Shortest paths**: Dijkstra over weighted adjacency ([`shortest_path`])

pub mod faces;
pub mod probe;
mod progress;
pub mod shortest_path;

pub use progress::Progress;
