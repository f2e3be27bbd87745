//! # Plexus
//!
//! Graph construction over point clouds and planar face enumeration.
//!
//! Plexus turns a set of points into an undirected graph by *probing* the
//! neighborhood of every point, then treats the graph as a planar embedding
//! and enumerates the closed regions ("cells") its edges divide the plane
//! into.
//!
//! ## Features
//!
//! - **Probes**: density (DBSCAN), gradient flow, level sets, greedy
//!   t-spanners, Yao and Theta cone graphs
//! - **Parallel**: per-point probing and cell construction run on rayon
//! - **Half-edge graph**: angular rotation systems with type-safe indices
//! - **Cells**: raw faces, constrained cell polygons, the unbounded wrapper
//!   face and point location
//! - **File formats**: XYZ and PLY point clouds, PLY graphs
//!
//! ## Quick Start
//!
//! ```
//! use plexus::prelude::*;
//! use nalgebra::Point3;
//!
//! // A 3x3 grid of points
//! let points: Vec<Point3<f64>> = (0..9)
//!     .map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.0))
//!     .collect();
//!
//! // Link each point to its direct neighbors
//! let grid = HashGrid::from_points(&points, 1.0).unwrap();
//! let ctx = ProbeContext::new(&points, &grid);
//! let mut orchestrator = ProbeOrchestrator::new()
//!     .with_probe(DensityProbe::new(1.01).with_min_points(2));
//! let report = orchestrator.run(&ctx);
//! assert_eq!(report.edges.len(), 12);
//!
//! // Enumerate the cells of the resulting graph
//! let flat = Projection::default().project_all(&points);
//! let graph = HalfEdgeGraph::from_edge_set(&report.edges, flat).unwrap();
//! let mut faces = FaceEnumerator::new(graph);
//! let cells = faces.enumerate_all_faces(&CellConstraints::default(), false);
//! assert_eq!(cells.cells.len(), 4);
//! ```
//!
//! ## Loading Data
//!
//! ```no_run
//! use plexus::io;
//!
//! let cloud = io::load_points("scan.ply").unwrap();
//! println!("Points: {}", cloud.len());
//! for name in cloud.scalar_names() {
//!     println!("Field: {}", name);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod io;
pub mod spatial;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types and functions:
///
/// ```
/// use plexus::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::faces::{Cell, CellConstraints, CellOutcome, FaceCells, FaceEnumerator};
    pub use crate::algo::probe::{
        ConeProbe, DensityProbe, GradientProbe, LevelSetProbe, Probe, ProbeContext,
        ProbeOrchestrator, ScalarAttribute, SearchRadius, SpannerProbe,
    };
    pub use crate::algo::Progress;
    pub use crate::error::{GraphError, Result};
    pub use crate::geometry::{Projection, Winding};
    pub use crate::graph::{Edge, EdgeSet, FaceId, HalfEdgeGraph, HalfEdgeId, NodeId};
    pub use crate::spatial::{HashGrid, SpatialIndex};
}

// Re-export nalgebra types for convenience
pub use nalgebra;
