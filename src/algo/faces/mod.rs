//! Planar face enumeration.
//!
//! A [`FaceEnumerator`] walks the faces of a [`HalfEdgeGraph`](crate::graph::HalfEdgeGraph)
//! and turns them into [`Cell`]s: closed polygons with measurements, filtered
//! by [`CellConstraints`].
//!
//! # Pipeline
//!
//! 1. [`FaceEnumerator::enumerate_raw_faces`] walks every face once
//!    (sequential, cached)
//! 2. [`FaceEnumerator::build_cell_from_raw_face`] validates and measures one
//!    face (read-only, safe to run in parallel)
//! 3. [`FaceEnumerator::enumerate_all_faces`] runs both and sorts the results
//!    into accepted cells, rejected cells and the unbounded wrapper face

mod cell;
mod enumerator;

pub use cell::{
    AspectFilter, Cell, CellConstraints, CellData, CellOutcome, Degeneracy, RawFace, Rejection,
};
pub use enumerator::{EnumeratorState, FaceCells, FaceEnumerator};
