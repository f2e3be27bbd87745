//! Planar geometry helpers shared by probing and face enumeration.

pub mod polygon;
pub mod projection;

pub use polygon::Winding;
pub use projection::Projection;
