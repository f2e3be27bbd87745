//! Point cloud and graph file I/O.
//!
//! # Supported Formats
//!
//! | Format | Extension | Points | Edges | Notes |
//! |--------|-----------|--------|-------|-------|
//! | XYZ | `.xyz` | ✓ | ✗ | Whitespace separated text, extra columns become fields |
//! | PLY | `.ply` | ✓ | ✓ | Vertex properties become fields, `edge` element |
//!
//! # Usage
//!
//! ```no_run
//! use plexus::io::{load_points, save_graph};
//! use plexus::graph::EdgeSet;
//!
//! let cloud = load_points("scan.xyz").unwrap();
//! println!("{} points", cloud.len());
//!
//! let mut edges = EdgeSet::new();
//! edges.insert(0, 1);
//! save_graph("graph.ply", &cloud, &edges).unwrap();
//! ```

pub mod ply;
pub mod xyz;

use std::collections::BTreeMap;
use std::path::Path;

use nalgebra::Point3;

use crate::algo::probe::ScalarAttribute;
use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;

/// Positions with named per-point scalar fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    /// Point positions.
    pub positions: Vec<Point3<f64>>,

    /// Scalar fields, one value per point.
    pub scalars: BTreeMap<String, Vec<f64>>,
}

impl PointCloud {
    /// A cloud without fields.
    pub fn new(positions: Vec<Point3<f64>>) -> Self {
        Self {
            positions,
            scalars: BTreeMap::new(),
        }
    }

    /// Attach a scalar field.
    ///
    /// # Errors
    /// Returns [`GraphError::LengthMismatch`] if `values` does not have one
    /// entry per point.
    pub fn with_scalar(mut self, name: impl Into<String>, values: Vec<f64>) -> Result<Self> {
        GraphError::check_len("scalar field", self.positions.len(), values.len())?;
        self.scalars.insert(name.into(), values);
        Ok(self)
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Values of a field.
    pub fn scalar(&self, name: &str) -> Option<&[f64]> {
        self.scalars.get(name).map(Vec::as_slice)
    }

    /// A field as a probe attribute.
    pub fn attribute(&self, name: &str) -> Option<ScalarAttribute> {
        self.scalars
            .get(name)
            .map(|values| ScalarAttribute::from_values(values.clone()))
    }

    /// Field names in sorted order.
    pub fn scalar_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.scalars.keys().map(String::as_str)
    }
}

/// Supported file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Whitespace separated text.
    Xyz,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "xyz" | "txt" => Some(Format::Xyz),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }
}

fn detect(path: &Path) -> Result<Format> {
    Format::from_path(path).ok_or_else(|| GraphError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })
}

/// Load a point cloud with automatic format detection.
pub fn load_points<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Xyz => xyz::load(path),
        Format::Ply => ply::load(path).map(|(cloud, _)| cloud),
    }
}

/// Load a point cloud and its edges with automatic format detection.
///
/// Formats without edges return an empty edge set.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<(PointCloud, EdgeSet)> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Xyz => Ok((xyz::load(path)?, EdgeSet::new())),
        Format::Ply => ply::load(path),
    }
}

/// Save a point cloud and its edges with automatic format detection.
///
/// # Errors
/// Returns [`GraphError::SaveError`] when the format cannot store a non-empty
/// edge set.
pub fn save_graph<P: AsRef<Path>>(path: P, cloud: &PointCloud, edges: &EdgeSet) -> Result<()> {
    let path = path.as_ref();
    match detect(path)? {
        Format::Xyz if !edges.is_empty() => Err(GraphError::SaveError {
            path: path.to_path_buf(),
            message: "xyz files cannot store edges".to_string(),
        }),
        Format::Xyz => xyz::save(path, cloud),
        Format::Ply => ply::save(path, cloud, edges),
    }
}
