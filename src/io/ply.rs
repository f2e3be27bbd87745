//! PLY (Stanford polygon) format support.
//!
//! Points are read from the `vertex` element. Besides `x`, `y` and `z`, every
//! scalar vertex property becomes a named field. Edges are read from an
//! optional `edge` element with `vertex1` and `vertex2` properties, the
//! convention used by most point and graph tools.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use super::PointCloud;
use crate::error::{GraphError, Result};
use crate::graph::EdgeSet;

/// Load points and edges from a PLY file.
///
/// # Example
///
/// ```no_run
/// use plexus::io::ply;
///
/// let (cloud, edges) = ply::load("graph.ply").unwrap();
/// println!("{} points, {} edges", cloud.len(), edges.len());
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<(PointCloud, EdgeSet)> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let load_error = |message: String| GraphError::LoadError {
        path: path.to_path_buf(),
        message,
    };

    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(e.to_string()))?;

    let vertex_element = ply
        .payload
        .get("vertex")
        .ok_or_else(|| load_error("PLY file has no vertex element".to_string()))?;

    // Scalar properties other than the coordinates, in header order
    let field_names: Vec<String> = ply
        .header
        .elements
        .get("vertex")
        .map(|def| {
            def.properties
                .keys()
                .filter(|name| !matches!(name.as_str(), "x" | "y" | "z"))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    let mut positions = Vec::with_capacity(vertex_element.len());
    let mut fields: Vec<Vec<f64>> = vec![Vec::with_capacity(vertex_element.len()); field_names.len()];

    for vertex in vertex_element {
        let coord = |axis: &str| {
            get_float_property(vertex, axis)
                .ok_or_else(|| load_error(format!("vertex missing {} coordinate", axis)))
        };
        positions.push(Point3::new(coord("x")?, coord("y")?, coord("z")?));

        for (name, values) in field_names.iter().zip(fields.iter_mut()) {
            values.push(get_float_property(vertex, name).unwrap_or(f64::NAN));
        }
    }

    let mut cloud = PointCloud::new(positions);
    for (name, values) in field_names.into_iter().zip(fields) {
        // List properties carry no per-point scalar
        if values.iter().all(|v| v.is_nan()) && !values.is_empty() {
            continue;
        }
        cloud.scalars.insert(name, values);
    }

    let mut edges = EdgeSet::new();
    if let Some(edge_element) = ply.payload.get("edge") {
        for (i, edge) in edge_element.iter().enumerate() {
            let endpoint = |name: &str| {
                get_index_property(edge, name)
                    .filter(|&v| v < cloud.len())
                    .ok_or_else(|| load_error(format!("edge {} has a missing or invalid {}", i, name)))
            };
            let (a, b) = (endpoint("vertex1")?, endpoint("vertex2")?);
            if !edges.insert(a, b) {
                log::trace!("skipping self-loop or duplicate edge {}-{}", a, b);
            }
        }
    }

    log::debug!(
        "loaded {}: {} points, {} fields, {} edges",
        path.display(),
        cloud.len(),
        cloud.scalars.len(),
        edges.len()
    );

    Ok((cloud, edges))
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_index_property(element: &DefaultElement, name: &str) -> Option<usize> {
    match element.get(name)? {
        Property::Int(v) => usize::try_from(*v).ok(),
        Property::UInt(v) => Some(*v as usize),
        Property::Short(v) => usize::try_from(*v).ok(),
        Property::UShort(v) => Some(*v as usize),
        Property::Char(v) => usize::try_from(*v).ok(),
        Property::UChar(v) => Some(*v as usize),
        _ => None,
    }
}

/// Save points, their fields and edges to a PLY file (ASCII format).
///
/// Edges are written in sorted order.
pub fn save<P: AsRef<Path>>(path: P, cloud: &PointCloud, edges: &EdgeSet) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for (name, values) in &cloud.scalars {
        if values.len() != cloud.len() || name.contains(char::is_whitespace) {
            return Err(GraphError::SaveError {
                path: path.to_path_buf(),
                message: format!("field `{}` cannot be written", name),
            });
        }
    }
    let edges = edges.to_sorted_vec();

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by plexus")?;
    writeln!(writer, "element vertex {}", cloud.len())?;
    writeln!(writer, "property double x")?;
    writeln!(writer, "property double y")?;
    writeln!(writer, "property double z")?;
    for name in cloud.scalars.keys() {
        writeln!(writer, "property double {}", name)?;
    }
    writeln!(writer, "element edge {}", edges.len())?;
    writeln!(writer, "property int vertex1")?;
    writeln!(writer, "property int vertex2")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for (i, p) in cloud.positions.iter().enumerate() {
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        for values in cloud.scalars.values() {
            write!(writer, " {}", values[i])?;
        }
        writeln!(writer)?;
    }

    // Write edges
    for e in &edges {
        writeln!(writer, "{} {}", e.start, e.end)?;
    }

    writer.flush()?;
    Ok(())
}
