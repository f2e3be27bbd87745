//! Plain text point lists.
//!
//! One point per line: `x y z` followed by optional extra values, separated by
//! whitespace or commas. Blank lines and lines starting with `#` are skipped.
//! Extra columns are loaded as fields named `field0`, `field1`, ...

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::Point3;

use super::PointCloud;
use crate::error::{GraphError, Result};

/// Load a point cloud from an XYZ file.
///
/// Every data line must have the same number of columns.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PointCloud> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let load_error = |line: usize, message: String| GraphError::LoadError {
        path: path.to_path_buf(),
        message: format!("line {}: {}", line, message),
    };

    let mut positions = Vec::new();
    let mut extras: Vec<Vec<f64>> = Vec::new();
    let mut columns: Option<usize> = None;

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let values = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|s| !s.is_empty())
            .map(|s| s.parse::<f64>())
            .collect::<std::result::Result<Vec<f64>, _>>()
            .map_err(|e| load_error(i + 1, e.to_string()))?;

        if values.len() < 3 {
            return Err(load_error(i + 1, format!("expected at least 3 values, found {}", values.len())));
        }
        match columns {
            None => {
                columns = Some(values.len());
                extras = vec![Vec::new(); values.len() - 3];
            }
            Some(n) if n != values.len() => {
                return Err(load_error(i + 1, format!("expected {} values, found {}", n, values.len())));
            }
            Some(_) => {}
        }

        positions.push(Point3::new(values[0], values[1], values[2]));
        for (field, &v) in extras.iter_mut().zip(&values[3..]) {
            field.push(v);
        }
    }

    let mut cloud = PointCloud::new(positions);
    for (k, values) in extras.into_iter().enumerate() {
        cloud.scalars.insert(format!("field{}", k), values);
    }
    Ok(cloud)
}

/// Save a point cloud as XYZ text.
///
/// Fields are written after the coordinates in sorted name order, listed in a
/// leading comment.
pub fn save<P: AsRef<Path>>(path: P, cloud: &PointCloud) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);

    let fields: Vec<(&str, &[f64])> = cloud
        .scalars
        .iter()
        .map(|(name, values)| (name.as_str(), values.as_slice()))
        .collect();

    write!(writer, "# x y z")?;
    for (name, _) in &fields {
        write!(writer, " {}", name)?;
    }
    writeln!(writer)?;

    for (i, p) in cloud.positions.iter().enumerate() {
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        for (_, values) in &fields {
            write!(writer, " {}", values.get(i).copied().unwrap_or(f64::NAN))?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
