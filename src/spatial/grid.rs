//! Uniform spatial hash grid.
//!
//! Points are bucketed by `floor(coord / cell_size)`. Box queries visit the
//! integer cell range covered by the box, or every bucket when that range is
//! larger than the number of occupied buckets, and test each point exactly.

use std::collections::HashMap;

use nalgebra::Point3;

use super::{Aabb, SpatialIndex};
use crate::error::{GraphError, Result};

type CellKey = [i64; 3];

/// A hash grid over 3D points.
#[derive(Debug, Clone)]
pub struct HashGrid {
    cell_size: f64,
    cells: HashMap<CellKey, Vec<(usize, Point3<f64>)>>,
    len: usize,
}

impl HashGrid {
    /// Create an empty grid.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] if `cell_size` is not a
    /// positive finite number.
    pub fn new(cell_size: f64) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(GraphError::invalid_param(
                "cell_size",
                cell_size,
                "must be positive and finite",
            ));
        }
        Ok(Self {
            cell_size,
            cells: HashMap::new(),
            len: 0,
        })
    }

    /// Index every point.
    pub fn from_points(points: &[Point3<f64>], cell_size: f64) -> Result<Self> {
        let mut grid = Self::new(cell_size)?;
        for (i, p) in points.iter().enumerate() {
            grid.insert(i, *p);
        }
        Ok(grid)
    }

    /// Index only the points whose `keep` flag is set.
    ///
    /// Probing pipelines pass the `accept_connections` flags here so that
    /// queries never return points that cannot be connected to.
    pub fn from_points_filtered(
        points: &[Point3<f64>],
        cell_size: f64,
        keep: &[bool],
    ) -> Result<Self> {
        GraphError::check_len("keep flags", points.len(), keep.len())?;

        let mut grid = Self::new(cell_size)?;
        for (i, p) in points.iter().enumerate() {
            if keep[i] {
                grid.insert(i, *p);
            }
        }
        Ok(grid)
    }

    /// Insert a point. Points with non-finite coordinates are ignored.
    pub fn insert(&mut self, index: usize, position: Point3<f64>) {
        if !position.iter().all(|c| c.is_finite()) {
            log::trace!("skipping non-finite point {}", index);
            return;
        }
        let key = self.key(&position);
        self.cells.entry(key).or_default().push((index, position));
        self.len += 1;
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The edge length of a grid cell.
    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    fn key(&self, p: &Point3<f64>) -> CellKey {
        // `as` saturates, so huge coordinates clamp instead of wrapping
        [
            (p.x / self.cell_size).floor() as i64,
            (p.y / self.cell_size).floor() as i64,
            (p.z / self.cell_size).floor() as i64,
        ]
    }
}

impl SpatialIndex for HashGrid {
    fn for_each_in_box(&self, bounds: &Aabb, visit: &mut dyn FnMut(usize)) {
        if self.cells.is_empty() {
            return;
        }

        let lo = self.key(&bounds.min);
        let hi = self.key(&bounds.max);

        let span = (0..3).try_fold(1u64, |acc, i| {
            let width = hi[i].checked_sub(lo[i])?.checked_add(1)?;
            acc.checked_mul(u64::try_from(width).ok()?)
        });

        let mut emit = |bucket: &[(usize, Point3<f64>)]| {
            for (index, p) in bucket {
                if bounds.contains(p) {
                    visit(*index);
                }
            }
        };

        match span {
            Some(span) if span <= self.cells.len() as u64 => {
                for x in lo[0]..=hi[0] {
                    for y in lo[1]..=hi[1] {
                        for z in lo[2]..=hi[2] {
                            if let Some(bucket) = self.cells.get(&[x, y, z]) {
                                emit(bucket.as_slice());
                            }
                        }
                    }
                }
            }
            _ => {
                for bucket in self.cells.values() {
                    emit(bucket.as_slice());
                }
            }
        }
    }
}
