//! Projection of 3D points onto a plane.
//!
//! Face enumeration works in 2D. A [`Projection`] defines an orthonormal frame
//! `(u, v, normal)` with an origin and maps points to `(u, v)` coordinates.

use nalgebra::{Matrix3, Point2, Point3, SymmetricEigen, Vector3};

use crate::error::{GraphError, Result};

/// An orthonormal planar frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    origin: Point3<f64>,
    u: Vector3<f64>,
    v: Vector3<f64>,
    normal: Vector3<f64>,
}

impl Default for Projection {
    /// Projection onto the XY plane.
    fn default() -> Self {
        Self {
            origin: Point3::origin(),
            u: Vector3::x(),
            v: Vector3::y(),
            normal: Vector3::z(),
        }
    }
}

impl Projection {
    /// Projection onto the plane through the origin with the given normal.
    ///
    /// A `+Z` normal maps X and Y to themselves. The frame is right-handed,
    /// so counter-clockwise loops seen from the normal stay counter-clockwise.
    ///
    /// # Errors
    /// Returns [`GraphError::InvalidParameter`] for a zero or non-finite normal.
    pub fn from_normal(normal: Vector3<f64>) -> Result<Self> {
        Self::with_origin(Point3::origin(), normal)
    }

    /// Projection onto the plane through `origin` with the given normal.
    pub fn with_origin(origin: Point3<f64>, normal: Vector3<f64>) -> Result<Self> {
        let len = normal.norm();
        if !len.is_finite() || len < 1e-12 {
            return Err(GraphError::invalid_param(
                "normal",
                format!("{:?}", normal.as_slice()),
                "must be non-zero and finite",
            ));
        }
        let n = normal / len;

        let helper = if n.x.abs() < 0.9 {
            Vector3::x()
        } else {
            Vector3::y()
        };
        let u = (helper - n * n.dot(&helper)).normalize();
        let v = n.cross(&u);

        Ok(Self {
            origin,
            u,
            v,
            normal: n,
        })
    }

    /// Least-squares plane through `points`.
    ///
    /// The normal is the eigenvector of the smallest covariance eigenvalue,
    /// flipped so its largest component is positive. The centroid becomes the
    /// origin.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyInput`] if `points` is empty.
    pub fn best_fit(points: &[Point3<f64>]) -> Result<Self> {
        if points.is_empty() {
            return Err(GraphError::EmptyInput);
        }

        let n = points.len() as f64;
        let centroid = Point3::from(
            points
                .iter()
                .fold(Vector3::zeros(), |acc, p| acc + p.coords)
                / n,
        );

        let mut cov = Matrix3::zeros();
        for p in points {
            let d = p - centroid;
            cov += d * d.transpose();
        }
        cov /= n;

        let eigen = SymmetricEigen::new(cov);
        let mut smallest = 0;
        for i in 1..3 {
            if eigen.eigenvalues[i] < eigen.eigenvalues[smallest] {
                smallest = i;
            }
        }
        let mut normal: Vector3<f64> = eigen.eigenvectors.column(smallest).into_owned();

        let dominant = normal.iamax();
        if normal[dominant] < 0.0 {
            normal = -normal;
        }

        Self::with_origin(centroid, normal)
    }

    /// The unit plane normal.
    #[inline]
    pub fn normal(&self) -> Vector3<f64> {
        self.normal
    }

    /// The in-plane unit axes `(u, v)`.
    #[inline]
    pub fn axes(&self) -> (Vector3<f64>, Vector3<f64>) {
        (self.u, self.v)
    }

    /// The plane origin.
    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    /// In-plane coordinates of a point.
    #[inline]
    pub fn project(&self, p: &Point3<f64>) -> Point2<f64> {
        let d = p - self.origin;
        Point2::new(d.dot(&self.u), d.dot(&self.v))
    }

    /// Project every point.
    pub fn project_all(&self, points: &[Point3<f64>]) -> Vec<Point2<f64>> {
        points.iter().map(|p| self.project(p)).collect()
    }

    /// In-plane coordinates lifted back to 3D with zero height.
    #[inline]
    pub fn flatten(&self, p: &Point3<f64>) -> Point3<f64> {
        let q = self.project(p);
        Point3::new(q.x, q.y, 0.0)
    }

    /// Flatten every point.
    pub fn flatten_all(&self, points: &[Point3<f64>]) -> Vec<Point3<f64>> {
        points.iter().map(|p| self.flatten(p)).collect()
    }
}
