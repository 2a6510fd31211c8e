//! Three-dimensional convex hulls.
//!
//! The diagram only needs the triangulated boundary of the point cloud, so
//! the hull is abstracted behind [`ConvexHull`]. [`IncrementalHull`] is the
//! built-in implementation: it seeds a tetrahedron from extreme points and
//! inserts the remaining points one by one, replacing the faces each point
//! can see by a fan over their horizon.

use super::error::Error;
use nalgebra::Vector3;
use std::collections::HashSet;

/// Computes the triangulated boundary of a point cloud.
pub trait ConvexHull {
    /// Returns the hull triangles as index triples into `points`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegenerateHull`] if the points do not span three
    /// dimensions.
    fn facets(&self, points: &[[f64; 3]]) -> Result<Vec<[usize; 3]>, Error>;
}

/// Default tolerance, relative to the extent of the point cloud.
pub const DEFAULT_HULL_TOLERANCE: f64 = 1e-10;

/// Incremental (beneath-beyond) convex hull.
///
/// Points closer to a face plane than the tolerance are treated as lying
/// on or inside the hull and never become vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncrementalHull {
    relative_tolerance: f64,
}

impl Default for IncrementalHull {
    fn default() -> Self {
        Self {
            relative_tolerance: DEFAULT_HULL_TOLERANCE,
        }
    }
}

impl IncrementalHull {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `tolerance` times the largest coordinate extent as the
    /// visibility threshold.
    pub fn with_tolerance(relative_tolerance: f64) -> Self {
        Self { relative_tolerance }
    }
}

#[derive(Debug, Clone, Copy)]
struct Face {
    vertices: [usize; 3],
    normal: Vector3<f64>,
    offset: f64,
}

impl Face {
    /// Face with counter-clockwise winding seen from outside.
    fn new(vertices: [usize; 3], points: &[Vector3<f64>]) -> Self {
        let [a, b, c] = vertices.map(|i| points[i]);
        let normal = (b - a).cross(&(c - a)).normalize();
        Self {
            vertices,
            normal,
            offset: normal.dot(&a),
        }
    }

    /// Face oriented so that `interior` lies beneath it.
    fn oriented(vertices: [usize; 3], points: &[Vector3<f64>], interior: &Vector3<f64>) -> Self {
        let face = Self::new(vertices, points);
        if face.distance(interior) > 0.0 {
            let [a, b, c] = vertices;
            Self::new([a, c, b], points)
        } else {
            face
        }
    }

    #[inline]
    fn distance(&self, point: &Vector3<f64>) -> f64 {
        self.normal.dot(point) - self.offset
    }

    fn edges(&self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

fn farthest_by(
    candidates: impl Iterator<Item = usize>,
    measure: impl Fn(usize) -> f64,
) -> Option<(usize, f64)> {
    candidates
        .map(|i| (i, measure(i)))
        .fold(None, |best, (i, d)| match best {
            Some((_, best_d)) if best_d >= d => best,
            _ => Some((i, d)),
        })
}

impl IncrementalHull {
    fn seed(&self, points: &[Vector3<f64>], eps: f64) -> Result<[usize; 4], Error> {
        let n = points.len();
        let p0 = (0..n)
            .min_by(|&a, &b| points[a].x.total_cmp(&points[b].x))
            .ok_or_else(|| Error::DegenerateHull("no points".to_string()))?;

        let (p1, d1) = farthest_by(0..n, |i| (points[i] - points[p0]).norm())
            .ok_or_else(|| Error::DegenerateHull("no points".to_string()))?;
        if d1 <= eps {
            return Err(Error::DegenerateHull("all points coincide".to_string()));
        }

        let axis = (points[p1] - points[p0]) / d1;
        let (p2, d2) = farthest_by(0..n, |i| (points[i] - points[p0]).cross(&axis).norm())
            .ok_or_else(|| Error::DegenerateHull("no points".to_string()))?;
        if d2 <= eps {
            return Err(Error::DegenerateHull("all points are collinear".to_string()));
        }

        let normal = (points[p1] - points[p0])
            .cross(&(points[p2] - points[p0]))
            .normalize();
        let (p3, d3) = farthest_by(0..n, |i| normal.dot(&(points[i] - points[p0])).abs())
            .ok_or_else(|| Error::DegenerateHull("no points".to_string()))?;
        if d3 <= eps {
            return Err(Error::DegenerateHull("all points are coplanar".to_string()));
        }

        Ok([p0, p1, p2, p3])
    }
}

impl ConvexHull for IncrementalHull {
    fn facets(&self, points: &[[f64; 3]]) -> Result<Vec<[usize; 3]>, Error> {
        if points.len() < 4 {
            return Err(Error::DegenerateHull(format!(
                "a three-dimensional hull needs at least 4 points, found {}",
                points.len()
            )));
        }
        let points: Vec<Vector3<f64>> = points.iter().map(|p| Vector3::from(*p)).collect();

        let extent = (0..3)
            .map(|k| {
                let lo = points.iter().map(|p| p[k]).fold(f64::INFINITY, f64::min);
                let hi = points.iter().map(|p| p[k]).fold(f64::NEG_INFINITY, f64::max);
                hi - lo
            })
            .fold(0.0, f64::max);
        if !extent.is_finite() {
            return Err(Error::DegenerateHull(
                "point coordinates are not finite".to_string(),
            ));
        }
        let eps = self.relative_tolerance * extent.max(1.0);

        let seed = self.seed(&points, eps)?;
        let interior = seed.iter().map(|&i| points[i]).sum::<Vector3<f64>>() / 4.0;
        let [a, b, c, d] = seed;
        let mut faces: Vec<Face> = [[a, b, c], [a, b, d], [a, c, d], [b, c, d]]
            .into_iter()
            .map(|v| Face::oriented(v, &points, &interior))
            .collect();

        for p in (0..points.len()).filter(|i| !seed.contains(i)) {
            let point = &points[p];
            let (visible, hidden): (Vec<Face>, Vec<Face>) =
                faces.into_iter().partition(|f| f.distance(point) > eps);
            faces = hidden;
            if visible.is_empty() {
                continue;
            }

            let visible_edges: HashSet<(usize, usize)> =
                visible.iter().flat_map(Face::edges).collect();
            for face in &visible {
                for (u, v) in face.edges() {
                    if !visible_edges.contains(&(v, u)) {
                        faces.push(Face::new([u, v, p], &points));
                    }
                }
            }
        }

        Ok(faces.into_iter().map(|f| f.vertices).collect())
    }
}
