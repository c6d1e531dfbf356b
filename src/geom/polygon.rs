use anyhow::{Result, anyhow, ensure};

use crate::geom::EPS;
use crate::geom::bboxes::bounding_box;
use crate::{Point, Vector};

/// Type for holding vertex indices for a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleIndex(pub usize, pub usize, pub usize);

/// Planar convex polygon.
///
/// Vertices are ordered counter-clockwise when seen from the front side,
/// i.e. the side the normal `vn` points to.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub name: String,
    pub vn: Vector,
    pts: Vec<Point>,
    tri: Vec<TriangleIndex>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    ///
    /// If `normal` is `None`, it is calculated from the vertex order
    /// (Newell's method). Fails for fewer than 3 points, collinear points,
    /// non-planar or non-convex outlines.
    pub fn new(name: &str, pts: Vec<Point>, normal: Option<Vector>) -> Result<Self> {
        ensure!(
            pts.len() >= 3,
            "Polygon '{name}' needs at least 3 points, got {}",
            pts.len()
        );

        let n = pts.len();
        for i in 0..n {
            ensure!(
                !pts[i].is_close(&pts[(i + 1) % n]),
                "Polygon '{name}' has repeated vertex {i}"
            );
        }

        let vn = match normal {
            Some(v) => v
                .normalize()
                .ok_or_else(|| anyhow!("Normal of polygon '{name}' has zero length"))?,
            None => newell_normal(&pts)
                .ok_or_else(|| anyhow!("Points of polygon '{name}' are collinear"))?,
        };

        let p0 = pts[0];
        for p in pts.iter().skip(1) {
            let dist = (*p - p0).dot(vn);
            ensure!(dist.abs() < 1e-6, "Polygon '{name}' is not planar");
        }

        for i in 0..n {
            let a = pts[i];
            let b = pts[(i + 1) % n];
            let c = pts[(i + 2) % n];
            let turn = (b - a).cross(c - b).dot(vn);
            ensure!(turn > -EPS, "Polygon '{name}' is not convex");
        }

        // Convex outline: a fan around the first vertex is a valid triangulation
        let tri = (1..n - 1).map(|i| TriangleIndex(0, i, i + 1)).collect();

        Ok(Self {
            name: name.to_string(),
            vn,
            pts,
            tri,
        })
    }

    pub fn vertices(&self) -> &[Point] {
        &self.pts
    }

    pub fn triangles(&self) -> &[TriangleIndex] {
        &self.tri
    }

    /// Bounding box corners (min, max).
    pub fn bbox(&self) -> (Point, Point) {
        // A polygon always has at least 3 vertices
        bounding_box(&self.pts).unwrap_or((self.pts[0], self.pts[0]))
    }
}

/// Newell's method for the normal of a (possibly non-triangular) outline.
fn newell_normal(pts: &[Point]) -> Option<Vector> {
    let n = pts.len();
    let mut v = Vector::new(0.0, 0.0, 0.0);
    for i in 0..n {
        let cur = pts[i];
        let next = pts[(i + 1) % n];
        v.dx += (cur.y - next.y) * (cur.z + next.z);
        v.dy += (cur.z - next.z) * (cur.x + next.x);
        v.dz += (cur.x - next.x) * (cur.y + next.y);
    }
    v.normalize()
}
