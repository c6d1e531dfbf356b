//! Ray casting infrastructure.
//!
//! This module provides a Ray struct and ray-geometry intersection tests
//! used by view factor sampling and shadow tests.

use crate::{Point, Polygon, Vector};

/// Intersections closer than this to the ray origin are ignored.
///
/// Keeps rays that start on a surface from hitting that same surface.
pub const T_MIN: f64 = 1e-6;

/// A ray defined by an origin point and a direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Point,
    /// Direction vector (normalized)
    pub direction: Vector,
}

impl Ray {
    /// Creates a new ray from origin point and direction vector.
    ///
    /// The direction vector is automatically normalized.
    pub fn new(origin: Point, direction: Vector) -> Option<Self> {
        let normalized = direction.normalize()?;
        Some(Self {
            origin,
            direction: normalized,
        })
    }

    /// Creates a ray from two points (origin to target).
    pub fn from_points(origin: Point, target: Point) -> Option<Self> {
        Self::new(origin, target - origin)
    }

    /// Returns the point along the ray at parameter t.
    ///
    /// point = origin + t * direction
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Möller-Trumbore intersection with triangle `(a, b, c)`.
    ///
    /// Both triangle sides count. Returns the ray parameter `t > T_MIN`.
    pub fn intersect_triangle(&self, a: Point, b: Point, c: Point) -> Option<f64> {
        let e1 = b - a;
        let e2 = c - a;
        let p = self.direction.cross(e2);
        let det = e1.dot(p);
        if det.abs() < 1e-12 {
            return None; // Ray parallel to triangle plane
        }
        let inv_det = 1.0 / det;

        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(e1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = e2.dot(q) * inv_det;
        if t > T_MIN { Some(t) } else { None }
    }

    /// Calculates the intersection of this ray with a polygon.
    ///
    /// Returns `Some((t, point))` for the nearest hit in front of the origin.
    pub fn intersect_polygon(&self, polygon: &Polygon) -> Option<(f64, Point)> {
        let verts = polygon.vertices();
        polygon
            .triangles()
            .iter()
            .filter_map(|tri| self.intersect_triangle(verts[tri.0], verts[tri.1], verts[tri.2]))
            .min_by(f64::total_cmp)
            .map(|t| (t, self.point_at(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn make_xy_square() -> Result<Polygon> {
        let pts = vec![
            Point::new(0.0, 0.0, 0.0),
            Point::new(2.0, 0.0, 0.0),
            Point::new(2.0, 2.0, 0.0),
            Point::new(0.0, 2.0, 0.0),
        ];
        Polygon::new("square", pts, None)
    }

    #[test]
    fn test_ray_creation() {
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));
        assert!(ray.is_some());

        // Zero direction should fail
        let ray = Ray::new(Point::new(0.0, 0.0, 0.0), Vector::new(0.0, 0.0, 0.0));
        assert!(ray.is_none());
    }

    #[test]
    fn test_ray_point_at() {
        let ray = Ray::from_points(Point::new(0.0, 0.0, 0.0), Point::new(3.0, 0.0, 0.0)).unwrap();
        let p = ray.point_at(5.0);
        assert!(p.is_close(&Point::new(5.0, 0.0, 0.0)));
    }

    #[test]
    fn test_ray_polygon_intersection() -> Result<()> {
        let polygon = make_xy_square()?;

        // Ray pointing at polygon from below
        let ray = Ray::new(Point::new(1.0, 1.0, -5.0), Vector::new(0.0, 0.0, 1.0)).unwrap();
        let (t, point) = ray.intersect_polygon(&polygon).unwrap();
        assert!((t - 5.0).abs() < 1e-9);
        assert!((point.z).abs() < 1e-9);

        // Same polygon hit from the back side
        let ray = Ray::new(Point::new(0.5, 1.5, 3.0), Vector::new(0.0, 0.0, -1.0)).unwrap();
        assert!(ray.intersect_polygon(&polygon).is_some());
        Ok(())
    }

    #[test]
    fn test_ray_misses_polygon() -> Result<()> {
        let polygon = make_xy_square()?;

        // Pointing away
        let ray = Ray::new(Point::new(1.0, 1.0, -5.0), Vector::new(0.0, 0.0, -1.0)).unwrap();
        assert!(ray.intersect_polygon(&polygon).is_none());

        // Parallel
        let ray = Ray::new(Point::new(1.0, 1.0, 1.0), Vector::new(1.0, 0.0, 0.0)).unwrap();
        assert!(ray.intersect_polygon(&polygon).is_none());

        // Hits plane outside the outline
        let ray = Ray::new(Point::new(10.0, 10.0, -5.0), Vector::new(0.0, 0.0, 1.0)).unwrap();
        assert!(ray.intersect_polygon(&polygon).is_none());
        Ok(())
    }

    #[test]
    fn test_origin_on_surface_does_not_self_intersect() -> Result<()> {
        let polygon = make_xy_square()?;
        let ray = Ray::new(Point::new(1.0, 1.0, 0.0), Vector::new(0.0, 0.3, 1.0)).unwrap();
        assert!(ray.intersect_polygon(&polygon).is_none());
        Ok(())
    }
}
