//! Scene representation and the ray/geometry query used by the comfort models.

use crate::geom::bboxes::{bounding_box, ray_hits_bbox};
use crate::geom::ray::Ray;
use crate::{Point, Polygon, Vector};

/// Margin added to polygon boxes before the slab test [m].
const BBOX_MARGIN: f64 = 1e-9;

/// First intersection of a ray with scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Intersection point.
    pub point: Point,
    /// Index of the hit surface in the scene.
    pub surface: usize,
    /// Distance from the ray origin [m].
    pub distance: f64,
}

/// Geometry query consumed by view factor sampling and shadow tests.
///
/// Implementations must never panic on a miss and must tolerate an origin
/// lying on a surface. `Sync` is required because points are processed
/// in parallel against one shared scene.
pub trait Intersect: Sync {
    /// Returns the closest hit along `direction` from `origin`, if any.
    fn intersect(&self, origin: Point, direction: Vector) -> Option<Hit>;
}

/// Flattened scene representation for fast indexed access during simulation.
pub struct FlatScene {
    /// All polygons in the scene.
    pub polygons: Vec<Polygon>,
    /// Bounding box of each polygon.
    bboxes: Vec<(Point, Point)>,
    /// Scene bounding box, `None` for an empty scene.
    bbox: Option<(Point, Point)>,
}

impl FlatScene {
    /// Creates a flat scene from a list of polygons.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let bboxes: Vec<(Point, Point)> = polygons.iter().map(|p| p.bbox()).collect();
        let all_pts: Vec<Point> = polygons
            .iter()
            .flat_map(|p| p.vertices().iter().copied())
            .collect();
        let bbox = bounding_box(&all_pts);

        Self {
            polygons,
            bboxes,
            bbox,
        }
    }

    /// A scene without geometry: every ray escapes.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Scene bounding box (min, max), `None` for an empty scene.
    pub fn bbox(&self) -> Option<(Point, Point)> {
        self.bbox
    }

    /// Finds the closest polygon in the ray's direction.
    ///
    /// Polygons whose bounding box is missed by the ray are skipped
    /// before the triangle tests.
    ///
    /// Returns (polygon_index, distance) or None if no target found.
    pub fn find_target_surface(&self, origin: Point, direction: Vector) -> Option<(usize, f64)> {
        let (smin, smax) = self.bbox?;
        let ray = Ray::new(origin, direction)?;

        if !ray_hits_bbox(origin, ray.direction, smin, smax, BBOX_MARGIN) {
            return None;
        }

        let mut closest: Option<(usize, f64)> = None;

        for (idx, polygon) in self.polygons.iter().enumerate() {
            let (pmin, pmax) = self.bboxes[idx];
            if !ray_hits_bbox(origin, ray.direction, pmin, pmax, BBOX_MARGIN) {
                continue;
            }

            if let Some((t, _)) = ray.intersect_polygon(polygon) {
                match closest {
                    None => closest = Some((idx, t)),
                    Some((_, best_t)) if t < best_t => closest = Some((idx, t)),
                    _ => {}
                }
            }
        }

        closest
    }
}

impl Intersect for FlatScene {
    fn intersect(&self, origin: Point, direction: Vector) -> Option<Hit> {
        let (surface, distance) = self.find_target_surface(origin, direction)?;
        let dir = direction.normalize()?;
        Some(Hit {
            point: origin + dir * distance,
            surface,
            distance,
        })
    }
}
