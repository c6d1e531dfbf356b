//! Sky and ground view factors from hemispherical ray sampling.
//!
//! Rays are cast from the pedestrian location along a fixed set of
//! quasi-uniform directions. Upper-hemisphere rays that escape count as
//! sky, lower-hemisphere rays that escape count as ground, and every ray
//! that hits the scene yields an intercept where surface data is looked up.
//!
//! The ground is implicit: if a literal ground polygon is part of the
//! scene, its hits are intercepts and not ground.

use serde::Serialize;

use crate::geom::sphere::fibonacci_sphere;
use crate::sim::engine::Intersect;
use crate::{Point, Vector};

/// Fixed, ordered set of unit directions split into hemispheres.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionSet {
    upper: Vec<Vector>,
    lower: Vec<Vector>,
}

impl DirectionSet {
    /// Generates `n` quasi-uniform directions (deterministic).
    ///
    /// Directions with `dz > 0` form the upper hemisphere, all others
    /// the lower one.
    pub fn new(n: usize) -> Self {
        let (upper, lower) = fibonacci_sphere(n).into_iter().partition(|v| v.dz > 0.0);
        Self { upper, lower }
    }

    pub fn upper(&self) -> &[Vector] {
        &self.upper
    }

    pub fn lower(&self) -> &[Vector] {
        &self.lower
    }

    /// Total number of directions.
    pub fn len(&self) -> usize {
        self.upper.len() + self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of sampling one point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewFactorResult {
    /// Fraction of upper-hemisphere rays reaching the sky.
    pub sky_view_factor: f64,
    /// Fraction of lower-hemisphere rays reaching the implicit ground.
    pub ground_view_factor: f64,
    /// First hit of every ray that met geometry, upper hemisphere first.
    pub intercepts: Vec<Point>,
}

impl ViewFactorResult {
    /// Adds `count` unmapped intercepts to the sky term.
    ///
    /// Each of them is worth `1 / n_directions`. Unmapped lower-hemisphere
    /// intercepts count too, so the result is not capped at 1.
    pub fn reclassify_as_sky(&mut self, count: usize, n_directions: usize) {
        if count > 0 && n_directions > 0 {
            self.sky_view_factor += count as f64 / n_directions as f64;
        }
    }
}

/// Casts the direction set from a point into the scene.
#[derive(Debug, Clone)]
pub struct ViewFactorSampler {
    directions: DirectionSet,
}

impl ViewFactorSampler {
    pub fn new(n_directions: usize) -> Self {
        Self {
            directions: DirectionSet::new(n_directions),
        }
    }

    pub fn directions(&self) -> &DirectionSet {
        &self.directions
    }

    pub fn n_directions(&self) -> usize {
        self.directions.len()
    }

    /// Computes sky/ground view factors and surface intercepts at `point`.
    pub fn sample<S: Intersect + ?Sized>(&self, point: Point, scene: &S) -> ViewFactorResult {
        let mut intercepts = Vec::new();

        let mut sky = 0usize;
        for dir in self.directions.upper() {
            match scene.intersect(point, *dir) {
                Some(hit) => intercepts.push(hit.point),
                None => sky += 1,
            }
        }

        let mut ground = 0usize;
        for dir in self.directions.lower() {
            match scene.intersect(point, *dir) {
                Some(hit) => intercepts.push(hit.point),
                None => ground += 1,
            }
        }

        ViewFactorResult {
            sky_view_factor: ratio(sky, self.directions.upper().len()),
            ground_view_factor: ratio(ground, self.directions.lower().len()),
            intercepts,
        }
    }
}

/// `count / total`, treating an empty hemisphere as fully open.
fn ratio(count: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::block::{box_polygons, ground_rectangle};
    use crate::sim::engine::FlatScene;
    use anyhow::Result;

    #[test]
    fn test_direction_set_partition() {
        let dirs = DirectionSet::new(1000);
        assert_eq!(dirs.len(), 1000);
        assert_eq!(dirs.upper().len(), 500);
        assert_eq!(dirs.lower().len(), 500);
        assert!(dirs.upper().iter().all(|v| v.dz > 0.0));
        assert!(dirs.lower().iter().all(|v| v.dz <= 0.0));
        assert_eq!(dirs, DirectionSet::new(1000));
    }

    #[test]
    fn test_empty_scene_is_all_sky_and_ground() {
        let sampler = ViewFactorSampler::new(1000);
        let res = sampler.sample(Point::new(0.0, 0.0, 1.5), &FlatScene::empty());
        assert_eq!(res.sky_view_factor, 1.0);
        assert_eq!(res.ground_view_factor, 1.0);
        assert!(res.intercepts.is_empty());
    }

    #[test]
    fn test_literal_ground_hits_are_intercepts() -> Result<()> {
        let ground = ground_rectangle("ground", -1e4, -1e4, 1e4, 1e4, 0.0)?;
        let scene = FlatScene::new(vec![ground]);
        let sampler = ViewFactorSampler::new(200);
        let res = sampler.sample(Point::new(0.0, 0.0, 1.5), &scene);

        assert_eq!(res.sky_view_factor, 1.0);
        // Only near-horizontal rays can escape a large plane
        assert!(res.ground_view_factor < 0.05);
        assert!(res.intercepts.iter().all(|p| p.z.abs() < 1e-9));
        Ok(())
    }

    #[test]
    fn test_point_inside_box_sees_nothing() -> Result<()> {
        let scene = FlatScene::new(box_polygons("room", 4.0, 4.0, 4.0, Point::new(0.0, 0.0, 0.0))?);
        let sampler = ViewFactorSampler::new(300);
        let res = sampler.sample(Point::new(2.0, 2.0, 2.0), &scene);
        assert_eq!(res.sky_view_factor, 0.0);
        assert_eq!(res.ground_view_factor, 0.0);
        assert_eq!(res.intercepts.len(), 300);
        Ok(())
    }

    #[test]
    fn test_hits_and_escapes_cover_every_ray() -> Result<()> {
        let scene = FlatScene::new(box_polygons("b", 10.0, 10.0, 20.0, Point::new(2.0, -5.0, 0.0))?);
        let sampler = ViewFactorSampler::new(1000);
        let res = sampler.sample(Point::new(0.0, 0.0, 1.5), &scene);

        let upper_hits = res.intercepts.iter().filter(|p| p.z > 1.5).count();
        let upper = sampler.directions().upper().len() as f64;
        assert!((res.sky_view_factor + upper_hits as f64 / upper - 1.0).abs() < 1e-12);
        assert!(res.sky_view_factor > 0.5 && res.sky_view_factor < 1.0);
        Ok(())
    }

    #[test]
    fn test_reclassify_as_sky() {
        let mut res = ViewFactorResult {
            sky_view_factor: 0.5,
            ground_view_factor: 1.0,
            intercepts: Vec::new(),
        };
        res.reclassify_as_sky(3, 1000);
        assert!((res.sky_view_factor - 0.503).abs() < 1e-12);
        res.reclassify_as_sky(0, 1000);
        assert!((res.sky_view_factor - 0.503).abs() < 1e-12);
    }

    #[test]
    fn test_reclassify_open_sky_is_not_capped() {
        let mut res = ViewFactorResult {
            sky_view_factor: 1.0,
            ground_view_factor: 0.9,
            intercepts: Vec::new(),
        };
        // 50 lower-hemisphere rays hit walls without data
        res.reclassify_as_sky(50, 1000);
        assert!((res.sky_view_factor - 1.05).abs() < 1e-12);
    }
}
