//! Direct-beam shadow test.

use rayon::prelude::*;

use crate::sim::engine::Intersect;
use crate::sim::field::SpatialField;
use crate::{Point, Vector};

/// Returns `true` if nothing blocks the ray from `point` toward the sun.
///
/// Points lying on a surface are not corrected for self-shadowing: the
/// surface they sit on is ignored by the intersection query.
pub fn is_sunlit<S: Intersect + ?Sized>(point: Point, scene: &S, solar_vector: Vector) -> bool {
    scene.intersect(point, solar_vector).is_none()
}

/// Shadow map over many points: 1.0 where sunlit, 0.0 where shadowed.
pub fn shadow_field<S: Intersect + ?Sized>(
    points: &[Point],
    scene: &S,
    solar_vector: Vector,
) -> SpatialField {
    let samples: Vec<f64> = points
        .par_iter()
        .map(|&p| if is_sunlit(p, scene, solar_vector) { 1.0 } else { 0.0 })
        .collect();

    let mut field = SpatialField::new();
    for (&p, v) in points.iter().zip(samples) {
        field.push(p, v);
    }
    field
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::block::box_polygons;
    use crate::sim::engine::FlatScene;
    use anyhow::Result;

    fn canopy_scene() -> Result<FlatScene> {
        // A 2 m thick slab floating 5-7 m above the origin
        Ok(FlatScene::new(box_polygons(
            "canopy",
            4.0,
            4.0,
            2.0,
            Point::new(-2.0, -2.0, 5.0),
        )?))
    }

    #[test]
    fn test_shadow_under_canopy() -> Result<()> {
        let scene = canopy_scene()?;
        let up = Vector::new(0.0, 0.0, 1.0);
        assert!(!is_sunlit(Point::new(0.0, 0.0, 1.5), &scene, up));
        assert!(is_sunlit(Point::new(10.0, 0.0, 1.5), &scene, up));
        // Low sun from the side reaches under the canopy
        let low_sun = Vector::new(1.0, 0.0, 0.1);
        assert!(is_sunlit(Point::new(0.0, 0.0, 1.5), &scene, low_sun));
        Ok(())
    }

    #[test]
    fn test_empty_scene_is_sunlit() {
        let scene = FlatScene::empty();
        assert!(is_sunlit(
            Point::new(0.0, 0.0, 0.0),
            &scene,
            Vector::new(0.3, 0.2, 0.9)
        ));
    }

    #[test]
    fn test_point_on_roof_is_sunlit() -> Result<()> {
        let scene = canopy_scene()?;
        let up = Vector::new(0.0, 0.0, 1.0);
        assert!(is_sunlit(Point::new(0.0, 0.0, 7.0), &scene, up));
        Ok(())
    }

    #[test]
    fn test_shadow_field() -> Result<()> {
        let scene = canopy_scene()?;
        let points = [Point::new(0.0, 0.0, 1.5), Point::new(10.0, 0.0, 1.5)];
        let field = shadow_field(&points, &scene, Vector::new(0.0, 0.0, 1.0));
        assert_eq!(field.values(), vec![0.0, 1.0]);
        Ok(())
    }
}
