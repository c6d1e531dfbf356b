use crate::geom::EPS;
use crate::geom::point::Point;
use crate::geom::vector::Vector;

/// Returns the (min, max) corners of the box holding all points `pts`.
///
/// Returns `None` for an empty slice.
pub fn bounding_box(pts: &[Point]) -> Option<(Point, Point)> {
    let first = pts.first()?;
    let (mut pmin, mut pmax) = (*first, *first);
    for p in pts.iter().skip(1) {
        pmin = Point::new(pmin.x.min(p.x), pmin.y.min(p.y), pmin.z.min(p.z));
        pmax = Point::new(pmax.x.max(p.x), pmax.y.max(p.y), pmax.z.max(p.z));
    }
    Some((pmin, pmax))
}

/// Slab test: does the ray `origin + t * dir` (t >= 0) pass through the box?
///
/// The box is inflated by `margin` on every side so that rays grazing
/// flat (zero-thickness) boxes of planar polygons are not rejected.
pub fn ray_hits_bbox(origin: Point, dir: Vector, bmin: Point, bmax: Point, margin: f64) -> bool {
    let mut t_near = 0.0_f64;
    let mut t_far = f64::INFINITY;

    let axes = [
        (origin.x, dir.dx, bmin.x - margin, bmax.x + margin),
        (origin.y, dir.dy, bmin.y - margin, bmax.y + margin),
        (origin.z, dir.dz, bmin.z - margin, bmax.z + margin),
    ];

    for (o, d, lo, hi) in axes {
        if d.abs() < EPS {
            // Parallel to this slab: must already be inside it
            if o < lo || o > hi {
                return false;
            }
            continue;
        }
        let t0 = (lo - o) / d;
        let t1 = (hi - o) / d;
        let (t0, t1) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return false;
        }
    }

    true
}
