//! Simple building-block geometry: boxes and ground patches.

use anyhow::{Result, ensure};

use crate::{Point, Polygon};

/// Creates the six faces of an axis-aligned box with outward normals.
///
/// `origin` is the minimum corner. Face names are `{name}/floor`,
/// `{name}/roof` and `{name}/wall_0..3`.
pub fn box_polygons(name: &str, dx: f64, dy: f64, dz: f64, origin: Point) -> Result<Vec<Polygon>> {
    ensure!(
        dx > 0.0 && dy > 0.0 && dz > 0.0,
        "Box '{name}' must have positive dimensions, got ({dx}, {dy}, {dz})"
    );

    let p = |x: f64, y: f64, z: f64| Point::new(origin.x + x, origin.y + y, origin.z + z);

    let p0 = p(0.0, 0.0, 0.0);
    let p1 = p(dx, 0.0, 0.0);
    let p2 = p(dx, dy, 0.0);
    let p3 = p(0.0, dy, 0.0);
    let p4 = p(0.0, 0.0, dz);
    let p5 = p(dx, 0.0, dz);
    let p6 = p(dx, dy, dz);
    let p7 = p(0.0, dy, dz);

    let faces = [
        ("floor", vec![p0, p3, p2, p1]),
        ("wall_0", vec![p0, p1, p5, p4]),
        ("wall_1", vec![p1, p2, p6, p5]),
        ("wall_2", vec![p3, p7, p6, p2]),
        ("wall_3", vec![p0, p4, p7, p3]),
        ("roof", vec![p4, p5, p6, p7]),
    ];

    faces
        .into_iter()
        .map(|(face, pts)| Polygon::new(&format!("{name}/{face}"), pts, None))
        .collect()
}

/// Creates an upward-facing horizontal rectangle at height `z`.
pub fn ground_rectangle(name: &str, xmin: f64, ymin: f64, xmax: f64, ymax: f64, z: f64) -> Result<Polygon> {
    ensure!(
        xmax > xmin && ymax > ymin,
        "Ground '{name}' has an empty extent"
    );
    let pts = vec![
        Point::new(xmin, ymin, z),
        Point::new(xmax, ymin, z),
        Point::new(xmax, ymax, z),
        Point::new(xmin, ymax, z),
    ];
    Polygon::new(name, pts, None)
}
