pub mod geom;
pub mod io;
pub mod sim;
pub mod vecutils;

// Prelude
pub use geom::point::Point;
pub use geom::polygon::Polygon;
pub use geom::vector::Vector;
pub use sim::engine::{FlatScene, Intersect};
pub use sim::field::{ScalarOrField, SpatialField};
