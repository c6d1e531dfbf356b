//! File I/O for spatial fields.
//!
//! Fields are exchanged as delimited text with one `x, y, z, value` row per
//! sample, the layout produced by common CFD and surface-energy tools.

pub mod xyzv;

pub use xyzv::{parse_field, read_field, write_field};
