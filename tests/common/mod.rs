#![allow(dead_code)]

use voxpaint::model::{Polygon, Ring, Task};

pub fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
    Ring::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
}

/// A full-resolution task whose volume frame equals annotation space.
pub fn identity_task(x: i64, y: i64, z: i64) -> Task {
    Task::new("col", "exp", "chan", 0, (0, x), (0, y), (0, z))
}

pub fn square_polygon(segment: u64, z: i64, x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::new(segment, z, square(x0, y0, x1, y1))
}

pub fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}
