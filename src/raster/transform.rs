//! Annotation-space to volume-space mapping.

use crate::model::{Annotation, Coord, Task, Volume};

/// Returns `2^resolution`, the number of full-resolution pixels per voxel edge.
#[inline]
pub fn scale_factor(resolution: u32) -> f64 {
    // powi takes i32; levels beyond that are meaningless anyway
    2f64.powi(resolution.min(i32::MAX as u32) as i32)
}

/// Maps full-resolution annotation points into a task's volume-local frame.
///
/// `x' = x / 2^r - x_min` and `y' = y / 2^r - y_min`, computed in floating
/// point. Truncation to pixel indices is left to the rasterizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateTransformer {
    scale: f64,
    x_min: f64,
    y_min: f64,
}

impl CoordinateTransformer {
    /// Creates a transformer for a resolution level and volume origin.
    pub fn new(resolution: u32, x_min: i64, y_min: i64) -> Self {
        Self {
            scale: scale_factor(resolution),
            x_min: x_min as f64,
            y_min: y_min as f64,
        }
    }

    /// Creates the transformer for a task's resolution and bounds.
    pub fn for_task(task: &Task) -> Self {
        Self::new(task.resolution, task.x_min, task.y_min)
    }

    /// Maps one point.
    #[inline]
    pub fn to_volume(&self, point: Coord<Annotation>) -> Coord<Volume> {
        Coord::new(point.x / self.scale - self.x_min, point.y / self.scale - self.y_min)
    }

    /// Maps every vertex of a ring into a new vector.
    pub fn ring_to_volume(&self, points: &[Coord<Annotation>]) -> Vec<Coord<Volume>> {
        points.iter().map(|&p| self.to_volume(p)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_resolution_is_offset_only() {
        let t = CoordinateTransformer::new(0, 10, 20);
        let p = t.to_volume(Coord::new(15.5, 20.0));
        assert_eq!((p.x, p.y), (5.5, 0.0));
    }

    #[test]
    fn test_resolution_one_halves_then_offsets() {
        let t = CoordinateTransformer::new(1, 50, 50);
        let p = t.to_volume(Coord::new(200.0, 200.0));
        assert_eq!((p.x, p.y), (50.0, 50.0));
    }

    #[test]
    fn test_division_is_real_valued() {
        let t = CoordinateTransformer::new(2, 0, 0);
        let p = t.to_volume(Coord::new(5.0, 3.0));
        assert_eq!((p.x, p.y), (1.25, 0.75));
    }

    #[test]
    fn test_ring_input_untouched() {
        let ring = vec![Coord::new(4.0, 4.0), Coord::new(8.0, 4.0), Coord::new(8.0, 8.0)];
        let t = CoordinateTransformer::new(1, 1, 1);
        let out = t.ring_to_volume(&ring);
        assert_eq!(ring[0].x, 4.0);
        assert_eq!(out[0].x, 1.0);
        assert_eq!(out[2].y, 3.0);
    }
}
