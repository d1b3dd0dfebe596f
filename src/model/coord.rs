//! Planar points tagged with the frame they are measured in.
//!
//! Annotators click in the full-resolution frame of the whole dataset; the
//! rasterizer works in the frame of one task's grid. Keeping the two apart
//! in the type means a point must go through
//! [`CoordinateTransformer`](crate::raster::CoordinateTransformer) before it
//! can be filled.

use std::fmt;
use std::marker::PhantomData;

/// A frame a [`Coord`] can be measured in.
pub trait Frame {
    /// Short name used in debug output.
    const NAME: &'static str;
}

/// Full-resolution dataset pixels, as painted.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Annotation {}

/// Voxel columns and rows of a task grid, `(0, 0)` at the task's corner.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum Volume {}

impl Frame for Annotation {
    const NAME: &'static str = "annotation";
}

impl Frame for Volume {
    const NAME: &'static str = "volume";
}

/// An `(x, y)` point on one slice.
#[derive(Clone, Copy, PartialEq)]
pub struct Coord<F> {
    pub x: f64,
    pub y: f64,
    frame: PhantomData<F>,
}

impl<F> Coord<F> {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            frame: PhantomData,
        }
    }

    /// Both components are neither NaN nor infinite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl<F: Frame> fmt::Debug for Coord<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", F::NAME, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_names_the_frame() {
        let painted: Coord<Annotation> = Coord::new(200.0, 150.5);
        let local: Coord<Volume> = Coord::new(50.0, 25.25);
        assert_eq!(format!("{:?}", painted), "annotation(200, 150.5)");
        assert_eq!(format!("{:?}", local), "volume(50, 25.25)");
    }

    #[test]
    fn test_non_finite_components() {
        assert!(Coord::<Annotation>::new(3.0, -7.0).is_finite());
        assert!(!Coord::<Annotation>::new(f64::NAN, 0.0).is_finite());
        assert!(!Coord::<Volume>::new(0.0, f64::NEG_INFINITY).is_finite());
    }
}
