//! Scan conversion of polygon annotations onto volume slices.
//!
//! - [`transform`]: annotation-space to volume-space mapping
//! - [`scanline`]: even-odd fill of one ring
//! - [`composite`]: positive/negative region composition for one polygon

mod composite;
mod mask;
pub mod scanline;
pub mod transform;

pub use composite::{PolygonCompositor, RegionKind, SkippedRing, SliceCoverage};
pub use mask::PixelMask;
pub use transform::CoordinateTransformer;
