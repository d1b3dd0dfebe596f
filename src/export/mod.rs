//! Sinks for materialized grids.
//!
//! - [`image_stack`]: per-slice grayscale images, empty slices skipped
//! - [`remote`]: `(z, y, x)` block writes at the task's voxel offset
//! - [`mesh`]: per-segment OBJ surfaces from channel grids

pub mod image_stack;
pub mod mesh;
pub mod remote;

pub use image_stack::{SliceExporter, SliceFormat};
pub use mesh::{Mesh, Mesher};
pub use remote::{ArrayRegionSink, InMemoryArray, RemoteArrayWriter, VoxelRegion};
