//! Writing a finished grid into a remote volumetric array.
//!
//! The network client lives outside this crate. It plugs in through
//! [`ArrayRegionSink`], a single "write this `(z, y, x)` block at this
//! offset" capability. [`InMemoryArray`] implements the same capability
//! locally for dry runs and tests.

use std::fmt;
use std::ops::Range;

use crate::error::VoxpaintError;
use crate::model::{Task, TaskId};
use crate::volume::Grid;

/// A half-open block of absolute voxel coordinates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoxelRegion {
    pub z: Range<i64>,
    pub y: Range<i64>,
    pub x: Range<i64>,
}

impl VoxelRegion {
    /// The block covered by a task's bounds.
    pub fn for_task(task: &Task) -> Self {
        Self {
            z: task.z_min..task.z_max,
            y: task.y_min..task.y_max,
            x: task.x_min..task.x_max,
        }
    }

    /// Extent `(z, y, x)`; empty or inverted ranges count as zero.
    pub fn shape(&self) -> (usize, usize, usize) {
        let len = |r: &Range<i64>| usize::try_from(r.end - r.start).unwrap_or(0);
        (len(&self.z), len(&self.y), len(&self.x))
    }

    pub fn len(&self) -> usize {
        let (z, y, x) = self.shape();
        z * y * x
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `other` lies entirely inside this region.
    pub fn contains(&self, other: &VoxelRegion) -> bool {
        let inside = |outer: &Range<i64>, inner: &Range<i64>| {
            outer.start <= inner.start && inner.end <= outer.end
        };
        inside(&self.z, &other.z) && inside(&self.y, &other.y) && inside(&self.x, &other.x)
    }
}

impl fmt::Display for VoxelRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}, {}:{}, {}:{}",
            self.z.start, self.z.end, self.y.start, self.y.end, self.x.start, self.x.end
        )
    }
}

/// Something that accepts `(z, y, x)` ordered voxel blocks.
pub trait ArrayRegionSink {
    /// Writes `data` (row-major `z, y, x`, exactly `region.len()` values)
    /// at `region`.
    fn write_region(&mut self, region: &VoxelRegion, data: &[u64]) -> Result<(), VoxpaintError>;
}

impl<S: ArrayRegionSink + ?Sized> ArrayRegionSink for &mut S {
    fn write_region(&mut self, region: &VoxelRegion, data: &[u64]) -> Result<(), VoxpaintError> {
        (**self).write_region(region, data)
    }
}

/// The `bossdb://collection/experiment/channel` address of a task's destination.
pub fn destination_uri(task: &Task) -> Option<String> {
    task.destination()
        .map(|(c, e, ch)| format!("bossdb://{}/{}/{}", c, e, ch))
}

/// Reorders an `[x, y, z]` label grid into row-major `(z, y, x)`.
pub fn transpose_zyx(grid: &Grid) -> Vec<u64> {
    let (nx, ny, nz) = grid.dims();
    let mut out = Vec::with_capacity(nx * ny * nz);
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                out.push(grid.get(x, y, z));
            }
        }
    }
    out
}

/// Writes task grids into a sink at the task's absolute voxel offset.
#[derive(Debug)]
pub struct RemoteArrayWriter<S> {
    sink: S,
}

impl<S: ArrayRegionSink> RemoteArrayWriter<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Writes a label grid for `task`.
    ///
    /// # Errors
    /// Fails if the task has no destination, if the grid is in channel mode
    /// or does not match the task bounds, or if the sink rejects the write.
    pub fn write(
        &mut self,
        task_id: &TaskId,
        task: &Task,
        grid: &Grid,
    ) -> Result<VoxelRegion, VoxpaintError> {
        let uri = destination_uri(task)
            .ok_or_else(|| VoxpaintError::MissingDestination(task_id.clone()))?;
        if grid.is_channels() {
            return Err(VoxpaintError::InvalidArgument(
                "remote arrays take label grids, not channel grids".to_string(),
            ));
        }

        let region = VoxelRegion::for_task(task);
        let (nz, ny, nx) = region.shape();
        if grid.dims() != (nx, ny, nz) {
            return Err(VoxpaintError::RegionShape {
                region: region.to_string(),
                expected: region.len(),
                actual: grid.as_slice().len(),
            });
        }

        log::info!("writing task {} to {} at [{}]", task_id, uri, region);
        self.sink.write_region(&region, &transpose_zyx(grid))?;
        Ok(region)
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// A dense local `(z, y, x)` array covering a fixed extent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryArray {
    extent: VoxelRegion,
    data: Vec<u64>,
}

impl InMemoryArray {
    /// Allocates a zeroed array over `extent`.
    pub fn new(extent: VoxelRegion) -> Self {
        let len = extent.len();
        Self {
            extent,
            data: vec![0; len],
        }
    }

    pub fn extent(&self) -> &VoxelRegion {
        &self.extent
    }

    /// Value at absolute coordinates, or `None` outside the extent.
    pub fn get(&self, z: i64, y: i64, x: i64) -> Option<u64> {
        let point = VoxelRegion {
            z: z..z + 1,
            y: y..y + 1,
            x: x..x + 1,
        };
        if !self.extent.contains(&point) {
            return None;
        }
        Some(self.data[self.index(z, y, x)])
    }

    fn index(&self, z: i64, y: i64, x: i64) -> usize {
        let (_, ny, nx) = self.extent.shape();
        let dz = (z - self.extent.z.start) as usize;
        let dy = (y - self.extent.y.start) as usize;
        let dx = (x - self.extent.x.start) as usize;
        (dz * ny + dy) * nx + dx
    }
}

impl ArrayRegionSink for InMemoryArray {
    fn write_region(&mut self, region: &VoxelRegion, data: &[u64]) -> Result<(), VoxpaintError> {
        if data.len() != region.len() {
            return Err(VoxpaintError::RegionShape {
                region: region.to_string(),
                expected: region.len(),
                actual: data.len(),
            });
        }
        if !self.extent.contains(region) {
            return Err(VoxpaintError::InvalidArgument(format!(
                "region [{}] lies outside array extent [{}]",
                region, self.extent
            )));
        }

        let (_, _, nx) = region.shape();
        let mut values = data.iter();
        for z in region.z.clone() {
            for y in region.y.clone() {
                let start = self.index(z, y, region.x.start);
                for (slot, &v) in self.data[start..start + nx].iter_mut().zip(values.by_ref()) {
                    *slot = v;
                }
            }
        }
        Ok(())
    }
}
