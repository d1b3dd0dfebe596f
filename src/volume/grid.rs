//! Dense voxel label grids.

use std::collections::BTreeMap;

use crate::model::SegmentId;

/// A materialized label volume.
///
/// Indexed `[x, y, z]` for a label grid, or `[x, y, z, channel]` in channel
/// mode, where channel `c` belongs to `channel_labels()[c]` and holds either
/// 0 or that label. Storage is row-major with the last index varying fastest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    dims: [usize; 3],
    channels: Option<Vec<SegmentId>>,
    data: Vec<u64>,
}

impl Grid {
    /// Allocates a zeroed `[x, y, z]` label grid.
    pub fn labels(dims: (usize, usize, usize)) -> Self {
        let (x, y, z) = dims;
        Self {
            dims: [x, y, z],
            channels: None,
            data: vec![0; x * y * z],
        }
    }

    /// Allocates a zeroed `[x, y, z, channel]` grid, one channel per label.
    ///
    /// `labels` must be sorted ascending and free of duplicates.
    pub fn channels(dims: (usize, usize, usize), labels: Vec<SegmentId>) -> Self {
        debug_assert!(labels.windows(2).all(|w| w[0] < w[1]));
        let (x, y, z) = dims;
        Self {
            dims: [x, y, z],
            data: vec![0; x * y * z * labels.len()],
            channels: Some(labels),
        }
    }

    /// Spatial dimensions `(x, y, z)`.
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.dims[0], self.dims[1], self.dims[2])
    }

    /// The full array shape: three axes, or four in channel mode.
    pub fn shape(&self) -> Vec<usize> {
        let mut shape = self.dims.to_vec();
        if let Some(labels) = &self.channels {
            shape.push(labels.len());
        }
        shape
    }

    pub fn is_channels(&self) -> bool {
        self.channels.is_some()
    }

    /// Labels owning each channel, in channel order. `None` for label grids.
    pub fn channel_labels(&self) -> Option<&[SegmentId]> {
        self.channels.as_deref()
    }

    /// Channel index for a label in channel mode.
    pub fn channel_of(&self, label: SegmentId) -> Option<usize> {
        self.channels.as_ref()?.binary_search(&label).ok()
    }

    fn stride(&self) -> usize {
        self.channels.as_ref().map_or(1, Vec::len)
    }

    #[inline]
    fn offset(&self, x: usize, y: usize, z: usize, c: usize) -> usize {
        let [_, ny, nz] = self.dims;
        ((x * ny + y) * nz + z) * self.stride() + c
    }

    /// Value at `[x, y, z]` of a label grid, or of channel 0.
    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> u64 {
        self.data[self.offset(x, y, z, 0)]
    }

    /// Value at `[x, y, z, channel]`.
    #[inline]
    pub fn get_channel(&self, x: usize, y: usize, z: usize, channel: usize) -> u64 {
        self.data[self.offset(x, y, z, channel)]
    }

    #[inline]
    pub(crate) fn set(&mut self, x: usize, y: usize, z: usize, channel: usize, value: u64) {
        let i = self.offset(x, y, z, channel);
        self.data[i] = value;
    }

    /// Raw storage in row-major `[x, y, z(, c)]` order.
    pub fn as_slice(&self) -> &[u64] {
        &self.data
    }

    /// Returns true if every voxel on slice `z` (all channels) is zero.
    pub fn slice_is_empty(&self, z: usize) -> bool {
        let (nx, ny, _) = self.dims();
        let stride = self.stride();
        (0..nx).all(|x| {
            (0..ny).all(|y| (0..stride).all(|c| self.get_channel(x, y, z, c) == 0))
        })
    }

    /// Extracts one channel as a standalone `[x, y, z]` label grid.
    ///
    /// For a label grid, `channel` must be 0 and the grid is cloned.
    pub fn channel_volume(&self, channel: usize) -> Grid {
        let (nx, ny, nz) = self.dims();
        let mut out = Grid::labels((nx, ny, nz));
        for x in 0..nx {
            for y in 0..ny {
                for z in 0..nz {
                    out.set(x, y, z, 0, self.get_channel(x, y, z, channel));
                }
            }
        }
        out
    }

    /// Counts voxels per nonzero value across the whole grid.
    pub fn voxel_counts(&self) -> BTreeMap<u64, usize> {
        let mut counts = BTreeMap::new();
        for &v in self.data.iter().filter(|&&v| v != 0) {
            *counts.entry(v).or_insert(0) += 1;
        }
        counts
    }
}
