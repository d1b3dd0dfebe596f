//! Last-writer-wins application of polygon coverage to a grid.

use super::grid::Grid;
use crate::model::SegmentId;
use crate::raster::SliceCoverage;

/// Owns the grid while polygons are written into it.
///
/// Every write is unconditional: a later polygon replaces whatever an earlier
/// one left at the same voxel (and channel), including clearing it to zero
/// through a hole in its own coverage.
#[derive(Debug)]
pub struct VolumeAccumulator {
    grid: Grid,
}

impl VolumeAccumulator {
    /// Starts from a zeroed `[x, y, z]` label grid.
    pub fn labels(dims: (usize, usize, usize)) -> Self {
        Self {
            grid: Grid::labels(dims),
        }
    }

    /// Starts from a zeroed channel grid with one channel per label.
    pub fn channels(dims: (usize, usize, usize), labels: Vec<SegmentId>) -> Self {
        Self {
            grid: Grid::channels(dims, labels),
        }
    }

    /// Writes one polygon's coverage on slice `z`.
    ///
    /// Returns false without touching the grid when the label has no channel.
    pub fn apply(&mut self, segment: SegmentId, z: usize, coverage: &SliceCoverage) -> bool {
        let channel = if self.grid.is_channels() {
            match self.grid.channel_of(segment) {
                Some(c) => c,
                None => return false,
            }
        } else {
            0
        };

        // mask rows are y, columns are x
        for (y, x) in coverage.labeled.iter() {
            self.grid.set(x, y, z, channel, segment.as_u64());
        }
        for (y, x) in coverage.cleared.iter() {
            self.grid.set(x, y, z, channel, 0);
        }
        true
    }

    /// Hands the finished grid to the caller.
    pub fn finish(self) -> Grid {
        self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::PixelMask;

    fn coverage(labeled: &[(usize, usize)], cleared: &[(usize, usize)]) -> SliceCoverage {
        let mut l = PixelMask::new(4, 4);
        for &(r, c) in labeled {
            l.insert(r, c);
        }
        let mut h = PixelMask::new(4, 4);
        for &(r, c) in cleared {
            h.insert(r, c);
        }
        SliceCoverage {
            labeled: l,
            cleared: h,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_later_write_wins() {
        let mut acc = VolumeAccumulator::labels((4, 4, 2));
        acc.apply(SegmentId(3), 1, &coverage(&[(0, 0), (0, 1)], &[]));
        acc.apply(SegmentId(7), 1, &coverage(&[(0, 1), (0, 2)], &[]));
        let grid = acc.finish();
        assert_eq!(grid.get(0, 0, 1), 3);
        assert_eq!(grid.get(1, 0, 1), 7);
        assert_eq!(grid.get(2, 0, 1), 7);
    }

    #[test]
    fn test_hole_clears_earlier_write_under_own_coverage() {
        let mut acc = VolumeAccumulator::labels((4, 4, 1));
        acc.apply(SegmentId(3), 0, &coverage(&[(2, 2), (3, 3)], &[]));
        acc.apply(SegmentId(7), 0, &coverage(&[], &[(2, 2)]));
        let grid = acc.finish();
        assert_eq!(grid.get(2, 2, 0), 0);
        assert_eq!(grid.get(3, 3, 0), 3);
    }

    #[test]
    fn test_row_col_maps_to_y_x() {
        let mut acc = VolumeAccumulator::labels((4, 4, 1));
        acc.apply(SegmentId(1), 0, &coverage(&[(1, 3)], &[]));
        let grid = acc.finish();
        assert_eq!(grid.get(3, 1, 0), 1);
        assert_eq!(grid.get(1, 3, 0), 0);
    }

    #[test]
    fn test_channel_writes_stay_in_own_channel() {
        let mut acc = VolumeAccumulator::channels((4, 4, 1), vec![SegmentId(5), SegmentId(9)]);
        assert!(acc.apply(SegmentId(5), 0, &coverage(&[(0, 0)], &[])));
        assert!(acc.apply(SegmentId(9), 0, &coverage(&[(0, 0)], &[])));
        assert!(!acc.apply(SegmentId(2), 0, &coverage(&[(0, 0)], &[])));
        let grid = acc.finish();
        assert_eq!(grid.get_channel(0, 0, 0, 0), 5);
        assert_eq!(grid.get_channel(0, 0, 0, 1), 9);
    }
}
