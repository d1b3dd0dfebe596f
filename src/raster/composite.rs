//! Per-polygon coverage: union of positive regions minus negative regions.

use super::mask::PixelMask;
use super::scanline::fill_ring;
use super::transform::CoordinateTransformer;
use crate::model::{Polygon, Ring, RingDefect};

/// Which region list a ring came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionKind {
    Positive,
    Negative,
}

/// A ring that was left out of a polygon's coverage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SkippedRing {
    pub kind: RegionKind,
    pub index: usize,
    pub defect: RingDefect,
}

/// The pixels one polygon writes on its slice.
#[derive(Clone, Debug)]
pub struct SliceCoverage {
    /// Pixels that receive the polygon's segment id.
    pub labeled: PixelMask,
    /// Pixels of the polygon's own positive coverage punched out by a
    /// negative region. These are written as unlabeled.
    pub cleared: PixelMask,
    /// Rings that could not be rasterized.
    pub skipped: Vec<SkippedRing>,
}

/// Rasterizes polygons onto `width x height` slices of a task's volume.
#[derive(Clone, Copy, Debug)]
pub struct PolygonCompositor {
    transformer: CoordinateTransformer,
    width: usize,
    height: usize,
}

impl PolygonCompositor {
    pub fn new(transformer: CoordinateTransformer, width: usize, height: usize) -> Self {
        Self {
            transformer,
            width,
            height,
        }
    }

    /// Computes the polygon's coverage on its slice.
    ///
    /// All positive regions are filled first and unioned; every negative
    /// region is then removed from that union. Negative regions never reach
    /// outside the polygon's own positive coverage.
    pub fn composite(&self, polygon: &Polygon) -> SliceCoverage {
        let mut skipped = Vec::new();

        let mut labeled = PixelMask::new(self.width, self.height);
        for (index, ring) in polygon.positive_regions.iter().enumerate() {
            if let Err(defect) = self.fill(ring, &mut labeled) {
                skipped.push(SkippedRing {
                    kind: RegionKind::Positive,
                    index,
                    defect,
                });
            }
        }

        let mut holes = PixelMask::new(self.width, self.height);
        for (index, ring) in polygon.negative_regions.iter().enumerate() {
            if let Err(defect) = self.fill(ring, &mut holes) {
                skipped.push(SkippedRing {
                    kind: RegionKind::Negative,
                    index,
                    defect,
                });
            }
        }

        let cleared = labeled.intersection(&holes);
        labeled.subtract(&holes);

        SliceCoverage {
            labeled,
            cleared,
            skipped,
        }
    }

    fn fill(&self, ring: &Ring, mask: &mut PixelMask) -> Result<(), RingDefect> {
        let points = ring.points()?;
        fill_ring(&self.transformer.ring_to_volume(&points), mask);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn compositor() -> PolygonCompositor {
        PolygonCompositor::new(CoordinateTransformer::new(0, 0, 0), 32, 32)
    }

    #[test]
    fn test_hole_is_subtracted() {
        let polygon = crate::model::Polygon::new(1u64, 0, square(0.0, 0.0, 10.0, 10.0))
            .with_hole(square(3.0, 3.0, 7.0, 7.0));
        let cov = compositor().composite(&polygon);
        assert_eq!(cov.labeled.count(), 100 - 16);
        assert_eq!(cov.cleared.count(), 16);
        assert!(!cov.labeled.contains(4, 4));
        assert!(cov.skipped.is_empty());
    }

    #[test]
    fn test_positive_regions_union() {
        let polygon = crate::model::Polygon::new(1u64, 0, square(0.0, 0.0, 4.0, 4.0))
            .with_region(square(2.0, 2.0, 6.0, 6.0));
        let cov = compositor().composite(&polygon);
        assert_eq!(cov.labeled.count(), 16 + 16 - 4);
    }

    #[test]
    fn test_hole_outside_coverage_clears_nothing() {
        let polygon = crate::model::Polygon::new(1u64, 0, square(0.0, 0.0, 4.0, 4.0))
            .with_hole(square(10.0, 10.0, 12.0, 12.0));
        let cov = compositor().composite(&polygon);
        assert_eq!(cov.labeled.count(), 16);
        assert!(cov.cleared.is_empty());
    }

    #[test]
    fn test_defective_ring_is_skipped_and_reported() {
        let polygon = crate::model::Polygon::new(1u64, 0, Ring::new([(0.0, 0.0), (4.0, 4.0)]))
            .with_region(square(0.0, 0.0, 2.0, 2.0));
        let cov = compositor().composite(&polygon);
        assert_eq!(cov.labeled.count(), 4);
        assert_eq!(
            cov.skipped,
            vec![SkippedRing {
                kind: RegionKind::Positive,
                index: 0,
                defect: RingDefect::TooFewVertices(2),
            }]
        );
    }
}
