//! Volume materialization: checkpoints in, dense label grid out.
//!
//! [`materialize`] is the single entry point. It is a pure function of the
//! task and the ordered checkpoint list: no I/O, no shared state, and the
//! same input always yields a bit-identical grid.
//!
//! Polygons are applied checkpoint by checkpoint, in the order supplied, with
//! last-writer-wins semantics. Which checkpoints to pass in (only the latest,
//! or the whole history) is the caller's decision.

mod accumulate;
mod grid;
mod report;

pub use accumulate::VolumeAccumulator;
pub use grid::Grid;
pub use report::{IssueCode, IssueContext, RenderIssue, RenderReport};

use std::collections::BTreeSet;

use crate::error::VoxpaintError;
use crate::model::{Checkpoint, RingDefect, SegmentId, Task};
use crate::raster::{CoordinateTransformer, PolygonCompositor, RegionKind};

/// Materializes a task's checkpoints into a grid.
///
/// With `as_channels` the grid gets one channel per distinct segment id found
/// in any polygon of any checkpoint, sorted ascending.
///
/// # Errors
/// Only a task box that cannot be indexed is fatal. Malformed rings and polygons outside the task's z range are
/// skipped and logged.
pub fn materialize(
    task: &Task,
    checkpoints: &[Checkpoint],
    as_channels: bool,
) -> Result<Grid, VoxpaintError> {
    materialize_with_report(task, checkpoints, as_channels).map(|(grid, _)| grid)
}

/// Like [`materialize`], also returning what was skipped.
pub fn materialize_with_report(
    task: &Task,
    checkpoints: &[Checkpoint],
    as_channels: bool,
) -> Result<(Grid, RenderReport), VoxpaintError> {
    let dims = task.dims()?;
    let (x_size, y_size, z_size) = dims;

    let mut accumulator = if as_channels {
        let labels = distinct_labels(checkpoints);
        log::debug!("materializing {} channel(s) over {:?}", labels.len(), dims);
        VolumeAccumulator::channels(dims, labels)
    } else {
        log::debug!("materializing label grid over {:?}", dims);
        VolumeAccumulator::labels(dims)
    };

    let compositor =
        PolygonCompositor::new(CoordinateTransformer::for_task(task), x_size, y_size);
    let mut report = RenderReport::new();

    for (ci, checkpoint) in checkpoints.iter().enumerate() {
        for (pi, polygon) in checkpoint.polygons.iter().enumerate() {
            let context = IssueContext::Polygon {
                checkpoint: ci,
                polygon: pi,
                segment: polygon.segment_id.as_u64(),
            };

            if polygon.segment_id.is_unlabeled() {
                skip(&mut report, IssueCode::UnlabeledSegment, "segment id 0 is reserved", context);
                continue;
            }

            let z_local = polygon
                .z
                .checked_sub(task.z_min)
                .and_then(|z| usize::try_from(z).ok())
                .filter(|&z| z < z_size);
            let Some(z_local) = z_local else {
                let message = format!(
                    "slice {} outside task range [{}, {})",
                    polygon.z, task.z_min, task.z_max
                );
                skip(&mut report, IssueCode::SliceOutOfBounds, message, context);
                continue;
            };

            let coverage = compositor.composite(polygon);
            for skipped in &coverage.skipped {
                let issue = RenderIssue::new(
                    defect_code(&skipped.defect),
                    skipped.defect.to_string(),
                    IssueContext::Ring {
                        checkpoint: ci,
                        polygon: pi,
                        negative: skipped.kind == RegionKind::Negative,
                        ring: skipped.index,
                    },
                );
                log::warn!("skipping ring: {}", issue);
                report.add(issue);
            }

            accumulator.apply(polygon.segment_id, z_local, &coverage);
            report.polygons_applied += 1;
        }
    }

    if !report.is_clean() {
        log::info!(
            "materialized with {} skipped item(s) across {} checkpoint(s)",
            report.issues.len(),
            checkpoints.len()
        );
    }

    Ok((accumulator.finish(), report))
}

/// Distinct nonzero segment ids across all checkpoints, ascending.
pub fn distinct_labels(checkpoints: &[Checkpoint]) -> Vec<SegmentId> {
    checkpoints
        .iter()
        .flat_map(|c| c.polygons.iter())
        .map(|p| p.segment_id)
        .filter(|s| !s.is_unlabeled())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn skip(
    report: &mut RenderReport,
    code: IssueCode,
    message: impl Into<String>,
    context: IssueContext,
) {
    let issue = RenderIssue::new(code, message, context);
    log::warn!("skipping polygon: {}", issue);
    report.add(issue);
    report.polygons_skipped += 1;
}

fn defect_code(defect: &RingDefect) -> IssueCode {
    match defect {
        RingDefect::TooFewVertices(_) => IssueCode::RingTooFewVertices,
        RingDefect::NotTwoDimensional { .. } => IssueCode::RingNotTwoDimensional,
        RingDefect::NonFinite { .. } => IssueCode::RingNotFinite,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Polygon, Ring};

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::new([(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn task() -> Task {
        Task::new("c", "e", "ch", 0, (0, 16), (0, 16), (10, 14))
    }

    #[test]
    fn test_shape_matches_bounds() {
        let grid = materialize(&task(), &[], false).unwrap();
        assert_eq!(grid.shape(), vec![16, 16, 4]);
        assert!(grid.voxel_counts().is_empty());
    }

    #[test]
    fn test_degenerate_task_is_the_only_error() {
        let mut t = task();
        t.z_max = t.z_min;
        assert!(matches!(
            materialize(&t, &[], false),
            Err(VoxpaintError::DegenerateBounds { axis: 'z', .. })
        ));
    }

    #[test]
    fn test_out_of_range_slice_is_skipped() {
        let cp = Checkpoint::new(
            "t",
            vec![
                Polygon::new(1u64, 9, square(0.0, 0.0, 4.0, 4.0)),
                Polygon::new(2u64, 14, square(0.0, 0.0, 4.0, 4.0)),
                Polygon::new(3u64, 13, square(0.0, 0.0, 4.0, 4.0)),
            ],
        );
        let (grid, report) = materialize_with_report(&task(), &[cp], false).unwrap();
        assert_eq!(report.count(IssueCode::SliceOutOfBounds), 2);
        assert_eq!(report.polygons_applied, 1);
        assert_eq!(report.polygons_skipped, 2);
        assert_eq!(grid.voxel_counts().get(&3), Some(&16));
        assert_eq!(grid.get(0, 0, 3), 3);
    }

    #[test]
    fn test_extreme_slice_index_is_skipped() {
        let triangle = Ring::new([(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)]);
        let cp = Checkpoint::new(
            "t",
            vec![
                Polygon::new(1u64, i64::MIN, triangle.clone()),
                Polygon::new(2u64, i64::MAX, triangle),
            ],
        );
        // A positive and a negative origin overflow on opposite extremes.
        for z_min in [10, -5] {
            let mut t = task();
            t.z_min = z_min;
            let (grid, report) = materialize_with_report(&t, &[cp.clone()], false).unwrap();
            assert_eq!(report.polygons_skipped, 2);
            assert_eq!(report.count(IssueCode::SliceOutOfBounds), 2);
            assert!(grid.voxel_counts().is_empty());
        }
    }

    #[test]
    fn test_zero_segment_is_skipped() {
        let cp = Checkpoint::new("t", vec![Polygon::new(0u64, 10, square(0.0, 0.0, 4.0, 4.0))]);
        let (grid, report) = materialize_with_report(&task(), &[cp.clone()], true).unwrap();
        assert_eq!(report.count(IssueCode::UnlabeledSegment), 1);
        assert_eq!(grid.shape(), vec![16, 16, 4, 0]);
        assert!(distinct_labels(&[cp]).is_empty());
    }

    #[test]
    fn test_distinct_labels_sorted_across_checkpoints() {
        let a = Checkpoint::new("t", vec![Polygon::new(9u64, 10, square(0.0, 0.0, 1.0, 1.0))]);
        let b = Checkpoint::new(
            "t",
            vec![
                Polygon::new(5u64, 99, square(0.0, 0.0, 1.0, 1.0)),
                Polygon::new(9u64, 11, square(0.0, 0.0, 1.0, 1.0)),
            ],
        );
        assert_eq!(distinct_labels(&[a, b]), vec![SegmentId(5), SegmentId(9)]);
    }

    #[test]
    fn test_malformed_ring_reported_with_region_context() {
        let polygon = Polygon::new(4u64, 10, square(0.0, 0.0, 2.0, 2.0))
            .with_hole(Ring::from_raw(vec![vec![0.0], vec![1.0, 1.0], vec![2.0, 2.0]]));
        let cp = Checkpoint::new("t", vec![polygon]);
        let (grid, report) = materialize_with_report(&task(), &[cp], false).unwrap();
        assert_eq!(report.count(IssueCode::RingNotTwoDimensional), 1);
        assert!(matches!(
            report.issues[0].context,
            IssueContext::Ring { negative: true, ring: 0, .. }
        ));
        assert_eq!(grid.voxel_counts().get(&4), Some(&4));
    }
}
