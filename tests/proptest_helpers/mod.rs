#![allow(dead_code)]

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use voxpaint::model::{Checkpoint, Polygon, Ring, Task};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Tasks with small, non-degenerate bounds at resolution 0..=2.
pub fn arb_task() -> BoxedStrategy<Task> {
    (
        0u32..=2,
        -20i64..20,
        1i64..24,
        -20i64..20,
        1i64..24,
        0i64..50,
        1i64..5,
    )
        .prop_map(|(res, x0, w, y0, h, z0, d)| {
            Task::new("c", "e", "ch", res, (x0, x0 + w), (y0, y0 + h), (z0, z0 + d))
        })
        .boxed()
}

/// Rings of 0..8 vertices spread over an annotation window, sometimes
/// spilling past it.
pub fn arb_ring() -> BoxedStrategy<Ring> {
    prop::collection::vec((-120.0f64..120.0, -120.0f64..120.0), 0..8)
        .prop_map(|points| Ring::new(points))
        .boxed()
}

pub fn arb_polygon(z_range: std::ops::Range<i64>) -> BoxedStrategy<Polygon> {
    (
        0u64..6,
        z_range,
        prop::collection::vec(arb_ring(), 1..3),
        prop::collection::vec(arb_ring(), 0..2),
    )
        .prop_map(|(segment, z, positives, negatives)| {
            let mut rings = positives.into_iter();
            let first = rings.next().unwrap_or_default();
            let mut polygon = Polygon::new(segment, z, first);
            for ring in rings {
                polygon = polygon.with_region(ring);
            }
            for hole in negatives {
                polygon = polygon.with_hole(hole);
            }
            polygon
        })
        .boxed()
}

/// A task and checkpoints whose polygons mostly land inside its z range.
pub fn arb_task_with_checkpoints() -> BoxedStrategy<(Task, Vec<Checkpoint>)> {
    arb_task()
        .prop_flat_map(|task| {
            let z_range = (task.z_min - 1)..(task.z_max + 1);
            let checkpoints = prop::collection::vec(
                prop::collection::vec(arb_polygon(z_range), 0..5)
                    .prop_map(|polygons| Checkpoint::new("prop", polygons)),
                0..3,
            );
            (Just(task), checkpoints)
        })
        .boxed()
}
