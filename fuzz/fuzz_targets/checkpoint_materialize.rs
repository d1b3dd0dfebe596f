//! Fuzz target for materializing parsed checkpoints.
//!
//! Any checkpoint that parses must materialize without panicking, whatever
//! its rings look like.
//!
//! Run with:
//!   cargo +nightly fuzz run checkpoint_materialize

#![no_main]

use libfuzzer_sys::fuzz_target;
use voxpaint::model::io_json::checkpoint_from_json_slice;
use voxpaint::model::Task;
use voxpaint::volume::materialize;

fuzz_target!(|data: &[u8]| {
    if data.len() > 64 * 1024 {
        return;
    }

    let Ok(checkpoint) = checkpoint_from_json_slice(data) else {
        return;
    };
    // Clamped rows are still walked one by one; keep rings near the slice.
    let bounded = checkpoint
        .polygons
        .iter()
        .flat_map(|p| p.positive_regions.iter().chain(&p.negative_regions))
        .filter_map(|ring| ring.points().ok())
        .flatten()
        .all(|p| p.x.abs() < 1e4 && p.y.abs() < 1e4);
    if !bounded {
        return;
    }

    let task = Task::new("c", "e", "ch", 1, (-32, 32), (-32, 32), (0, 8));
    let checkpoints = [checkpoint];
    let labels = materialize(&task, &checkpoints, false).expect("valid task bounds");
    let channels = materialize(&task, &checkpoints, true).expect("valid task bounds");
    assert_eq!(labels.dims(), channels.dims());
});
