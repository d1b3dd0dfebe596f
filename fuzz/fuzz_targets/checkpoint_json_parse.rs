//! Fuzz target for checkpoint JSON parsing.
//!
//! Feeds arbitrary bytes to the checkpoint parser, including the legacy
//! `points`/`holes` polygon upgrade path.
//!
//! Run with:
//!   cargo +nightly fuzz run checkpoint_json_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use voxpaint::model::io_json::checkpoint_from_json_slice;

fuzz_target!(|data: &[u8]| {
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let _ = checkpoint_from_json_slice(data);
});
