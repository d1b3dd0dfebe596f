use std::path::PathBuf;
use thiserror::Error;

use crate::model::TaskId;

/// The main error type for voxpaint operations.
#[derive(Debug, Error)]
pub enum VoxpaintError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Degenerate task bounds on {axis} axis: min {min} must be below max {max}")]
    DegenerateBounds { axis: char, min: i64, max: i64 },

    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    #[error("Task {0} has no complete destination collection/experiment/channel")]
    MissingDestination(TaskId),

    #[error("Label {label} on slice z={z} does not fit a {bits}-bit image")]
    LabelOutOfRange { label: u64, z: i64, bits: u32 },

    #[error("Failed to write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Region {region} expects {expected} voxels, got {actual}")]
    RegionShape {
        region: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
