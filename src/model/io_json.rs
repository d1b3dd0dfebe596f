//! JSON reading and writing for tasks, checkpoints, and polygon lists.
//!
//! The polygon list format is what the painting UI posts when it saves:
//! either a bare JSON array of polygons or an object wrapping that array
//! under a `"checkpoint"` key.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::polygon::{Checkpoint, Polygon};
use super::task::Task;
use crate::error::VoxpaintError;

/// Reads any JSON document from a file.
///
/// # Errors
/// Returns an error if the file cannot be opened or parsed.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, VoxpaintError> {
    let file = File::open(path).map_err(VoxpaintError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| VoxpaintError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes any serializable value as pretty JSON.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), VoxpaintError> {
    let file = File::create(path).map_err(VoxpaintError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(|source| VoxpaintError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a task definition.
pub fn read_task_json(path: &Path) -> Result<Task, VoxpaintError> {
    read_json(path)
}

/// Reads a full checkpoint (polygons plus task id).
pub fn read_checkpoint_json(path: &Path) -> Result<Checkpoint, VoxpaintError> {
    read_json(path)
}

/// Reads a polygon list as posted by the painting UI.
pub fn read_polygons_json(path: &Path) -> Result<Vec<Polygon>, VoxpaintError> {
    let body: PolygonsBody = read_json(path)?;
    Ok(body.into_polygons())
}

/// Parses a polygon list from a JSON string.
///
/// Useful for testing without file I/O.
pub fn polygons_from_json_str(json: &str) -> Result<Vec<Polygon>, serde_json::Error> {
    serde_json::from_str::<PolygonsBody>(json).map(PolygonsBody::into_polygons)
}

/// Parses a checkpoint from raw bytes.
///
/// Useful for fuzzing and for bodies that have not been UTF-8 validated.
pub fn checkpoint_from_json_slice(bytes: &[u8]) -> Result<Checkpoint, serde_json::Error> {
    serde_json::from_slice(bytes)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PolygonsBody {
    Bare(Vec<Polygon>),
    Wrapped { checkpoint: Vec<Polygon> },
}

impl PolygonsBody {
    fn into_polygons(self) -> Vec<Polygon> {
        match self {
            PolygonsBody::Bare(polygons) => polygons,
            PolygonsBody::Wrapped { checkpoint } => checkpoint,
        }
    }
}
