//! Polygon annotations and the checkpoints that group them.

use serde::{Deserialize, Serialize};

use super::ids::{SegmentId, TaskId};
use super::ring::Ring;

/// One painted shape on one slice.
///
/// The final coverage is the union of `positive_regions` minus the union of
/// `negative_regions`. Older clients send a single `points` ring plus
/// `holes`; those are folded into the region lists when the polygon is
/// deserialized, so only the region form exists past the JSON boundary.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "PolygonWire")]
pub struct Polygon {
    /// The label written into covered voxels.
    #[serde(rename = "segmentID")]
    pub segment_id: SegmentId,

    /// Absolute slice index in annotation space.
    pub z: i64,

    /// Rings whose interiors contribute coverage.
    #[serde(rename = "positiveRegions")]
    pub positive_regions: Vec<Ring>,

    /// Rings whose interiors are removed from this polygon's coverage.
    #[serde(rename = "negativeRegions")]
    pub negative_regions: Vec<Ring>,

    /// Whether the UI had the shape open for editing at save time.
    #[serde(default)]
    pub editing: bool,

    /// Display color chosen in the UI, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Vec<u8>>,
}

impl Polygon {
    /// Creates a polygon with a single positive region and no holes.
    pub fn new(segment_id: impl Into<SegmentId>, z: i64, outline: Ring) -> Self {
        Self {
            segment_id: segment_id.into(),
            z,
            positive_regions: vec![outline],
            negative_regions: Vec::new(),
            editing: false,
            color: None,
        }
    }

    /// Adds another positive region.
    pub fn with_region(mut self, region: Ring) -> Self {
        self.positive_regions.push(region);
        self
    }

    /// Adds a negative region (hole).
    pub fn with_hole(mut self, hole: Ring) -> Self {
        self.negative_regions.push(hole);
        self
    }
}

/// Accepts both the region schema and the legacy `points`/`holes` schema.
#[derive(Deserialize)]
struct PolygonWire {
    #[serde(rename = "segmentID")]
    segment_id: SegmentId,
    z: i64,
    #[serde(default)]
    points: Ring,
    #[serde(default)]
    holes: Vec<Ring>,
    #[serde(default, rename = "positiveRegions")]
    positive_regions: Vec<Ring>,
    #[serde(default, rename = "negativeRegions")]
    negative_regions: Vec<Ring>,
    #[serde(default)]
    editing: bool,
    #[serde(default)]
    color: Option<Vec<u8>>,
}

impl From<PolygonWire> for Polygon {
    fn from(wire: PolygonWire) -> Self {
        let mut positive_regions = wire.positive_regions;
        if positive_regions.is_empty() && !wire.points.is_empty() {
            positive_regions.push(wire.points);
        }

        let mut negative_regions = wire.negative_regions;
        if negative_regions.is_empty() {
            negative_regions = wire.holes;
        }

        Polygon {
            segment_id: wire.segment_id,
            z: wire.z,
            positive_regions,
            negative_regions,
            editing: wire.editing,
            color: wire.color,
        }
    }
}

/// A snapshot of every polygon of a task at save time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Polygons in the order they are applied.
    pub polygons: Vec<Polygon>,

    /// The task this checkpoint belongs to.
    #[serde(rename = "taskID")]
    pub task_id: TaskId,
}

impl Checkpoint {
    /// Creates a checkpoint for a task.
    pub fn new(task_id: impl Into<TaskId>, polygons: Vec<Polygon>) -> Self {
        Self {
            polygons,
            task_id: task_id.into(),
        }
    }
}
