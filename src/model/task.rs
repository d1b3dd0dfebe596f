//! Annotation tasks: the source volume window an annotator works on.

use serde::{Deserialize, Serialize};

use super::ids::TaskId;
use crate::error::VoxpaintError;

/// A unit of annotation work over one axis-aligned box of a source volume.
///
/// Bounds are half-open and expressed at the task's resolution level, so the
/// materialized grid is `(x_max - x_min, y_max - y_min, z_max - z_min)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub collection: String,
    pub experiment: String,
    pub channel: String,

    /// Resolution level; the annotation-to-volume scale factor is `1 / 2^resolution`.
    pub resolution: u32,

    pub x_min: i64,
    pub x_max: i64,
    pub y_min: i64,
    pub y_max: i64,
    pub z_min: i64,
    pub z_max: i64,

    /// Higher priority tasks are handed out first.
    #[serde(default)]
    pub priority: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_collection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_experiment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination_channel: Option<String>,

    /// The user currently responsible for the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl Task {
    /// Creates a task over the given source channel and bounds.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        collection: impl Into<String>,
        experiment: impl Into<String>,
        channel: impl Into<String>,
        resolution: u32,
        x: (i64, i64),
        y: (i64, i64),
        z: (i64, i64),
    ) -> Self {
        Self {
            collection: collection.into(),
            experiment: experiment.into(),
            channel: channel.into(),
            resolution,
            x_min: x.0,
            x_max: x.1,
            y_min: y.0,
            y_max: y.1,
            z_min: z.0,
            z_max: z.1,
            priority: 0,
            destination_collection: None,
            destination_experiment: None,
            destination_channel: None,
            assigned_to: None,
        }
    }

    /// Sets the destination collection/experiment/channel.
    pub fn with_destination(
        mut self,
        collection: impl Into<String>,
        experiment: impl Into<String>,
        channel: impl Into<String>,
    ) -> Self {
        self.destination_collection = Some(collection.into());
        self.destination_experiment = Some(experiment.into());
        self.destination_channel = Some(channel.into());
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: i64) -> Self {
        self.priority = priority;
        self
    }

    /// Returns the grid dimensions `(x, y, z)`.
    ///
    /// # Errors
    /// Returns [`VoxpaintError::DegenerateBounds`] for the first axis whose
    /// max is not strictly above its min.
    /// Returns [`VoxpaintError::InvalidArgument`] when an axis span or the
    /// voxel count does not fit in memory indices.
    pub fn dims(&self) -> Result<(usize, usize, usize), VoxpaintError> {
        let dims = (
            axis_len('x', self.x_min, self.x_max)?,
            axis_len('y', self.y_min, self.y_max)?,
            axis_len('z', self.z_min, self.z_max)?,
        );
        dims.0
            .checked_mul(dims.1)
            .and_then(|n| n.checked_mul(dims.2))
            .ok_or_else(|| {
                VoxpaintError::InvalidArgument(format!(
                    "task volume {}x{}x{} is too large",
                    dims.0, dims.1, dims.2
                ))
            })?;
        Ok(dims)
    }

    /// Returns the destination triple when all three parts are set.
    pub fn destination(&self) -> Option<(&str, &str, &str)> {
        match (
            self.destination_collection.as_deref(),
            self.destination_experiment.as_deref(),
            self.destination_channel.as_deref(),
        ) {
            (Some(c), Some(e), Some(ch)) if !c.is_empty() && !e.is_empty() && !ch.is_empty() => {
                Some((c, e, ch))
            }
            _ => None,
        }
    }
}

fn axis_len(axis: char, min: i64, max: i64) -> Result<usize, VoxpaintError> {
    if max <= min {
        return Err(VoxpaintError::DegenerateBounds { axis, min, max });
    }
    max.checked_sub(min)
        .and_then(|len| usize::try_from(len).ok())
        .ok_or_else(|| {
            VoxpaintError::InvalidArgument(format!(
                "task {} span {}..{} is too large",
                axis, min, max
            ))
        })
}

/// A task together with the id it is stored under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    #[serde(flatten)]
    pub task: Task,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task::new("col", "exp", "chan", 0, (10, 20), (0, 5), (100, 103))
    }

    #[test]
    fn test_dims() {
        assert_eq!(task().dims().unwrap(), (10, 5, 3));
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut t = task();
        t.y_max = t.y_min;
        match t.dims() {
            Err(VoxpaintError::DegenerateBounds { axis, .. }) => assert_eq!(axis, 'y'),
            other => panic!("expected degenerate bounds, got {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_span_rejected() {
        let mut t = task();
        t.x_min = i64::MIN;
        t.x_max = 1;
        assert!(matches!(t.dims(), Err(VoxpaintError::InvalidArgument(_))));

        let mut t = task();
        (t.x_min, t.x_max) = (0, i64::MAX);
        (t.y_min, t.y_max) = (0, i64::MAX);
        assert!(matches!(t.dims(), Err(VoxpaintError::InvalidArgument(_))));
    }

    #[test]
    fn test_destination_requires_all_parts() {
        let mut t = task();
        assert!(t.destination().is_none());
        t.destination_collection = Some("a".into());
        t.destination_experiment = Some("b".into());
        assert!(t.destination().is_none());
        let t = t.with_destination("a", "b", "c");
        assert_eq!(t.destination(), Some(("a", "b", "c")));
    }

    #[test]
    fn test_record_is_flat_json() {
        let record = TaskRecord {
            id: TaskId::new("abc"),
            task: task(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], "abc");
        assert_eq!(json["x_min"], 10);
        let back: TaskRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }
}
