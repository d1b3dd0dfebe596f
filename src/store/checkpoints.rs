//! Checkpoint persistence.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::VoxpaintError;
use crate::model::io_json::{read_json, write_json};
use crate::model::{Checkpoint, TaskId};

/// What happens to a task's earlier checkpoints when a new one is saved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Keep only the newest checkpoint.
    #[default]
    ReplaceLatest,
    /// Keep every checkpoint in save order.
    Append,
}

impl FromStr for RetentionPolicy {
    type Err = VoxpaintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" | "replace-latest" => Ok(RetentionPolicy::ReplaceLatest),
            "append" => Ok(RetentionPolicy::Append),
            other => Err(VoxpaintError::InvalidArgument(format!(
                "unknown retention policy '{}' (expected replace or append)",
                other
            ))),
        }
    }
}

impl fmt::Display for RetentionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RetentionPolicy::ReplaceLatest => f.write_str("replace"),
            RetentionPolicy::Append => f.write_str("append"),
        }
    }
}

/// Storage of checkpoints grouped by task.
pub trait CheckpointStore {
    /// Saves a checkpoint under its task id.
    fn save(&mut self, checkpoint: Checkpoint) -> Result<(), VoxpaintError>;

    /// The task's checkpoints in the order they should be applied.
    fn for_task(&self, task_id: &TaskId) -> Result<Vec<Checkpoint>, VoxpaintError>;
}

fn retain(
    all: &mut BTreeMap<TaskId, Vec<Checkpoint>>,
    checkpoint: Checkpoint,
    policy: RetentionPolicy,
) {
    let list = all.entry(checkpoint.task_id.clone()).or_default();
    if policy == RetentionPolicy::ReplaceLatest {
        list.clear();
    }
    list.push(checkpoint);
}

/// Checkpoints held in process memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryCheckpointStore {
    policy: RetentionPolicy,
    checkpoints: BTreeMap<TaskId, Vec<Checkpoint>>,
}

impl InMemoryCheckpointStore {
    pub fn new(policy: RetentionPolicy) -> Self {
        Self {
            policy,
            checkpoints: BTreeMap::new(),
        }
    }
}

impl CheckpointStore for InMemoryCheckpointStore {
    fn save(&mut self, checkpoint: Checkpoint) -> Result<(), VoxpaintError> {
        retain(&mut self.checkpoints, checkpoint, self.policy);
        Ok(())
    }

    fn for_task(&self, task_id: &TaskId) -> Result<Vec<Checkpoint>, VoxpaintError> {
        Ok(self.checkpoints.get(task_id).cloned().unwrap_or_default())
    }
}

/// Checkpoints kept in one JSON object mapping task id to checkpoint list.
#[derive(Clone, Debug)]
pub struct JsonFileCheckpointStore {
    path: PathBuf,
    policy: RetentionPolicy,
}

impl JsonFileCheckpointStore {
    pub fn new(path: impl Into<PathBuf>, policy: RetentionPolicy) -> Self {
        Self {
            path: path.into(),
            policy,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<TaskId, Vec<Checkpoint>>, VoxpaintError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        read_json(&self.path)
    }
}

impl CheckpointStore for JsonFileCheckpointStore {
    fn save(&mut self, checkpoint: Checkpoint) -> Result<(), VoxpaintError> {
        let mut all = self.load()?;
        log::debug!(
            "saving checkpoint with {} polygon(s) for task {} ({})",
            checkpoint.polygons.len(),
            checkpoint.task_id,
            self.policy
        );
        retain(&mut all, checkpoint, self.policy);
        write_json(&self.path, &all)
    }

    fn for_task(&self, task_id: &TaskId) -> Result<Vec<Checkpoint>, VoxpaintError> {
        Ok(self.load()?.remove(task_id).unwrap_or_default())
    }
}
