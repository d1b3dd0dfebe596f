//! Persistence of tasks and checkpoints.
//!
//! Both stores are plain key-value capabilities. The materializer never
//! touches them; callers load a task and its checkpoints first and pass the
//! values in.

mod checkpoints;
mod tasks;

pub use checkpoints::{
    CheckpointStore, InMemoryCheckpointStore, JsonFileCheckpointStore, RetentionPolicy,
};
pub use tasks::{new_task_id, InMemoryTaskStore, JsonFileTaskStore, TaskStore};
