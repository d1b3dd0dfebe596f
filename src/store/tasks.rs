//! Task persistence: a key-value store of tasks by id.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::VoxpaintError;
use crate::model::io_json::{read_json, write_json};
use crate::model::{Task, TaskId, TaskRecord};

/// Generates a fresh 32-character lowercase hex task id.
pub fn new_task_id() -> TaskId {
    TaskId(format!("{:032x}", rand::random::<u128>()))
}

/// Key-value access to stored tasks.
pub trait TaskStore {
    /// Stores a new task under a fresh id.
    fn put(&mut self, task: Task) -> Result<TaskId, VoxpaintError>;

    /// Looks up a task.
    fn get(&self, id: &TaskId) -> Result<TaskRecord, VoxpaintError>;

    /// Replaces an existing task.
    fn update(&mut self, id: &TaskId, task: Task) -> Result<(), VoxpaintError>;

    /// Removes a task.
    fn delete(&mut self, id: &TaskId) -> Result<(), VoxpaintError>;

    /// All tasks, ordered by id.
    fn list(&self) -> Result<Vec<TaskRecord>, VoxpaintError>;

    /// Tasks assigned to `user`.
    fn list_for_user(&self, user: &str) -> Result<Vec<TaskRecord>, VoxpaintError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.task.assigned_to.as_deref() == Some(user))
            .collect())
    }

    /// The highest-priority task assigned to `user`. Ties go to the lowest id.
    fn next_for_user(&self, user: &str) -> Result<Option<TaskRecord>, VoxpaintError> {
        let mut tasks = self.list_for_user(user)?;
        // stable sort keeps id order among equal priorities
        tasks.sort_by(|a, b| b.task.priority.cmp(&a.task.priority));
        Ok(tasks.into_iter().next())
    }

    /// Tasks nobody is assigned to.
    fn unassigned(&self) -> Result<Vec<TaskRecord>, VoxpaintError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.task.assigned_to.is_none())
            .collect())
    }

    /// Hands a task to `user`.
    fn assign(&mut self, id: &TaskId, user: &str) -> Result<(), VoxpaintError> {
        let mut record = self.get(id)?;
        record.task.assigned_to = Some(user.to_string());
        self.update(id, record.task)
    }
}

/// A task store that lives only as long as the process.
#[derive(Clone, Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: BTreeMap<TaskId, Task>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn put(&mut self, task: Task) -> Result<TaskId, VoxpaintError> {
        let id = new_task_id();
        self.tasks.insert(id.clone(), task);
        Ok(id)
    }

    fn get(&self, id: &TaskId) -> Result<TaskRecord, VoxpaintError> {
        self.tasks
            .get(id)
            .map(|task| TaskRecord {
                id: id.clone(),
                task: task.clone(),
            })
            .ok_or_else(|| VoxpaintError::TaskNotFound(id.clone()))
    }

    fn update(&mut self, id: &TaskId, task: Task) -> Result<(), VoxpaintError> {
        match self.tasks.get_mut(id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(VoxpaintError::TaskNotFound(id.clone())),
        }
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), VoxpaintError> {
        self.tasks
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| VoxpaintError::TaskNotFound(id.clone()))
    }

    fn list(&self) -> Result<Vec<TaskRecord>, VoxpaintError> {
        Ok(self
            .tasks
            .iter()
            .map(|(id, task)| TaskRecord {
                id: id.clone(),
                task: task.clone(),
            })
            .collect())
    }
}

/// Tasks kept in one JSON object keyed by id.
///
/// Every operation re-reads the file, so several processes can share it as
/// long as they do not write concurrently. A missing file is an empty store.
#[derive(Clone, Debug)]
pub struct JsonFileTaskStore {
    path: PathBuf,
}

impl JsonFileTaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<TaskId, TaskRecord>, VoxpaintError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        read_json(&self.path)
    }

    fn save(&self, tasks: &BTreeMap<TaskId, TaskRecord>) -> Result<(), VoxpaintError> {
        write_json(&self.path, tasks)
    }
}

impl TaskStore for JsonFileTaskStore {
    fn put(&mut self, task: Task) -> Result<TaskId, VoxpaintError> {
        let mut tasks = self.load()?;
        let id = new_task_id();
        tasks.insert(
            id.clone(),
            TaskRecord {
                id: id.clone(),
                task,
            },
        );
        self.save(&tasks)?;
        log::debug!("stored task {} in {}", id, self.path.display());
        Ok(id)
    }

    fn get(&self, id: &TaskId) -> Result<TaskRecord, VoxpaintError> {
        self.load()?
            .remove(id)
            .ok_or_else(|| VoxpaintError::TaskNotFound(id.clone()))
    }

    fn update(&mut self, id: &TaskId, task: Task) -> Result<(), VoxpaintError> {
        let mut tasks = self.load()?;
        let record = tasks
            .get_mut(id)
            .ok_or_else(|| VoxpaintError::TaskNotFound(id.clone()))?;
        record.task = task;
        self.save(&tasks)
    }

    fn delete(&mut self, id: &TaskId) -> Result<(), VoxpaintError> {
        let mut tasks = self.load()?;
        if tasks.remove(id).is_none() {
            return Err(VoxpaintError::TaskNotFound(id.clone()));
        }
        self.save(&tasks)
    }

    fn list(&self) -> Result<Vec<TaskRecord>, VoxpaintError> {
        Ok(self.load()?.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(priority: i64) -> Task {
        Task::new("col", "exp", "chan", 0, (0, 10), (0, 10), (0, 2)).with_priority(priority)
    }

    fn exercise(store: &mut dyn TaskStore) {
        let low = store.put(task(1)).unwrap();
        let high = store.put(task(5)).unwrap();
        let other = store.put(task(9)).unwrap();

        assert_eq!(store.list().unwrap().len(), 3);
        assert_eq!(store.unassigned().unwrap().len(), 3);

        store.assign(&low, "ana").unwrap();
        store.assign(&high, "ana").unwrap();
        store.assign(&other, "ben").unwrap();

        assert_eq!(store.list_for_user("ana").unwrap().len(), 2);
        let next = store.next_for_user("ana").unwrap().unwrap();
        assert_eq!(next.id, high);
        assert!(store.next_for_user("nobody").unwrap().is_none());
        assert!(store.unassigned().unwrap().is_empty());

        store.delete(&high).unwrap();
        assert!(matches!(store.get(&high), Err(VoxpaintError::TaskNotFound(_))));
        assert!(store.delete(&high).is_err());
        assert_eq!(store.get(&low).unwrap().task.assigned_to.as_deref(), Some("ana"));
    }

    #[test]
    fn test_in_memory_store() {
        exercise(&mut InMemoryTaskStore::new());
    }

    #[test]
    fn test_json_file_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tasks.json");
        exercise(&mut JsonFileTaskStore::new(&path));

        // A second handle sees the same data.
        let reopened = JsonFileTaskStore::new(&path);
        assert_eq!(reopened.list().unwrap().len(), 2);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileTaskStore::new(dir.path().join("absent.json"));
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_ids_are_hex() {
        let id = new_task_id();
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }
}
