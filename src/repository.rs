//! Task storage: a repository trait plus the JSON-file-backed implementation.
//!
//! The whole task list lives in memory and the entire file is rewritten on
//! every mutation. There is no locking; concurrent invocations of the tool
//! against the same file race and the last writer wins.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::Utc;
use log::debug;
use thiserror::Error;

use crate::task::{Status, Task};

/// Errors that can occur while loading or persisting the task list.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The task file exists but cannot be read, or cannot be written.
    #[error("cannot access task file: {0}")]
    Persistence(#[from] std::io::Error),
    /// The task file exists but does not deserialize as a task list.
    #[error("task file is corrupt: {0}")]
    CorruptData(#[from] serde_json::Error),
}

/// CRUD operations over the task list.
///
/// The one concrete implementation is [`JsonTaskRepository`]; the trait
/// exists so the dispatcher can be tested against a mock without touching
/// the filesystem.
#[cfg_attr(test, mockall::automock)]
pub trait TaskRepository {
    /// Creates a task with the next count-based id and persists the list.
    fn add(&mut self, description: &str) -> Result<Task, RepositoryError>;
    /// Replaces the description of the task with the given id, if present.
    fn update(&mut self, id: u32, description: &str) -> Result<(), RepositoryError>;
    /// Removes the task with the given id, if present.
    fn delete(&mut self, id: u32) -> Result<(), RepositoryError>;
    /// Moves the task with the given id to `in-progress`, if present.
    fn mark_in_progress(&mut self, id: u32) -> Result<(), RepositoryError>;
    /// Moves the task with the given id to `done`, if present.
    fn mark_done(&mut self, id: u32) -> Result<(), RepositoryError>;
    /// Returns tasks in insertion order, optionally filtered by status.
    fn list(&self, status: Option<Status>) -> Vec<Task>;
}

/// Repository backed by a single JSON file holding a flat task array.
#[derive(Debug)]
pub struct JsonTaskRepository {
    path: PathBuf,
    tasks: Vec<Task>,
}

impl JsonTaskRepository {
    /// Opens the repository at `path`, reading the full task list.
    ///
    /// A missing file is initialized to an empty array on disk. A file that
    /// exists but does not parse as a task array is a
    /// [`RepositoryError::CorruptData`].
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let path = path.into();
        let tasks: Vec<Task> = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::write(&path, "[]")?;
                Vec::new()
            }
            Err(err) => return Err(RepositoryError::Persistence(err)),
        };
        debug!("loaded {} tasks from {}", tasks.len(), path.display());
        Ok(Self { path, tasks })
    }

    fn save(&self) -> Result<(), RepositoryError> {
        let data = serde_json::to_string(&self.tasks)?;
        fs::write(&self.path, data)?;
        debug!(
            "rewrote {} with {} tasks",
            self.path.display(),
            self.tasks.len()
        );
        Ok(())
    }

    /// Applies `change` to the matching task and refreshes its `updated_at`.
    ///
    /// The file is rewritten even when no task matched; a missing id is not
    /// an error.
    fn modify(
        &mut self,
        id: u32,
        change: impl FnOnce(&mut Task),
    ) -> Result<(), RepositoryError> {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            change(task);
            task.updated_at = Utc::now();
        }
        self.save()
    }
}

impl TaskRepository for JsonTaskRepository {
    fn add(&mut self, description: &str) -> Result<Task, RepositoryError> {
        let now = Utc::now();
        let task = Task {
            // Count-based, so an id freed by delete is handed out again.
            id: self.tasks.len() as u32 + 1,
            description: description.to_string(),
            status: Status::Todo,
            created_at: now,
            updated_at: now,
        };
        self.tasks.push(task.clone());
        self.save()?;
        Ok(task)
    }

    fn update(&mut self, id: u32, description: &str) -> Result<(), RepositoryError> {
        let description = description.to_string();
        self.modify(id, |task| task.description = description)
    }

    fn delete(&mut self, id: u32) -> Result<(), RepositoryError> {
        self.tasks.retain(|task| task.id != id);
        self.save()
    }

    fn mark_in_progress(&mut self, id: u32) -> Result<(), RepositoryError> {
        self.modify(id, |task| task.status = Status::InProgress)
    }

    fn mark_done(&mut self, id: u32) -> Result<(), RepositoryError> {
        self.modify(id, |task| task.status = Status::Done)
    }

    fn list(&self, status: Option<Status>) -> Vec<Task> {
        match status {
            None => self.tasks.clone(),
            Some(status) => self
                .tasks
                .iter()
                .filter(|task| task.status == status)
                .cloned()
                .collect(),
        }
    }
}
