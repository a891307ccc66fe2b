//! JSON task file.
//!
//! The timer never writes tasks; this store exists so a front end has a task
//! list to hand it. The file is a plain JSON array of [`Task`] values.

use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{CoreError, Result};
use crate::task::Task;

#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    /// `tasks.json` in the data directory.
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(data_dir()?.join("tasks.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the list. A missing file is an empty list.
    pub fn load(&self) -> Result<Vec<Task>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(tasks)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Append a new pending task with a fresh UUID.
    pub fn add(&self, title: &str) -> Result<Task> {
        let mut tasks = self.load()?;
        let task = Task::new(uuid::Uuid::new_v4().to_string(), title);
        tasks.push(task.clone());
        self.save(&tasks)?;
        Ok(task)
    }

    pub fn set_completed(&self, id: &str, completed: bool) -> Result<Task> {
        let mut tasks = self.load()?;
        let task = tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        task.completed = completed;
        let updated = task.clone();
        self.save(&tasks)?;
        Ok(updated)
    }

    pub fn remove(&self, id: &str) -> Result<Task> {
        let mut tasks = self.load()?;
        let index = tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CoreError::TaskNotFound(id.to_string()))?;
        let removed = tasks.remove(index);
        self.save(&tasks)?;
        Ok(removed)
    }
}
