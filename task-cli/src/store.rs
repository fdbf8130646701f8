use crate::error::TaskError;
use crate::task::Task;
use serde_json::Value;
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_TASKS_FILE: &str = "tasks.json";

/// JSON file holding every task as a top-level array.
#[derive(Debug, Clone)]
pub struct TaskStore {
    path: PathBuf,
}

impl TaskStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Materializes the file as `[]` if it does not exist yet.
    pub fn ensure_exists(&self) -> Result<(), TaskError> {
        let exists = self
            .path
            .try_exists()
            .map_err(|e| TaskError::io(&self.path, e))?;
        if !exists {
            debug!(path = %self.path.display(), "creating empty task file");
            self.write_atomically("[]")?;
        }
        Ok(())
    }

    pub fn load(&self) -> Result<Vec<Task>, TaskError> {
        self.ensure_exists()?;
        let contents = fs::read_to_string(&self.path).map_err(|e| TaskError::io(&self.path, e))?;
        let tasks = parse_tasks(&contents)?;
        debug!(path = %self.path.display(), count = tasks.len(), "loaded tasks");
        Ok(tasks)
    }

    /// Overwrites the whole file with `tasks`.
    ///
    /// The new contents go to a sibling temporary file first, which is then
    /// renamed over the target, so readers never see a half-written file.
    pub fn save(&self, tasks: &[Task]) -> Result<(), TaskError> {
        let json = serde_json::to_string_pretty(tasks)
            .map_err(|e| TaskError::io(&self.path, e.into()))?;
        self.write_atomically(&json)?;
        debug!(path = %self.path.display(), count = tasks.len(), "saved tasks");
        Ok(())
    }

    fn write_atomically(&self, contents: &str) -> Result<(), TaskError> {
        let tmp = self.temp_path();
        fs::write(&tmp, contents).map_err(|e| TaskError::io(&tmp, e))?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            TaskError::io(&self.path, e)
        })
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| OsString::from(DEFAULT_TASKS_FILE));
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Returns the id the next added task gets: one past the highest id in use.
pub fn next_id(tasks: &[Task]) -> Result<u32, TaskError> {
    tasks
        .iter()
        .map(Task::id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| TaskError::Validation("no task ids left".to_string()))
}

fn parse_tasks(contents: &str) -> Result<Vec<Task>, TaskError> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let value: Value = serde_json::from_str(contents)
        .map_err(|e| TaskError::CorruptStore(format!("invalid JSON: {e}")))?;
    let Value::Array(items) = value else {
        return Err(TaskError::CorruptStore("expected a JSON array".to_string()));
    };

    let mut seen = HashSet::with_capacity(items.len());
    let mut tasks = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(TaskError::CorruptStore(format!("task at index {index} is not an object")));
        }
        let task: Task = serde_json::from_value(item).map_err(|e| {
            TaskError::CorruptStore(format!("task at index {index} is invalid: {e}"))
        })?;
        if task.id() == 0 {
            return Err(TaskError::CorruptStore(format!("task at index {index} has id 0")));
        }
        if !seen.insert(task.id()) {
            return Err(TaskError::CorruptStore(format!(
                "task at index {index} reuses id {}",
                task.id()
            )));
        }
        if task.created_at().timestamp_subsec_nanos() != 0
            || task.updated_at().timestamp_subsec_nanos() != 0
        {
            return Err(TaskError::CorruptStore(format!(
                "task at index {index} has a timestamp with fractional seconds"
            )));
        }
        tasks.push(task);
    }
    Ok(tasks)
}
