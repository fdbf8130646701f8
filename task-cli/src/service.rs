use crate::error::TaskError;
use crate::store::{TaskStore, next_id};
use crate::task::{Status, StatusFilter, Task, now};

/// Task operations on top of a [`TaskStore`].
///
/// Every call reads the whole file, works on the in-memory copy and writes it
/// back. Nothing is cached between calls, and the file is left untouched when
/// a call fails validation.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: TaskStore,
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Adds a new `todo` task with the next free id.
    ///
    /// # Errors
    ///
    /// * `TaskError::Validation` - the trimmed description is empty
    #[tracing::instrument(skip(self))]
    pub fn add(&self, description: &str) -> Result<Task, TaskError> {
        let description = clean_description(description)?;
        let mut tasks = self.store.load()?;
        let task = Task::new(next_id(&tasks)?, description, now());
        tasks.push(task.clone());
        self.store.save(&tasks)?;
        Ok(task)
    }

    /// Replaces the description of task `id`.
    #[tracing::instrument(skip(self))]
    pub fn update(&self, id: u32, description: &str) -> Result<Task, TaskError> {
        let mut tasks = self.store.load()?;
        let task = find_mut(&mut tasks, id)?;
        task.set_description(clean_description(description)?, now());
        let updated = task.clone();
        self.store.save(&tasks)?;
        Ok(updated)
    }

    /// Removes task `id` and returns it as it was before removal.
    #[tracing::instrument(skip(self))]
    pub fn delete(&self, id: u32) -> Result<Task, TaskError> {
        let mut tasks = self.store.load()?;
        let position = tasks
            .iter()
            .position(|task| task.id() == id)
            .ok_or(TaskError::NotFound(id))?;
        let removed = tasks.remove(position);
        self.store.save(&tasks)?;
        Ok(removed)
    }

    /// Moves task `id` to `status`. Any status may follow any other.
    #[tracing::instrument(skip(self))]
    pub fn mark(&self, id: u32, status: Status) -> Result<Task, TaskError> {
        let mut tasks = self.store.load()?;
        let task = find_mut(&mut tasks, id)?;
        task.set_status(status, now());
        let updated = task.clone();
        self.store.save(&tasks)?;
        Ok(updated)
    }

    /// Returns the tasks matching `filter`, ascending by id.
    #[tracing::instrument(skip(self))]
    pub fn list(&self, filter: Option<StatusFilter>) -> Result<Vec<Task>, TaskError> {
        let mut tasks: Vec<Task> = self
            .store
            .load()?
            .into_iter()
            .filter(|task| filter.is_none_or(|wanted| wanted.matches(task.status())))
            .collect();
        tasks.sort_by_key(Task::id);
        Ok(tasks)
    }

    #[tracing::instrument(skip(self))]
    pub fn get(&self, id: u32) -> Result<Task, TaskError> {
        self.store
            .load()?
            .into_iter()
            .find(|task| task.id() == id)
            .ok_or(TaskError::NotFound(id))
    }
}

fn clean_description(description: &str) -> Result<String, TaskError> {
    let cleaned = description.trim();
    if cleaned.is_empty() {
        return Err(TaskError::Validation("empty description".to_string()));
    }
    Ok(cleaned.to_string())
}

fn find_mut(tasks: &mut [Task], id: u32) -> Result<&mut Task, TaskError> {
    tasks
        .iter_mut()
        .find(|task| task.id() == id)
        .ok_or(TaskError::NotFound(id))
}
