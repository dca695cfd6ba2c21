use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};

use lingoledger_core::{DomainError, DomainResult, Entity, TaskId};
use lingoledger_tasks::Task;

use super::table::Table;

/// Task lookup and registration.
pub trait TaskStore: Send + Sync {
    /// Insert a task, assigning the next id when it has none.
    fn add(&self, task: Task) -> DomainResult<Arc<Task>>;
    fn get(&self, id: TaskId) -> DomainResult<Option<Arc<Task>>>;
    /// Case-insensitive exact match on location and both languages.
    fn find_by_attributes(
        &self,
        location: &str,
        source_language: &str,
        target_language: &str,
    ) -> DomainResult<Vec<Arc<Task>>>;
    /// Case-insensitive location match with start time in `[start, end]`.
    fn find_by_location_and_time_range(
        &self,
        location: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Arc<Task>>>;
    fn list(&self) -> DomainResult<Vec<Arc<Task>>>;
}

impl<S> TaskStore for Arc<S>
where
    S: TaskStore + ?Sized,
{
    fn add(&self, task: Task) -> DomainResult<Arc<Task>> {
        (**self).add(task)
    }

    fn get(&self, id: TaskId) -> DomainResult<Option<Arc<Task>>> {
        (**self).get(id)
    }

    fn find_by_attributes(
        &self,
        location: &str,
        source_language: &str,
        target_language: &str,
    ) -> DomainResult<Vec<Arc<Task>>> {
        (**self).find_by_attributes(location, source_language, target_language)
    }

    fn find_by_location_and_time_range(
        &self,
        location: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Arc<Task>>> {
        (**self).find_by_location_and_time_range(location, start, end)
    }

    fn list(&self) -> DomainResult<Vec<Arc<Task>>> {
        (**self).list()
    }
}

/// In-memory task store.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    inner: RwLock<Table<TaskId, Arc<Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn filtered(&self, keep: impl Fn(&Task) -> bool) -> DomainResult<Vec<Arc<Task>>> {
        let table = self.inner.read().map_err(|_| DomainError::poisoned())?;
        Ok(table.values().filter(|t| keep(t)).cloned().collect())
    }
}

impl TaskStore for InMemoryTaskStore {
    fn add(&self, mut task: Task) -> DomainResult<Arc<Task>> {
        let mut table = self.inner.write().map_err(|_| DomainError::poisoned())?;

        if let Some(id) = task.id() {
            if table.contains(&id) {
                return Err(DomainError::duplicate_id("task", id));
            }
        }

        let id = table.allocate(task.id())?;
        task.assign_id(id);
        let task = Arc::new(task);
        table.put(id, task.clone());

        tracing::debug!(task_id = %id, location = task.location(), "task added");
        Ok(task)
    }

    fn get(&self, id: TaskId) -> DomainResult<Option<Arc<Task>>> {
        let table = self.inner.read().map_err(|_| DomainError::poisoned())?;
        Ok(table.get(&id).cloned())
    }

    fn find_by_attributes(
        &self,
        location: &str,
        source_language: &str,
        target_language: &str,
    ) -> DomainResult<Vec<Arc<Task>>> {
        self.filtered(|t| t.matches_attributes(location, source_language, target_language))
    }

    fn find_by_location_and_time_range(
        &self,
        location: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Arc<Task>>> {
        self.filtered(|t| t.starts_within(location, start, end))
    }

    fn list(&self) -> DomainResult<Vec<Arc<Task>>> {
        self.filtered(|_| true)
    }
}
