use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::domain::{Task, TaskChange, TaskFields, TaskStatus};
use crate::error::ServiceError;
use crate::service::Crud;
use crate::store::Store;
use crate::user::User;

/// CRUD and lookups over the acting user's tasks.
#[derive(Clone)]
pub struct TaskService {
    crud: Crud<Task>,
}

impl TaskService {
    pub fn new(store: Arc<dyn Store<Task>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            crud: Crud::new(store, clock, "tasks"),
        }
    }

    /// Adds a task owned by `actor`.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Duplicate`] when `actor` already has a task with this id.
    #[tracing::instrument(skip(self, actor, task), fields(actor = actor.id(), id = task.task_id()))]
    pub fn add(&self, actor: &User, task: Task) -> Result<(), ServiceError> {
        self.crud.add(actor, task)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn delete(&self, actor: &User, task_id: &str) -> Result<bool, ServiceError> {
        self.crud.delete(actor, task_id)
    }

    /// Atomically replaces every mutable field of a task and refreshes `updated_at`.
    ///
    /// Returns `Ok(false)` when no such task exists.
    #[tracing::instrument(skip(self, actor, fields), fields(actor = actor.id()))]
    pub fn update(&self, actor: &User, task_id: &str, fields: TaskFields) -> Result<bool, ServiceError> {
        self.crud.update(actor, task_id, fields.into())
    }

    /// Replaces name and description only. Status, due date and links are
    /// kept as stored.
    pub fn update_task(
        &self,
        actor: &User,
        task_id: &str,
        name: &str,
        description: &str,
    ) -> Result<bool, ServiceError> {
        let change = TaskChange::Details {
            name: name.to_string(),
            description: description.to_string(),
        };
        self.crud.update(actor, task_id, change)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_by_id(&self, actor: &User, task_id: &str) -> Result<Option<Task>, ServiceError> {
        self.crud.get_by_id(actor, task_id)
    }

    pub fn exists(&self, actor: &User, task_id: &str) -> Result<bool, ServiceError> {
        self.crud.exists(actor, task_id)
    }

    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all(&self, actor: &User) -> Result<Vec<Task>, ServiceError> {
        self.crud.get_all(actor)
    }

    /// Every user's tasks. Admin only.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_all_for_all_users(&self, actor: &User) -> Result<Vec<Task>, ServiceError> {
        self.crud.get_all_for_all_users(actor)
    }

    pub fn get_by_status(&self, actor: &User, status: TaskStatus) -> Result<Vec<Task>, ServiceError> {
        self.crud.filter(actor, |task| task.status() == status)
    }

    /// Tasks due strictly before `date`. Tasks without a due date are excluded.
    pub fn get_due_before(&self, actor: &User, date: NaiveDate) -> Result<Vec<Task>, ServiceError> {
        self.crud
            .filter(actor, |task| task.due_date().is_some_and(|due| due < date))
    }

    pub fn get_by_project_id(&self, actor: &User, project_id: &str) -> Result<Vec<Task>, ServiceError> {
        let project_id = project_id.trim();
        self.crud
            .filter(actor, |task| task.project_id() == Some(project_id))
    }

    pub fn get_by_assignee_id(&self, actor: &User, assignee_id: i64) -> Result<Vec<Task>, ServiceError> {
        self.crud
            .filter(actor, |task| task.assignee_id() == Some(assignee_id))
    }

    /// Open tasks whose due date is before the clock's current day.
    #[tracing::instrument(skip(self, actor), fields(actor = actor.id()))]
    pub fn get_overdue(&self, actor: &User) -> Result<Vec<Task>, ServiceError> {
        let today = self.crud.clock().today();
        self.crud.filter(actor, |task| task.is_overdue(today))
    }

    #[cfg(test)]
    pub(crate) fn clear(&self) -> Result<(), ServiceError> {
        self.crud.clear()
    }
}
