//! Store port for task persistence and project-scoped queries.

use crate::project::domain::{EmployeeId, Page, PageRequest, ProjectId, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Inserting or deleting a task also maintains the owning project's
/// owned-task collection; each such operation is atomic over both records.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task and registers it with its owning project.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists and [`TaskStoreError::ProjectNotFound`] when the owning
    /// project does not exist.
    async fn store(&self, task: &Task) -> TaskStoreResult<()>;

    /// Stores a batch of tasks all-or-nothing.
    ///
    /// # Errors
    ///
    /// Propagates the first per-task error; no task from the batch is
    /// persisted in that case.
    async fn store_all(&self, tasks: &[Task]) -> TaskStoreResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Deletes a task and removes it from its project's owned collection.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn delete(&self, task_id: TaskId) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, task_id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns every task owned by the project, unpaged.
    ///
    /// Used for close-gating and cascade checks.
    async fn find_by_project(&self, project_id: ProjectId) -> TaskStoreResult<Vec<Task>>;

    /// Lists a project's tasks ordered by assignment time ascending.
    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>>;

    /// Lists the tasks within a project assigned to an employee, ordered by
    /// assignment time ascending.
    async fn list_by_assignee(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The owning project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
