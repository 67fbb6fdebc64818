//! Store port for project aggregate persistence.

use crate::project::domain::{
    ClientId, Page, PageRequest, Project, ProjectId, ProjectStatus, TenantId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project store operations.
pub type ProjectStoreResult<T> = Result<T, ProjectStoreError>;

/// Project persistence contract.
///
/// Every mutating operation is atomic over all records it touches: the
/// project row, its participant rows, and its leader rows commit or roll
/// back together.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Stores a new project aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::DuplicateProject`] when the project ID
    /// already exists.
    async fn create(&self, project: &Project) -> ProjectStoreResult<()>;

    /// Persists the full current state of an existing aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::NotFound`] when the project does not
    /// exist.
    async fn update(&self, project: &Project) -> ProjectStoreResult<()>;

    /// Atomically closes a project.
    ///
    /// The all-tasks-closed condition is re-verified inside the same
    /// transaction that writes the new status, so a task reopened between
    /// the caller's check and this write still blocks the close.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::NotFound`] when the project does not
    /// exist and [`ProjectStoreError::OpenTasksRemain`] when an owned task
    /// is not closed.
    async fn close(&self, project_id: ProjectId) -> ProjectStoreResult<()>;

    /// Deletes a project with its explicit cascade.
    ///
    /// Deletion order inside one transaction: owned tasks first, then the
    /// client association, then the project aggregate rows.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectStoreError::NotFound`] when the project does not
    /// exist.
    async fn delete(&self, project_id: ProjectId) -> ProjectStoreResult<()>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, project_id: ProjectId) -> ProjectStoreResult<Option<Project>>;

    /// Lists a tenant's projects, optionally filtered by status, ordered by
    /// creation time ascending.
    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        status: Option<ProjectStatus>,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>>;

    /// Lists a client's projects within a tenant, ordered by creation time
    /// ascending.
    async fn list_by_client(
        &self,
        tenant_id: TenantId,
        client_id: ClientId,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>>;
}

/// Errors returned by project store implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectStoreError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// The close guard found owned tasks that are not closed.
    #[error("complete all tasks before closing the project ({open} still open)")]
    OpenTasksRemain {
        /// The project being closed.
        project: ProjectId,
        /// Number of tasks not yet closed.
        open: usize,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
