//! Directory port for employee and client resolution.

use crate::project::domain::{ClientId, ClientProfile, EmployeeId, EmployeeProfile};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for directory lookups.
pub type DirectoryResult<T> = Result<T, DirectoryError>;

/// Resolves identifiers to display attributes and validates existence.
///
/// The directory is an external collaborator; the core never writes to it.
#[async_trait]
pub trait EmployeeDirectory: Send + Sync {
    /// Resolves a batch of employee ids, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::EmployeeNotFound`] for the first
    /// unresolved id.
    async fn resolve_employees(&self, ids: &[EmployeeId])
    -> DirectoryResult<Vec<EmployeeProfile>>;

    /// Resolves a single employee id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::EmployeeNotFound`] when unresolved.
    async fn resolve_employee(&self, id: EmployeeId) -> DirectoryResult<EmployeeProfile>;

    /// Resolves a client id.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::ClientNotFound`] when unresolved.
    async fn resolve_client(&self, id: ClientId) -> DirectoryResult<ClientProfile>;
}

/// Errors returned by directory implementations.
#[derive(Debug, Clone, Error)]
pub enum DirectoryError {
    /// No employee exists for the id.
    #[error("employee not found: {0}")]
    EmployeeNotFound(EmployeeId),

    /// No client exists for the id.
    #[error("client not found: {0}")]
    ClientNotFound(ClientId),

    /// Lookup-layer failure.
    #[error("directory lookup error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl DirectoryError {
    /// Wraps a lookup error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
