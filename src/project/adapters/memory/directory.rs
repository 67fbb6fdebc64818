//! In-memory directory for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{ClientId, ClientProfile, EmployeeId, EmployeeProfile},
    ports::{DirectoryError, DirectoryResult, EmployeeDirectory},
};

/// Thread-safe in-memory employee/client directory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    state: Arc<RwLock<DirectoryState>>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    employees: HashMap<EmployeeId, EmployeeProfile>,
    clients: HashMap<ClientId, ClientProfile>,
}

fn poisoned(err: impl ToString) -> DirectoryError {
    DirectoryError::lookup(std::io::Error::other(err.to_string()))
}

impl InMemoryDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an employee profile.
    pub fn insert_employee(&self, profile: EmployeeProfile) {
        if let Ok(mut state) = self.state.write() {
            state.employees.insert(profile.id, profile);
        }
    }

    /// Registers a client profile.
    pub fn insert_client(&self, profile: ClientProfile) {
        if let Ok(mut state) = self.state.write() {
            state.clients.insert(profile.id, profile);
        }
    }
}

#[async_trait]
impl EmployeeDirectory for InMemoryDirectory {
    async fn resolve_employees(
        &self,
        ids: &[EmployeeId],
    ) -> DirectoryResult<Vec<EmployeeProfile>> {
        let state = self.state.read().map_err(poisoned)?;
        ids.iter()
            .map(|id| {
                state
                    .employees
                    .get(id)
                    .cloned()
                    .ok_or(DirectoryError::EmployeeNotFound(*id))
            })
            .collect()
    }

    async fn resolve_employee(&self, id: EmployeeId) -> DirectoryResult<EmployeeProfile> {
        let state = self.state.read().map_err(poisoned)?;
        state
            .employees
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::EmployeeNotFound(id))
    }

    async fn resolve_client(&self, id: ClientId) -> DirectoryResult<ClientProfile> {
        let state = self.state.read().map_err(poisoned)?;
        state
            .clients
            .get(&id)
            .cloned()
            .ok_or(DirectoryError::ClientNotFound(id))
    }
}
