//! Shared fixtures for workflow service tests.

use std::sync::Arc;

use crate::project::{
    adapters::memory::{
        InMemoryDirectory, InMemoryProjectStore, InMemoryTaskStore, InMemoryWorkspace,
        RecordingDispatcher,
    },
    domain::{
        ActorRole, ClientId, ClientProfile, EmployeeId, EmployeeProfile, TenantContext, TenantId,
    },
    services::ProjectWorkflowService,
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::DefaultClock;

/// Service type under test.
pub type TestService = ProjectWorkflowService<
    InMemoryProjectStore,
    InMemoryTaskStore,
    InMemoryDirectory,
    RecordingDispatcher,
    DefaultClock,
>;

/// Workflow service wired to in-memory collaborators.
pub struct Harness {
    /// Service under test.
    pub service: TestService,
    /// Backing workspace, for direct state observation.
    pub workspace: InMemoryWorkspace,
    /// Directory the service resolves against.
    pub directory: InMemoryDirectory,
    /// Recording dispatcher, for notification assertions.
    pub notifier: RecordingDispatcher,
    /// Tenant all fixtures belong to unless stated otherwise.
    pub tenant: TenantId,
}

impl Harness {
    /// Creates a fresh harness with an empty workspace.
    pub fn new() -> Self {
        let workspace = InMemoryWorkspace::new();
        let directory = InMemoryDirectory::new();
        let notifier = RecordingDispatcher::new();
        let service = ProjectWorkflowService::new(
            Arc::new(workspace.project_store()),
            Arc::new(workspace.task_store()),
            Arc::new(directory.clone()),
            Arc::new(notifier.clone()),
            Arc::new(DefaultClock),
        );
        Self {
            service,
            workspace,
            directory,
            notifier,
            tenant: TenantId::new(),
        }
    }

    /// Registers an employee with the given directory role.
    pub fn employee(&self, role: ActorRole) -> EmployeeId {
        let id = EmployeeId::new();
        self.directory.insert_employee(EmployeeProfile {
            id,
            name: format!("employee-{id}"),
            email: format!("{id}@example.test"),
            mobile: "0000000".to_owned(),
            role,
        });
        id
    }

    /// Registers a client.
    pub fn client(&self) -> ClientId {
        let id = ClientId::new();
        self.directory.insert_client(ClientProfile {
            id,
            name: format!("client-{id}"),
        });
        id
    }

    /// Builds a context for this harness's tenant.
    pub fn context(&self, user: EmployeeId, role: ActorRole) -> TenantContext {
        TenantContext::new(self.tenant, user, role)
    }

    /// Builds a context for a foreign tenant.
    pub fn foreign_context(&self, user: EmployeeId, role: ActorRole) -> TenantContext {
        TenantContext::new(TenantId::new(), user, role)
    }
}

/// A deadline comfortably in the future.
pub fn deadline() -> DateTime<Utc> {
    Utc::now() + TimeDelta::days(7)
}
