//! Shared test helpers for in-memory workflow integration tests.

use std::sync::Arc;

use atelier::project::{
    adapters::memory::{
        InMemoryDirectory, InMemoryProjectStore, InMemoryTaskStore, InMemoryWorkspace,
        RecordingDispatcher,
    },
    domain::{
        ActorRole, ClientId, ClientProfile, EmployeeId, EmployeeProfile, PageRequest,
        TenantContext, TenantId,
    },
    services::ProjectWorkflowService,
};
use chrono::{DateTime, TimeDelta, Utc};
use mockable::DefaultClock;
use once_cell::sync::Lazy;
use rstest::fixture;

/// Service type exercised by the integration suite.
pub type TestService = ProjectWorkflowService<
    InMemoryProjectStore,
    InMemoryTaskStore,
    InMemoryDirectory,
    RecordingDispatcher,
    DefaultClock,
>;

/// A deadline shared by every scheduled fixture task.
pub static FIXTURE_DEADLINE: Lazy<DateTime<Utc>> = Lazy::new(|| Utc::now() + TimeDelta::days(14));

/// One tenant's worth of wired-up collaborators.
pub struct Env {
    /// Service under test.
    pub service: TestService,
    /// Backing workspace for direct observation.
    pub workspace: InMemoryWorkspace,
    /// Directory fixtures resolve against.
    pub directory: InMemoryDirectory,
    /// Recording dispatcher.
    pub notifier: RecordingDispatcher,
    /// Tenant of this environment.
    pub tenant: TenantId,
}

impl Env {
    /// Registers an employee with the given role.
    pub fn employee(&self, name: &str, role: ActorRole) -> EmployeeId {
        let id = EmployeeId::new();
        self.directory.insert_employee(EmployeeProfile {
            id,
            name: name.to_owned(),
            email: format!("{name}@example.test"),
            mobile: "5550100".to_owned(),
            role,
        });
        id
    }

    /// Registers a client.
    pub fn client(&self, name: &str) -> ClientId {
        let id = ClientId::new();
        self.directory.insert_client(ClientProfile {
            id,
            name: name.to_owned(),
        });
        id
    }

    /// Builds a context for this environment's tenant.
    pub fn context(&self, user: EmployeeId, role: ActorRole) -> TenantContext {
        TenantContext::new(self.tenant, user, role)
    }
}

/// Provides a fresh environment for each test.
#[fixture]
pub fn env() -> Env {
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
    Env {
        service,
        workspace,
        directory,
        notifier,
        tenant: TenantId::new(),
    }
}

/// First page of a comfortably large window.
pub fn first_page() -> PageRequest {
    PageRequest::new(0, 20).unwrap_or_else(|err| panic!("page request: {err}"))
}
