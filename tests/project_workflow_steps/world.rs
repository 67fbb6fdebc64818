//! Shared world state for project workflow BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use atelier::project::{
    adapters::memory::{
        InMemoryDirectory, InMemoryProjectStore, InMemoryTaskStore, InMemoryWorkspace,
        RecordingDispatcher,
    },
    domain::{
        ActorRole, EmployeeId, EmployeeProfile, TaskId, TenantContext, TenantId,
    },
    services::{CreateProjectRequest, ProjectView, ProjectWorkflowService, WorkflowError},
};
use chrono::{TimeDelta, Utc};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestWorkflowService = ProjectWorkflowService<
    InMemoryProjectStore,
    InMemoryTaskStore,
    InMemoryDirectory,
    RecordingDispatcher,
    DefaultClock,
>;

/// Scenario world for project workflow behaviour tests.
pub struct WorkflowWorld {
    /// The workflow service under test.
    pub service: TestWorkflowService,
    /// Directory collaborator.
    pub directory: InMemoryDirectory,
    /// Scenario tenant.
    pub tenant: TenantId,
    /// The creating executive every scenario starts from.
    pub creator: EmployeeId,
    /// Named people registered so far.
    pub people: HashMap<String, EmployeeId>,
    /// The project under test, once created.
    pub project: Option<ProjectView>,
    /// Named tasks created so far.
    pub tasks: HashMap<String, TaskId>,
    /// A create request staged but not yet submitted.
    pub draft: Option<CreateProjectRequest>,
    /// Result of the last create attempt.
    pub last_create: Option<Result<ProjectView, WorkflowError>>,
    /// Result of the last status change attempt.
    pub last_status: Option<Result<ProjectView, WorkflowError>>,
}

impl WorkflowWorld {
    /// Creates a world with a registered creator and empty state.
    pub fn new() -> Self {
        let workspace = InMemoryWorkspace::new();
        let directory = InMemoryDirectory::new();
        let service = ProjectWorkflowService::new(
            Arc::new(workspace.project_store()),
            Arc::new(workspace.task_store()),
            Arc::new(directory.clone()),
            Arc::new(RecordingDispatcher::new()),
            Arc::new(DefaultClock),
        );
        let creator = EmployeeId::new();
        directory.insert_employee(EmployeeProfile {
            id: creator,
            name: "Petra".to_owned(),
            email: "petra@example.test".to_owned(),
            mobile: "5550100".to_owned(),
            role: ActorRole::Executive,
        });
        Self {
            service,
            directory,
            tenant: TenantId::new(),
            creator,
            people: HashMap::new(),
            project: None,
            tasks: HashMap::new(),
            draft: None,
            last_create: None,
            last_status: None,
        }
    }

    /// Returns the id of a named person, registering them on first use.
    pub fn person(&mut self, name: &str) -> EmployeeId {
        if let Some(existing) = self.people.get(name) {
            return *existing;
        }
        let id = EmployeeId::new();
        self.directory.insert_employee(EmployeeProfile {
            id,
            name: name.to_owned(),
            email: format!("{name}@example.test"),
            mobile: "5550100".to_owned(),
            role: ActorRole::Employee,
        });
        self.people.insert(name.to_owned(), id);
        id
    }

    /// Builds a context for the given user.
    pub fn context_for(&self, user: EmployeeId) -> TenantContext {
        let role = if user == self.creator {
            ActorRole::Executive
        } else {
            ActorRole::Employee
        };
        TenantContext::new(self.tenant, user, role)
    }

    /// Returns the project created in this scenario.
    pub fn project(&self) -> Result<&ProjectView, eyre::Report> {
        self.project
            .as_ref()
            .ok_or_else(|| eyre::eyre!("no project in scenario world"))
    }

    /// A deadline comfortably in the future.
    pub fn deadline() -> chrono::DateTime<Utc> {
        Utc::now() + TimeDelta::days(7)
    }
}

impl Default for WorkflowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> WorkflowWorld {
    WorkflowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
