//! Project aggregate root.

use super::{
    ClientId, EmployeeId, Participant, ProjectDomainError, ProjectId, ProjectStatus, Task, TaskId,
    TaskStatus, TenantId,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for creating a project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProjectData {
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Creating user.
    pub created_by: EmployeeId,
    /// Optional client the project is delivered for.
    pub client_id: Option<ClientId>,
    /// Group leader ids; each must appear among the participants.
    pub leaders: Vec<EmployeeId>,
    /// Initial participant set.
    pub participants: Vec<Participant>,
}

/// Parameter object for reconstructing a persisted project aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Persisted project identifier.
    pub id: ProjectId,
    /// Persisted owning tenant.
    pub tenant_id: TenantId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: ProjectStatus,
    /// Persisted creating user.
    pub created_by: EmployeeId,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted client reference, if any.
    pub client_id: Option<ClientId>,
    /// Persisted leader set.
    pub leaders: Vec<EmployeeId>,
    /// Persisted participant set.
    pub participants: Vec<Participant>,
    /// Persisted owned-task ids.
    pub task_ids: Vec<TaskId>,
}

/// Project aggregate root: the project row plus its leaders, participants,
/// and owned-task ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    tenant_id: TenantId,
    name: String,
    description: String,
    status: ProjectStatus,
    created_by: EmployeeId,
    created_at: DateTime<Utc>,
    client_id: Option<ClientId>,
    leaders: Vec<EmployeeId>,
    participants: Vec<Participant>,
    task_ids: Vec<TaskId>,
}

impl Project {
    /// Creates a new open project.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyProjectName`] for a blank name,
    /// [`ProjectDomainError::DuplicateParticipant`] when the participant
    /// list names an employee twice, and
    /// [`ProjectDomainError::LeaderNotParticipant`] when a leader id is
    /// missing from the participant list.
    pub fn create(data: NewProjectData, clock: &impl Clock) -> Result<Self, ProjectDomainError> {
        if data.name.trim().is_empty() {
            return Err(ProjectDomainError::EmptyProjectName);
        }

        let mut seen: Vec<EmployeeId> = Vec::with_capacity(data.participants.len());
        for participant in &data.participants {
            if seen.contains(&participant.employee_id()) {
                return Err(ProjectDomainError::DuplicateParticipant(
                    participant.employee_id(),
                ));
            }
            seen.push(participant.employee_id());
        }

        let mut leaders: Vec<EmployeeId> = Vec::with_capacity(data.leaders.len());
        for leader in data.leaders {
            if !seen.contains(&leader) {
                return Err(ProjectDomainError::LeaderNotParticipant { leader });
            }
            if !leaders.contains(&leader) {
                leaders.push(leader);
            }
        }

        Ok(Self {
            id: ProjectId::new(),
            tenant_id: data.tenant_id,
            name: data.name,
            description: data.description,
            status: ProjectStatus::Open,
            created_by: data.created_by,
            created_at: clock.utc(),
            client_id: data.client_id,
            leaders,
            participants: data.participants,
            task_ids: Vec::new(),
        })
    }

    /// Reconstructs a project from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            tenant_id: data.tenant_id,
            name: data.name,
            description: data.description,
            status: data.status,
            created_by: data.created_by,
            created_at: data.created_at,
            client_id: data.client_id,
            leaders: data.leaders,
            participants: data.participants,
            task_ids: data.task_ids,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> EmployeeId {
        self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the client reference, if any.
    #[must_use]
    pub const fn client_id(&self) -> Option<ClientId> {
        self.client_id
    }

    /// Returns the group leader ids.
    #[must_use]
    pub fn leaders(&self) -> &[EmployeeId] {
        &self.leaders
    }

    /// Returns the participant set.
    #[must_use]
    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    /// Returns the owned-task ids.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns true when the user created this project.
    #[must_use]
    pub fn is_creator(&self, user: EmployeeId) -> bool {
        self.created_by == user
    }

    /// Returns true when the user is in the leader set.
    #[must_use]
    pub fn is_leader(&self, user: EmployeeId) -> bool {
        self.leaders.contains(&user)
    }

    /// Returns true when a participant row exists for the employee.
    #[must_use]
    pub fn is_participant(&self, employee: EmployeeId) -> bool {
        self.participants
            .iter()
            .any(|p| p.employee_id() == employee)
    }

    /// Adds an ordinary member unless a row already exists for the employee.
    ///
    /// Returns whether a row was added; a duplicate add is a silent no-op.
    pub fn add_participant(&mut self, employee: EmployeeId) -> bool {
        if self.is_participant(employee) {
            return false;
        }
        self.participants.push(Participant::member(employee));
        true
    }

    /// Removes the participant row for the employee.
    ///
    /// Removal does not touch the leader set or task assignee lists.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::ParticipantNotFound`] when no row
    /// exists for the employee.
    pub fn remove_participant(&mut self, employee: EmployeeId) -> Result<(), ProjectDomainError> {
        let before = self.participants.len();
        self.participants.retain(|p| p.employee_id() != employee);
        if self.participants.len() == before {
            return Err(ProjectDomainError::ParticipantNotFound {
                project: self.id,
                employee,
            });
        }
        Ok(())
    }

    /// Records a task as owned by this project.
    pub fn attach_task(&mut self, task_id: TaskId) {
        if !self.task_ids.contains(&task_id) {
            self.task_ids.push(task_id);
        }
    }

    /// Removes a task from the owned set.
    pub fn detach_task(&mut self, task_id: TaskId) {
        self.task_ids.retain(|id| *id != task_id);
    }

    /// Sets the lifecycle status.
    ///
    /// Close-gating against owned tasks is the caller's responsibility; see
    /// [`Project::ensure_can_close`].
    pub const fn set_status(&mut self, status: ProjectStatus) {
        self.status = status;
    }

    /// Verifies every owned task is closed.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::OpenTasksRemain`] when at least one
    /// task has a status other than closed.
    pub fn ensure_can_close(&self, tasks: &[Task]) -> Result<(), ProjectDomainError> {
        let open = tasks
            .iter()
            .filter(|task| task.status() != TaskStatus::Closed)
            .count();
        if open > 0 {
            return Err(ProjectDomainError::OpenTasksRemain {
                project: self.id,
                open,
            });
        }
        Ok(())
    }
}
