//! Task aggregate root.

use super::{EmployeeId, ProjectDomainError, ProjectId, TaskId, TaskStatus, TenantId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Input for creating a task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning tenant; always the owning project's tenant.
    pub tenant_id: TenantId,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Free-form priority label, if any.
    pub priority: Option<String>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
    /// User assigning the task.
    pub assigned_by: EmployeeId,
    /// Assigned employees.
    pub assignees: Vec<EmployeeId>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owning project.
    pub project_id: ProjectId,
    /// Persisted owning tenant.
    pub tenant_id: TenantId,
    /// Persisted name.
    pub name: String,
    /// Persisted description.
    pub description: String,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted priority label, if any.
    pub priority: Option<String>,
    /// Persisted deadline.
    pub deadline: DateTime<Utc>,
    /// Persisted assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Persisted completion timestamp; set iff the status is closed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted assigning user.
    pub assigned_by: EmployeeId,
    /// Persisted assignee set.
    pub assignees: Vec<EmployeeId>,
}

/// Task aggregate root.
///
/// The completion timestamp is coupled to the status: it is set exactly
/// while the task is closed and cleared again on reopen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    tenant_id: TenantId,
    name: String,
    description: String,
    status: TaskStatus,
    priority: Option<String>,
    deadline: DateTime<Utc>,
    assigned_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
    assigned_by: EmployeeId,
    assignees: Vec<EmployeeId>,
}

impl Task {
    /// Creates a new task with the given entry status.
    ///
    /// The interactive path enters at [`TaskStatus::Open`], the bulk
    /// scheduling path at [`TaskStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyTaskName`] for a blank name.
    pub fn create(
        data: NewTaskData,
        entry_status: TaskStatus,
        clock: &impl Clock,
    ) -> Result<Self, ProjectDomainError> {
        if data.name.trim().is_empty() {
            return Err(ProjectDomainError::EmptyTaskName);
        }

        let now = clock.utc();
        let completed_at = (entry_status == TaskStatus::Closed).then_some(now);
        let mut assignees: Vec<EmployeeId> = Vec::with_capacity(data.assignees.len());
        for assignee in data.assignees {
            if !assignees.contains(&assignee) {
                assignees.push(assignee);
            }
        }

        Ok(Self {
            id: TaskId::new(),
            project_id: data.project_id,
            tenant_id: data.tenant_id,
            name: data.name,
            description: data.description,
            status: entry_status,
            priority: data.priority,
            deadline: data.deadline,
            assigned_at: now,
            completed_at,
            assigned_by: data.assigned_by,
            assignees,
        })
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            project_id: data.project_id,
            tenant_id: data.tenant_id,
            name: data.name,
            description: data.description,
            status: data.status,
            priority: data.priority,
            deadline: data.deadline,
            assigned_at: data.assigned_at,
            completed_at: data.completed_at,
            assigned_by: data.assigned_by,
            assignees: data.assignees,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning tenant.
    #[must_use]
    pub const fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    /// Returns the task name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority label, if any.
    #[must_use]
    pub fn priority(&self) -> Option<&str> {
        self.priority.as_deref()
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the assignment timestamp.
    #[must_use]
    pub const fn assigned_at(&self) -> DateTime<Utc> {
        self.assigned_at
    }

    /// Returns the completion timestamp; present iff the task is closed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the assigning user.
    #[must_use]
    pub const fn assigned_by(&self) -> EmployeeId {
        self.assigned_by
    }

    /// Returns the assignee set.
    #[must_use]
    pub fn assignees(&self) -> &[EmployeeId] {
        &self.assignees
    }

    /// Returns true when the employee is assigned to this task.
    #[must_use]
    pub fn is_assignee(&self, employee: EmployeeId) -> bool {
        self.assignees.contains(&employee)
    }

    /// Returns true when the user originally assigned this task.
    #[must_use]
    pub fn was_assigned_by(&self, user: EmployeeId) -> bool {
        self.assigned_by == user
    }

    /// Sets the status and keeps the completion timestamp coupled to it.
    ///
    /// Entering the closed status stamps the completion time; any other
    /// status (including a reopen) clears it.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.completed_at = (status == TaskStatus::Closed).then(|| clock.utc());
    }
}
