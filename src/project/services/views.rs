//! Denormalized views returned by the workflow service.

use crate::project::domain::{
    ClientId, EmployeeId, EmployeeProfile, Participant, Project, ProjectId, ProjectStatus, Task,
    TaskId, TaskStatus, TenantId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Client display summary attached to project views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    /// Client identifier.
    pub id: ClientId,
    /// Client display name.
    pub name: String,
}

/// Participant summary with directory display attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantView {
    /// Member employee.
    pub employee_id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Role label within the project.
    pub role: String,
    /// Contact email.
    pub email: String,
    /// Contact mobile number.
    pub mobile: String,
}

/// Denormalized project view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    /// Project identifier.
    pub id: ProjectId,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Owning tenant.
    pub tenant_id: TenantId,
    /// Creating user.
    pub created_by: EmployeeId,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Client summary, when the project has a client.
    pub client: Option<ClientSummary>,
    /// Group leader ids.
    pub leader_ids: Vec<EmployeeId>,
    /// Participant summaries.
    pub participants: Vec<ParticipantView>,
}

impl ProjectView {
    /// Assembles a view from the aggregate and directory-resolved profiles.
    ///
    /// Profiles are expected in participant order, as returned by the
    /// directory's batch resolution.
    #[must_use]
    pub fn assemble(
        project: &Project,
        profiles: &[EmployeeProfile],
        client: Option<ClientSummary>,
    ) -> Self {
        let participants = project
            .participants()
            .iter()
            .map(|participant| participant_view(participant, profiles))
            .collect();
        Self {
            id: project.id(),
            name: project.name().to_owned(),
            description: project.description().to_owned(),
            status: project.status(),
            tenant_id: project.tenant_id(),
            created_by: project.created_by(),
            created_at: project.created_at(),
            client,
            leader_ids: project.leaders().to_vec(),
            participants,
        }
    }
}

fn participant_view(participant: &Participant, profiles: &[EmployeeProfile]) -> ParticipantView {
    let profile = profiles
        .iter()
        .find(|profile| profile.id == participant.employee_id());
    ParticipantView {
        employee_id: participant.employee_id(),
        name: profile.map(|p| p.name.clone()).unwrap_or_default(),
        role: participant.role().to_owned(),
        email: profile.map(|p| p.email.clone()).unwrap_or_default(),
        mobile: profile.map(|p| p.mobile.clone()).unwrap_or_default(),
    }
}

/// Denormalized task view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: TaskStatus,
    /// Priority label, if any.
    pub priority: Option<String>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Completion timestamp; present iff the task is closed.
    pub completed_at: Option<DateTime<Utc>>,
    /// Assigning user.
    pub assigned_by: EmployeeId,
    /// Assigned employees.
    pub assignee_ids: Vec<EmployeeId>,
}

impl From<&Task> for TaskView {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            project_id: task.project_id(),
            name: task.name().to_owned(),
            description: task.description().to_owned(),
            status: task.status(),
            priority: task.priority().map(str::to_owned),
            deadline: task.deadline(),
            assigned_at: task.assigned_at(),
            completed_at: task.completed_at(),
            assigned_by: task.assigned_by(),
            assignee_ids: task.assignees().to_vec(),
        }
    }
}
