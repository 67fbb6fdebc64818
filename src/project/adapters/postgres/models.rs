//! Diesel row models and pure row/domain conversions.

use super::schema::{project_leaders, project_participants, projects, task_assignees, tasks};
use crate::project::domain::{
    ClientId, EmployeeId, Participant, ParseProjectStatusError, ParseTaskStatusError,
    PersistedProjectData, PersistedTaskData, Project, ProjectId, ProjectStatus, Task, TaskId,
    TaskStatus, TenantId,
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Query result row for projects.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = projects)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creating user.
    pub created_by: Uuid,
    /// Optional client association.
    pub client_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert model for projects.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = projects)]
pub struct NewProjectRow {
    /// Project identifier.
    pub id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Project name.
    pub name: String,
    /// Project description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Creating user.
    pub created_by: Uuid,
    /// Optional client association.
    pub client_id: Option<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Participant row; queryable and insertable.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_participants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ParticipantRow {
    /// Owning project.
    pub project_id: Uuid,
    /// Member employee.
    pub employee_id: Uuid,
    /// Free-form role label.
    pub role: String,
}

/// Leader row; queryable and insertable.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = project_leaders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct LeaderRow {
    /// Owning project.
    pub project_id: Uuid,
    /// Leader employee.
    pub employee_id: Uuid,
}

/// Query result row for tasks.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Optional priority label.
    pub priority: Option<String>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Assigning user.
    pub assigned_by: Uuid,
}

/// Insert model for tasks.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Owning tenant.
    pub tenant_id: Uuid,
    /// Task name.
    pub name: String,
    /// Task description.
    pub description: String,
    /// Lifecycle status.
    pub status: String,
    /// Optional priority label.
    pub priority: Option<String>,
    /// Deadline timestamp.
    pub deadline: DateTime<Utc>,
    /// Assignment timestamp.
    pub assigned_at: DateTime<Utc>,
    /// Completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
    /// Assigning user.
    pub assigned_by: Uuid,
}

/// Assignee row; queryable and insertable.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = task_assignees)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AssigneeRow {
    /// Owning task.
    pub task_id: Uuid,
    /// Assigned employee.
    pub employee_id: Uuid,
}

/// Splits a project aggregate into its insertable rows.
#[must_use]
pub fn project_rows(project: &Project) -> (NewProjectRow, Vec<ParticipantRow>, Vec<LeaderRow>) {
    let project_uuid = project.id().into_inner();
    let row = NewProjectRow {
        id: project_uuid,
        tenant_id: project.tenant_id().into_inner(),
        name: project.name().to_owned(),
        description: project.description().to_owned(),
        status: project.status().as_str().to_owned(),
        created_by: project.created_by().into_inner(),
        client_id: project.client_id().map(ClientId::into_inner),
        created_at: project.created_at(),
    };
    let participants = project
        .participants()
        .iter()
        .map(|participant| ParticipantRow {
            project_id: project_uuid,
            employee_id: participant.employee_id().into_inner(),
            role: participant.role().to_owned(),
        })
        .collect();
    let leaders = project
        .leaders()
        .iter()
        .map(|leader| LeaderRow {
            project_id: project_uuid,
            employee_id: leader.into_inner(),
        })
        .collect();
    (row, participants, leaders)
}

/// Reassembles a project aggregate from its rows.
///
/// # Errors
///
/// Returns [`ParseProjectStatusError`] for an unknown persisted status.
pub fn assemble_project(
    row: ProjectRow,
    participants: Vec<ParticipantRow>,
    leaders: Vec<LeaderRow>,
    task_ids: Vec<Uuid>,
) -> Result<Project, ParseProjectStatusError> {
    let status = ProjectStatus::try_from(row.status.as_str())?;
    Ok(Project::from_persisted(PersistedProjectData {
        id: ProjectId::from_uuid(row.id),
        tenant_id: TenantId::from_uuid(row.tenant_id),
        name: row.name,
        description: row.description,
        status,
        created_by: EmployeeId::from_uuid(row.created_by),
        created_at: row.created_at,
        client_id: row.client_id.map(ClientId::from_uuid),
        leaders: leaders
            .into_iter()
            .map(|leader| EmployeeId::from_uuid(leader.employee_id))
            .collect(),
        participants: participants
            .into_iter()
            .map(|p| Participant::new(EmployeeId::from_uuid(p.employee_id), p.role))
            .collect(),
        task_ids: task_ids.into_iter().map(TaskId::from_uuid).collect(),
    }))
}

/// Splits a task aggregate into its insertable rows.
#[must_use]
pub fn task_rows(task: &Task) -> (NewTaskRow, Vec<AssigneeRow>) {
    let task_uuid = task.id().into_inner();
    let row = NewTaskRow {
        id: task_uuid,
        project_id: task.project_id().into_inner(),
        tenant_id: task.tenant_id().into_inner(),
        name: task.name().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        priority: task.priority().map(str::to_owned),
        deadline: task.deadline(),
        assigned_at: task.assigned_at(),
        completed_at: task.completed_at(),
        assigned_by: task.assigned_by().into_inner(),
    };
    let assignees = task
        .assignees()
        .iter()
        .map(|assignee| AssigneeRow {
            task_id: task_uuid,
            employee_id: assignee.into_inner(),
        })
        .collect();
    (row, assignees)
}

/// Reassembles a task aggregate from its rows.
///
/// # Errors
///
/// Returns [`ParseTaskStatusError`] for an unknown persisted status.
pub fn assemble_task(
    row: TaskRow,
    assignees: Vec<AssigneeRow>,
) -> Result<Task, ParseTaskStatusError> {
    let status = TaskStatus::try_from(row.status.as_str())?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(row.id),
        project_id: ProjectId::from_uuid(row.project_id),
        tenant_id: TenantId::from_uuid(row.tenant_id),
        name: row.name,
        description: row.description,
        status,
        priority: row.priority,
        deadline: row.deadline,
        assigned_at: row.assigned_at,
        completed_at: row.completed_at,
        assigned_by: EmployeeId::from_uuid(row.assigned_by),
        assignees: assignees
            .into_iter()
            .map(|assignee| EmployeeId::from_uuid(assignee.employee_id))
            .collect(),
    }))
}
