//! Centralized authorization evaluator.
//!
//! Every guarded operation is decided here, as a pure function of the
//! operation kind, the calling [`TenantContext`], and a relationship
//! snapshot of the acting user against the target aggregate. Tenant
//! mismatch is checked first and denies regardless of role.

use super::{ActorRole, EmployeeId, Project, Task, TenantContext, TenantId};
use std::fmt;
use thiserror::Error;

/// Operation kinds subject to authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectAction {
    /// Create a single task (tenant check only).
    CreateTask,
    /// Bulk-schedule tasks (legacy path; leader or admin assigner).
    ScheduleTasks,
    /// Change a task's status.
    UpdateTaskStatus,
    /// Change a project's status.
    UpdateProjectStatus,
    /// Delete a project and its tasks.
    DeleteProject,
    /// Delete a single task.
    DeleteTask,
    /// Add participants to a project.
    AddParticipants,
    /// Remove a participant from a project.
    RemoveParticipant,
    /// Read a project or its task listings (tenant check only).
    ViewProject,
    /// List one employee's tasks within a project.
    ViewEmployeeTasks,
}

impl fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phrase = match self {
            Self::CreateTask => "create tasks",
            Self::ScheduleTasks => "assign tasks",
            Self::UpdateTaskStatus => "update this task",
            Self::UpdateProjectStatus => "update project status",
            Self::DeleteProject => "delete this project group",
            Self::DeleteTask => "delete this task",
            Self::AddParticipants => "add participants",
            Self::RemoveParticipant => "remove participants",
            Self::ViewProject => "view this project",
            Self::ViewEmployeeTasks => "view tasks for this employee",
        };
        write!(f, "{phrase}")
    }
}

/// Snapshot of the acting user's relationship to the target aggregate.
///
/// The role is the acting user's role for ordinary operations; the bulk
/// scheduling path evaluates the *assigning employee's* directory role
/// instead, so the role travels with the snapshot rather than being read
/// from the call context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRelations {
    role: ActorRole,
    is_creator: bool,
    is_leader: bool,
    is_assignee: bool,
    is_assigner: bool,
    is_self: bool,
}

impl ActorRelations {
    /// Builds relations of a user against a project.
    #[must_use]
    pub fn for_project(project: &Project, user: EmployeeId, role: ActorRole) -> Self {
        Self {
            role,
            is_creator: project.is_creator(user),
            is_leader: project.is_leader(user),
            is_assignee: false,
            is_assigner: false,
            is_self: false,
        }
    }

    /// Builds relations of a user against a task and its owning project.
    #[must_use]
    pub fn for_task(task: &Task, project: &Project, user: EmployeeId, role: ActorRole) -> Self {
        Self {
            role,
            is_creator: project.is_creator(user),
            is_leader: project.is_leader(user),
            is_assignee: task.is_assignee(user),
            is_assigner: task.was_assigned_by(user),
            is_self: false,
        }
    }

    /// Builds relations for listing `subject`'s tasks within a project.
    #[must_use]
    pub fn for_employee_tasks(
        project: &Project,
        user: EmployeeId,
        role: ActorRole,
        subject: EmployeeId,
    ) -> Self {
        Self {
            role,
            is_creator: project.is_creator(user),
            is_leader: project.is_leader(user),
            is_assignee: false,
            is_assigner: false,
            is_self: user == subject,
        }
    }

    const fn is_privileged(&self) -> bool {
        self.role.is_privileged()
    }
}

/// Denial reasons produced by the evaluator.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessDenied {
    /// The target belongs to a different tenant than the caller.
    #[error("company access denied")]
    TenantMismatch,

    /// The acting user's role/relationship fails the operation's predicate.
    #[error("not authorized to {0}")]
    NotPermitted(ProjectAction),
}

/// Verifies the caller and the resource belong to the same tenant.
///
/// # Errors
///
/// Returns [`AccessDenied::TenantMismatch`] otherwise, regardless of the
/// caller's role.
pub fn ensure_same_tenant(
    context: &TenantContext,
    resource_tenant: TenantId,
) -> Result<(), AccessDenied> {
    if context.tenant_id() == resource_tenant {
        Ok(())
    } else {
        Err(AccessDenied::TenantMismatch)
    }
}

/// Decides whether an operation may proceed.
///
/// The tenant check runs first and denies for every role, including
/// privileged ones. Each action then requires a fixed combination of the
/// creator/leader/assignee/privileged primitives; there is no per-tenant
/// customization.
///
/// # Errors
///
/// Returns [`AccessDenied::TenantMismatch`] or
/// [`AccessDenied::NotPermitted`] when the operation is denied.
pub fn authorize(
    action: ProjectAction,
    context: &TenantContext,
    resource_tenant: TenantId,
    relations: ActorRelations,
) -> Result<(), AccessDenied> {
    ensure_same_tenant(context, resource_tenant)?;

    let permitted = match action {
        ProjectAction::CreateTask | ProjectAction::ViewProject => true,
        // Deliberately narrower than the other mutations: only the Admin
        // role bypasses the leader requirement here, Executive does not.
        ProjectAction::ScheduleTasks => {
            relations.is_leader || relations.role == ActorRole::Admin
        }
        ProjectAction::UpdateTaskStatus => {
            relations.is_assignee
                || relations.is_creator
                || relations.is_leader
                || relations.is_privileged()
        }
        ProjectAction::UpdateProjectStatus
        | ProjectAction::AddParticipants
        | ProjectAction::RemoveParticipant => {
            relations.is_creator || relations.is_leader || relations.is_privileged()
        }
        ProjectAction::DeleteProject => relations.is_creator || relations.is_privileged(),
        ProjectAction::DeleteTask => {
            relations.is_creator
                || relations.is_leader
                || relations.is_privileged()
                || relations.is_assigner
        }
        ProjectAction::ViewEmployeeTasks => {
            relations.is_privileged()
                || relations.is_self
                || relations.is_leader
                || relations.is_creator
        }
    };

    if permitted {
        Ok(())
    } else {
        Err(AccessDenied::NotPermitted(action))
    }
}
