//! Error types for project domain validation.

use super::{EmployeeId, ParseTaskPriorityError, ProjectId, TaskId};
use thiserror::Error;

/// Errors returned while constructing or mutating domain aggregates.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// A group leader was supplied that is not in the participant list.
    #[error("group leader {leader} must be a participant")]
    LeaderNotParticipant {
        /// The offending leader id.
        leader: EmployeeId,
    },

    /// The participant list names the same employee more than once.
    #[error("employee {0} appears more than once in the participant list")]
    DuplicateParticipant(EmployeeId),

    /// No participant row exists for the given (project, employee) pair.
    #[error("employee {employee} is not a participant of project {project}")]
    ParticipantNotFound {
        /// The project searched.
        project: ProjectId,
        /// The employee that was not found.
        employee: EmployeeId,
    },

    /// A task assignee is not a participant of the owning project.
    #[error("employee {employee} is not a participant of project {project}")]
    AssigneeNotParticipant {
        /// The owning project.
        project: ProjectId,
        /// The employee that is not a member.
        employee: EmployeeId,
    },

    /// The project still owns tasks that are not closed.
    #[error("complete all tasks before closing the project ({open} still open)")]
    OpenTasksRemain {
        /// The project being closed.
        project: ProjectId,
        /// Number of tasks not yet closed.
        open: usize,
    },

    /// A closed task may not be deleted.
    #[error("cannot delete completed task {0}")]
    TaskAlreadyClosed(TaskId),

    /// The priority string is outside the recognized set.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),
}
