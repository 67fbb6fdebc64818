//! Application services for project/task workflow orchestration.

mod notifications;
mod views;
mod workflow;

pub use views::{ClientSummary, ParticipantView, ProjectView, TaskView};
pub use workflow::{
    CreateProjectRequest, CreateTaskRequest, ErrorKind, ParticipantSpec, ProjectWorkflowService,
    ScheduleTasksRequest, TaskDraft, WorkflowError, WorkflowResult,
};
