//! Notification content rendering and best-effort dispatch.
//!
//! Titles and bodies are minijinja templates; rendering or delivery
//! failures are logged and swallowed so they never abort the surrounding
//! mutation.

use crate::project::domain::{EmployeeId, Project, Task};
use crate::project::ports::{Notification, NotificationDispatcher};
use minijinja::Environment;
use serde_json::{Map, Value};

const PROJECT_CREATED_TITLE: &str = "Group Created: {{ project }}";
const PROJECT_CREATED_BODY: &str = "{{ description }}";
const TASK_ASSIGNED_TITLE: &str = "New Task Assigned: {{ task }}";
const TASK_ASSIGNED_BODY: &str =
    "You have been assigned a new task: {{ task }} - {{ description }}";

fn render(template: &str, context: &Map<String, Value>) -> Result<String, minijinja::Error> {
    let environment = Environment::new();
    environment.render_str(template, context)
}

fn project_context(project: &Project) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert(
        "project".to_owned(),
        Value::String(project.name().to_owned()),
    );
    context.insert(
        "description".to_owned(),
        Value::String(project.description().to_owned()),
    );
    context
}

fn task_context(task: &Task) -> Map<String, Value> {
    let mut context = Map::new();
    context.insert("task".to_owned(), Value::String(task.name().to_owned()));
    context.insert(
        "description".to_owned(),
        Value::String(task.description().to_owned()),
    );
    context
}

/// Renders the project-created message for one participant.
pub(crate) fn project_created(
    recipient: EmployeeId,
    project: &Project,
) -> Result<Notification, minijinja::Error> {
    let context = project_context(project);
    Ok(Notification {
        recipient,
        title: render(PROJECT_CREATED_TITLE, &context)?,
        body: render(PROJECT_CREATED_BODY, &context)?,
    })
}

/// Renders the task-assigned message for one assignee.
pub(crate) fn task_assigned(
    recipient: EmployeeId,
    task: &Task,
) -> Result<Notification, minijinja::Error> {
    let context = task_context(task);
    Ok(Notification {
        recipient,
        title: render(TASK_ASSIGNED_TITLE, &context)?,
        body: render(TASK_ASSIGNED_BODY, &context)?,
    })
}

/// Dispatches a rendered notification, logging any failure.
pub(crate) async fn dispatch<N>(notifier: &N, rendered: Result<Notification, minijinja::Error>)
where
    N: NotificationDispatcher,
{
    match rendered {
        Ok(notification) => {
            if let Err(err) = notifier.send(&notification).await {
                tracing::warn!(
                    recipient = %notification.recipient,
                    error = %err,
                    "failed to send notification",
                );
            }
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to render notification");
        }
    }
}
