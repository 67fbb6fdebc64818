//! Behaviour tests for project/task workflows.

mod project_workflow_steps;

use project_workflow_steps::world::{WorkflowWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/project_workflow.feature",
    name = "Close a project once every task is closed"
)]
#[tokio::test(flavor = "multi_thread")]
async fn close_after_all_tasks_closed(world: WorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_workflow.feature",
    name = "Reject closing while a task is open"
)]
#[tokio::test(flavor = "multi_thread")]
async fn reject_close_with_open_task(world: WorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_workflow.feature",
    name = "Group leaders must be participants"
)]
#[tokio::test(flavor = "multi_thread")]
async fn leaders_must_be_participants(world: WorkflowWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/project_workflow.feature",
    name = "Adding a participant twice changes nothing"
)]
#[tokio::test(flavor = "multi_thread")]
async fn participant_add_is_idempotent(world: WorkflowWorld) {
    let _ = world;
}
