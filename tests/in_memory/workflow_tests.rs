//! End-to-end workflow flows over the in-memory adapters.

use super::helpers::{Env, FIXTURE_DEADLINE, env, first_page};
use atelier::project::{
    domain::{ActorRole, ProjectStatus, TaskStatus, LEADER_ROLE, MEMBER_ROLE},
    services::{
        CreateProjectRequest, CreateTaskRequest, ErrorKind, ParticipantSpec,
        ScheduleTasksRequest, TaskDraft,
    },
};
use eyre::ensure;
use rstest::rstest;

// The canonical end-to-end flow: create a project with a leader and a
// member, assign a task, close the task, close the project, then remove
// the member without any task re-validation.
#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn full_project_lifecycle(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let leader = env.employee("Lena", ActorRole::Employee);
    let member = env.employee("Marco", ActorRole::Employee);
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Pier nine", "Rebuild pier nine", creator)
                .with_leaders(vec![leader])
                .with_participants(vec![
                    ParticipantSpec::new(leader, LEADER_ROLE),
                    ParticipantSpec::new(member, MEMBER_ROLE),
                ]),
        )
        .await?;

    let task = env
        .service
        .create_task(
            &context,
            CreateTaskRequest::new(project.id, "Deck planking", "Replace planks", *FIXTURE_DEADLINE)
                .with_assignees(vec![member]),
        )
        .await?;
    ensure!(task.status == TaskStatus::Open);

    let member_context = env.context(member, ActorRole::Employee);
    let closed_task = env
        .service
        .update_task_status(&member_context, task.id, TaskStatus::Closed)
        .await?;
    ensure!(closed_task.completed_at.is_some());

    let closed_project = env
        .service
        .update_project_status(&context, project.id, ProjectStatus::Closed)
        .await?;
    ensure!(closed_project.status == ProjectStatus::Closed);

    // Membership maintenance needs no task re-validation after the close.
    env.service
        .remove_participant(&context, project.id, member)
        .await?;
    let after = env.service.get_project(&context, project.id).await?;
    ensure!(after.participants.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_create_leaves_no_rows(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let leader = env.employee("Lena", ActorRole::Employee);
    let context = env.context(creator, ActorRole::Executive);

    let result = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Doomed", "Leader missing from participants", creator)
                .with_leaders(vec![leader]),
        )
        .await;
    ensure!(result.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Validation));

    let listed = env.service.list_projects(&context, None, first_page()).await?;
    ensure!(listed.total_elements == 0);
    ensure!(env.notifier.sent().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_scheduling_is_all_or_nothing(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let leader = env.employee("Lena", ActorRole::Employee);
    let member = env.employee("Marco", ActorRole::Employee);
    let outsider = env.employee("Nils", ActorRole::Employee);
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Pier nine", "Rebuild pier nine", creator)
                .with_leaders(vec![leader])
                .with_participants(vec![
                    ParticipantSpec::new(leader, LEADER_ROLE),
                    ParticipantSpec::new(member, MEMBER_ROLE),
                ]),
        )
        .await?;

    let leader_context = env.context(leader, ActorRole::Employee);
    let result = env
        .service
        .schedule_tasks(
            &leader_context,
            ScheduleTasksRequest::new(
                project.id,
                vec![
                    TaskDraft::new("Pilings", "Drive pilings", *FIXTURE_DEADLINE, "High", leader)
                        .with_assignees(vec![member]),
                    // Second draft names a non-participant assignee.
                    TaskDraft::new("Deck", "Lay decking", *FIXTURE_DEADLINE, "Low", leader)
                        .with_assignees(vec![outsider]),
                ],
            ),
        )
        .await;
    ensure!(result.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::NotFound));

    let listed = env
        .service
        .list_tasks_by_project(&leader_context, project.id, first_page())
        .await?;
    ensure!(listed.total_elements == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn participant_add_is_idempotent_across_calls(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let newcomer = env.employee("Nils", ActorRole::Employee);
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Pier nine", "Rebuild pier nine", creator)
                .with_participants(vec![ParticipantSpec::new(creator, LEADER_ROLE)])
                .with_leaders(vec![creator]),
        )
        .await?;

    env.service
        .add_participants(&context, project.id, &[newcomer])
        .await?;
    env.service
        .add_participants(&context, project.id, &[newcomer])
        .await?;

    let fetched = env.service.get_project(&context, project.id).await?;
    ensure!(fetched.participants.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn client_detach_happens_before_project_delete(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let client = env.client("Harborworks");
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Pier nine", "Rebuild pier nine", creator)
                .with_client(client)
                .with_leaders(vec![creator])
                .with_participants(vec![ParticipantSpec::new(creator, LEADER_ROLE)]),
        )
        .await?;
    ensure!(env.workspace.client_projects(client) == vec![project.id]);

    env.service.delete_project(&context, project.id).await?;
    ensure!(env.workspace.client_projects(client).is_empty());

    let listed = env
        .service
        .list_projects_by_client(&context, client, first_page())
        .await?;
    ensure!(listed.total_elements == 0);
    Ok(())
}
