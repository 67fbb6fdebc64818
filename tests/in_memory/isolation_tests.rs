//! Tenant isolation and deletion guard flows.

use super::helpers::{Env, FIXTURE_DEADLINE, env, first_page};
use atelier::project::{
    domain::{ActorRole, TaskStatus, TenantContext, TenantId, LEADER_ROLE, MEMBER_ROLE},
    services::{CreateProjectRequest, CreateTaskRequest, ErrorKind, ParticipantSpec},
};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_of_another_tenant_is_denied_everywhere(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let member = env.employee("Marco", ActorRole::Employee);
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Locks", "Lock gate overhaul", creator)
                .with_leaders(vec![creator])
                .with_participants(vec![
                    ParticipantSpec::new(creator, LEADER_ROLE),
                    ParticipantSpec::new(member, MEMBER_ROLE),
                ]),
        )
        .await?;
    let task = env
        .service
        .create_task(
            &context,
            CreateTaskRequest::new(project.id, "Gate seals", "Replace seals", *FIXTURE_DEADLINE)
                .with_assignees(vec![member]),
        )
        .await?;

    let foreign = TenantContext::new(TenantId::new(), creator, ActorRole::Admin);

    let read = env.service.get_project(&foreign, project.id).await;
    ensure!(read.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Forbidden));

    let mutate = env
        .service
        .update_task_status(&foreign, task.id, TaskStatus::Closed)
        .await;
    ensure!(mutate.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Forbidden));

    let delete = env.service.delete_project(&foreign, project.id).await;
    ensure!(delete.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Forbidden));

    // Nothing changed for the owning tenant.
    let unchanged = env.service.get_project(&context, project.id).await?;
    ensure!(unchanged.id == project.id);
    let tasks = env
        .service
        .list_tasks_by_project(&context, project.id, first_page())
        .await?;
    ensure!(tasks.items.iter().all(|t| t.status == TaskStatus::Open));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_tasks_cannot_be_deleted(env: Env) -> eyre::Result<()> {
    let creator = env.employee("Petra", ActorRole::Executive);
    let context = env.context(creator, ActorRole::Executive);

    let project = env
        .service
        .create_project(
            &context,
            CreateProjectRequest::new("Locks", "Lock gate overhaul", creator)
                .with_leaders(vec![creator])
                .with_participants(vec![ParticipantSpec::new(creator, LEADER_ROLE)]),
        )
        .await?;
    let task = env
        .service
        .create_task(
            &context,
            CreateTaskRequest::new(project.id, "Gate seals", "Replace seals", *FIXTURE_DEADLINE),
        )
        .await?;

    env.service
        .update_task_status(&context, task.id, TaskStatus::Closed)
        .await?;

    let refused = env.service.delete_task(&context, task.id).await;
    ensure!(refused.as_ref().err().map(|err| err.kind()) == Some(ErrorKind::Validation));

    let listed = env
        .service
        .list_tasks_by_project(&context, project.id, first_page())
        .await?;
    ensure!(listed.total_elements == 1);
    Ok(())
}
