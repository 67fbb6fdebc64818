//! Given steps for project workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use atelier::project::{
    domain::{LEADER_ROLE, MEMBER_ROLE},
    services::{CreateProjectRequest, CreateTaskRequest, ParticipantSpec},
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a project led by "{leader}" with member "{member}""#)]
fn a_project_with_members(
    world: &mut WorkflowWorld,
    leader: String,
    member: String,
) -> Result<(), eyre::Report> {
    let leader_id = world.person(&leader);
    let member_id = world.person(&member);
    let context = world.context_for(world.creator);

    let request = CreateProjectRequest::new("Pier nine", "Rebuild pier nine", world.creator)
        .with_leaders(vec![leader_id])
        .with_participants(vec![
            ParticipantSpec::new(leader_id, LEADER_ROLE),
            ParticipantSpec::new(member_id, MEMBER_ROLE),
        ]);
    let view = run_async(world.service.create_project(&context, request))
        .wrap_err("create scenario project")?;
    world.project = Some(view);
    Ok(())
}

#[given(r#"a task named "{name}" assigned to "{assignee}""#)]
fn a_task_assigned_to(
    world: &mut WorkflowWorld,
    name: String,
    assignee: String,
) -> Result<(), eyre::Report> {
    let assignee_id = world.person(&assignee);
    let project_id = world.project()?.id;
    let context = world.context_for(world.creator);

    let request = CreateTaskRequest::new(
        project_id,
        name.clone(),
        "scenario task",
        WorkflowWorld::deadline(),
    )
    .with_assignees(vec![assignee_id]);
    let view = run_async(world.service.create_task(&context, request))
        .wrap_err("create scenario task")?;
    world.tasks.insert(name, view.id);
    Ok(())
}

#[given(r#"a draft project whose leader "{leader}" is not a participant"#)]
fn a_draft_with_nonmember_leader(world: &mut WorkflowWorld, leader: String) {
    let leader_id = world.person(&leader);
    world.draft = Some(
        CreateProjectRequest::new("Doomed", "Leader outside participants", world.creator)
            .with_leaders(vec![leader_id]),
    );
}
