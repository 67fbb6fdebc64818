//! When steps for project workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use atelier::project::domain::{ProjectStatus, TaskStatus};
use rstest_bdd_macros::when;

#[when(r#""{name}" closes the task "{task}""#)]
fn person_closes_task(
    world: &mut WorkflowWorld,
    name: String,
    task: String,
) -> Result<(), eyre::Report> {
    let user = world.person(&name);
    let task_id = *world
        .tasks
        .get(&task)
        .ok_or_else(|| eyre::eyre!("unknown task '{task}' in scenario world"))?;
    let context = world.context_for(user);

    run_async(
        world
            .service
            .update_task_status(&context, task_id, TaskStatus::Closed),
    )
    .map_err(|err| eyre::eyre!("close task failed: {err}"))?;
    Ok(())
}

#[when(r#"the creator sets the project status to "{status}""#)]
fn creator_sets_project_status(
    world: &mut WorkflowWorld,
    status: String,
) -> Result<(), eyre::Report> {
    let wanted = ProjectStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("unknown status: {err}"))?;
    let project_id = world.project()?.id;
    let context = world.context_for(world.creator);

    world.last_status = Some(run_async(world.service.update_project_status(
        &context,
        project_id,
        wanted,
    )));
    Ok(())
}

#[when("the draft project is created")]
fn the_draft_is_created(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let draft = world
        .draft
        .take()
        .ok_or_else(|| eyre::eyre!("no draft project in scenario world"))?;
    let context = world.context_for(world.creator);
    world.last_create = Some(run_async(world.service.create_project(&context, draft)));
    Ok(())
}

#[when(r#""{name}" is added as a participant twice"#)]
fn person_added_twice(world: &mut WorkflowWorld, name: String) -> Result<(), eyre::Report> {
    let newcomer = world.person(&name);
    let project_id = world.project()?.id;
    let context = world.context_for(world.creator);

    for _ in 0..2 {
        run_async(
            world
                .service
                .add_participants(&context, project_id, &[newcomer]),
        )
        .map_err(|err| eyre::eyre!("add participant failed: {err}"))?;
    }
    Ok(())
}
