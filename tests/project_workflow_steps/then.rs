//! Then steps for project workflow BDD scenarios.

use super::world::{WorkflowWorld, run_async};
use atelier::project::{
    domain::{PageRequest, ProjectStatus},
    services::ErrorKind,
};
use rstest_bdd_macros::then;

#[then(r#"the project status is "{status}""#)]
fn project_status_is(world: &mut WorkflowWorld, status: String) -> Result<(), eyre::Report> {
    let wanted = ProjectStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("unknown status: {err}"))?;
    let project_id = world.project()?.id;
    let context = world.context_for(world.creator);

    let fetched = run_async(world.service.get_project(&context, project_id))
        .map_err(|err| eyre::eyre!("get project failed: {err}"))?;
    if fetched.status != wanted {
        return Err(eyre::eyre!(
            "expected status {wanted:?}, found {:?}",
            fetched.status
        ));
    }
    Ok(())
}

#[then("the status change is rejected for open tasks")]
fn status_change_rejected(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_status
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing status result in scenario world"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::Validation => Ok(()),
        other => Err(eyre::eyre!("expected a validation error, got {other:?}")),
    }
}

#[then("creation fails with a validation error")]
fn creation_fails_validation(world: &WorkflowWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_create
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing create result in scenario world"))?;
    match result {
        Err(err) if err.kind() == ErrorKind::Validation => Ok(()),
        other => Err(eyre::eyre!("expected a validation error, got {other:?}")),
    }
}

#[then("the tenant has no projects")]
fn tenant_has_no_projects(world: &mut WorkflowWorld) -> Result<(), eyre::Report> {
    let context = world.context_for(world.creator);
    let page = PageRequest::new(0, 10).map_err(|err| eyre::eyre!(err))?;
    let listed = run_async(world.service.list_projects(&context, None, page))
        .map_err(|err| eyre::eyre!("list projects failed: {err}"))?;
    if listed.total_elements != 0 {
        return Err(eyre::eyre!(
            "expected an empty tenant, found {} projects",
            listed.total_elements
        ));
    }
    Ok(())
}

#[then("the project has {count:usize} participants")]
fn project_has_participants(world: &mut WorkflowWorld, count: usize) -> Result<(), eyre::Report> {
    let project_id = world.project()?.id;
    let context = world.context_for(world.creator);
    let fetched = run_async(world.service.get_project(&context, project_id))
        .map_err(|err| eyre::eyre!("get project failed: {err}"))?;
    if fetched.participants.len() != count {
        return Err(eyre::eyre!(
            "expected {count} participants, found {}",
            fetched.participants.len()
        ));
    }
    Ok(())
}
