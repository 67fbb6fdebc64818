//! In-memory project/task stores over one shared workspace state.
//!
//! Both stores clone the same `Arc<RwLock<..>>` so that mutations spanning
//! a task and its owning project happen under a single write lock,
//! mirroring the transaction boundary of the durable adapter.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::project::{
    domain::{
        ClientId, EmployeeId, Page, PageRequest, Project, ProjectId, ProjectStatus, Task, TaskId,
        TaskStatus, TenantId,
    },
    ports::{
        ProjectStore, ProjectStoreError, ProjectStoreResult, TaskStore, TaskStoreError,
        TaskStoreResult,
    },
};

/// Shared in-memory workspace handing out store handles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWorkspace {
    state: Arc<RwLock<WorkspaceState>>,
}

#[derive(Debug, Default)]
struct WorkspaceState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    client_index: HashMap<ClientId, Vec<ProjectId>>,
}

impl InMemoryWorkspace {
    /// Creates an empty workspace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a project store over this workspace.
    #[must_use]
    pub fn project_store(&self) -> InMemoryProjectStore {
        InMemoryProjectStore {
            state: Arc::clone(&self.state),
        }
    }

    /// Returns a task store over this workspace.
    #[must_use]
    pub fn task_store(&self) -> InMemoryTaskStore {
        InMemoryTaskStore {
            state: Arc::clone(&self.state),
        }
    }

    /// Returns the projects currently associated with a client.
    ///
    /// Test observability for the explicit client-detach step of project
    /// deletion.
    #[must_use]
    pub fn client_projects(&self, client_id: ClientId) -> Vec<ProjectId> {
        self.state
            .read()
            .map(|state| state.client_index.get(&client_id).cloned().unwrap_or_default())
            .unwrap_or_default()
    }
}

/// Thread-safe in-memory project store.
#[derive(Debug, Clone)]
pub struct InMemoryProjectStore {
    state: Arc<RwLock<WorkspaceState>>,
}

/// Thread-safe in-memory task store.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<WorkspaceState>>,
}

fn poisoned_project(err: impl ToString) -> ProjectStoreError {
    ProjectStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn poisoned_task(err: impl ToString) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

fn paginate<T>(items: Vec<T>, page: PageRequest) -> Page<T> {
    let total = u64::try_from(items.len()).unwrap_or(u64::MAX);
    let start = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let take = usize::try_from(page.size()).unwrap_or(usize::MAX);
    let window: Vec<T> = items.into_iter().skip(start).take(take).collect();
    Page::assemble(window, page, total)
}

fn sorted_projects(state: &WorkspaceState, filter: impl Fn(&Project) -> bool) -> Vec<Project> {
    let mut projects: Vec<Project> = state
        .projects
        .values()
        .filter(|project| filter(project))
        .cloned()
        .collect();
    projects.sort_by_key(|project| (project.created_at(), project.id()));
    projects
}

fn sorted_tasks(state: &WorkspaceState, filter: impl Fn(&Task) -> bool) -> Vec<Task> {
    let mut tasks: Vec<Task> = state
        .tasks
        .values()
        .filter(|task| filter(task))
        .cloned()
        .collect();
    tasks.sort_by_key(|task| (task.assigned_at(), task.id()));
    tasks
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn create(&self, project: &Project) -> ProjectStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_project)?;
        if state.projects.contains_key(&project.id()) {
            return Err(ProjectStoreError::DuplicateProject(project.id()));
        }
        if let Some(client_id) = project.client_id() {
            state
                .client_index
                .entry(client_id)
                .or_default()
                .push(project.id());
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn update(&self, project: &Project) -> ProjectStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_project)?;
        if !state.projects.contains_key(&project.id()) {
            return Err(ProjectStoreError::NotFound(project.id()));
        }
        state.projects.insert(project.id(), project.clone());
        Ok(())
    }

    async fn close(&self, project_id: ProjectId) -> ProjectStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_project)?;
        let open = state
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.status() != TaskStatus::Closed)
            .count();
        let project = state
            .projects
            .get_mut(&project_id)
            .ok_or(ProjectStoreError::NotFound(project_id))?;
        if open > 0 {
            return Err(ProjectStoreError::OpenTasksRemain {
                project: project_id,
                open,
            });
        }
        project.set_status(ProjectStatus::Closed);
        Ok(())
    }

    async fn delete(&self, project_id: ProjectId) -> ProjectStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_project)?;
        let Some(project) = state.projects.get(&project_id).cloned() else {
            return Err(ProjectStoreError::NotFound(project_id));
        };

        // Explicit cascade order: owned tasks, client association, project.
        state.tasks.retain(|_, task| task.project_id() != project_id);
        if let Some(client_id) = project.client_id() {
            if let Some(ids) = state.client_index.get_mut(&client_id) {
                ids.retain(|id| *id != project_id);
                if ids.is_empty() {
                    state.client_index.remove(&client_id);
                }
            }
        }
        state.projects.remove(&project_id);
        Ok(())
    }

    async fn find_by_id(&self, project_id: ProjectId) -> ProjectStoreResult<Option<Project>> {
        let state = self.state.read().map_err(poisoned_project)?;
        Ok(state.projects.get(&project_id).cloned())
    }

    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        status: Option<ProjectStatus>,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>> {
        let state = self.state.read().map_err(poisoned_project)?;
        let projects = sorted_projects(&state, |project| {
            project.tenant_id() == tenant_id
                && status.is_none_or(|wanted| project.status() == wanted)
        });
        Ok(paginate(projects, page))
    }

    async fn list_by_client(
        &self,
        tenant_id: TenantId,
        client_id: ClientId,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>> {
        let state = self.state.read().map_err(poisoned_project)?;
        let projects = sorted_projects(&state, |project| {
            project.tenant_id() == tenant_id && project.client_id() == Some(client_id)
        });
        Ok(paginate(projects, page))
    }
}

fn insert_task(state: &mut WorkspaceState, task: &Task) -> TaskStoreResult<()> {
    if state.tasks.contains_key(&task.id()) {
        return Err(TaskStoreError::DuplicateTask(task.id()));
    }
    let project = state
        .projects
        .get_mut(&task.project_id())
        .ok_or(TaskStoreError::ProjectNotFound(task.project_id()))?;
    project.attach_task(task.id());
    state.tasks.insert(task.id(), task.clone());
    Ok(())
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_task)?;
        insert_task(&mut state, task)
    }

    async fn store_all(&self, tasks: &[Task]) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_task)?;

        // Validate the whole batch before touching state.
        for task in tasks {
            if state.tasks.contains_key(&task.id()) {
                return Err(TaskStoreError::DuplicateTask(task.id()));
            }
            if !state.projects.contains_key(&task.project_id()) {
                return Err(TaskStoreError::ProjectNotFound(task.project_id()));
            }
        }
        for task in tasks {
            insert_task(&mut state, task)?;
        }
        Ok(())
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_task)?;
        if !state.tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::NotFound(task.id()));
        }
        state.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, task_id: TaskId) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned_task)?;
        let Some(task) = state.tasks.remove(&task_id) else {
            return Err(TaskStoreError::NotFound(task_id));
        };
        if let Some(project) = state.projects.get_mut(&task.project_id()) {
            project.detach_task(task_id);
        }
        Ok(())
    }

    async fn find_by_id(&self, task_id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(poisoned_task)?;
        Ok(state.tasks.get(&task_id).cloned())
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(poisoned_task)?;
        Ok(sorted_tasks(&state, |task| task.project_id() == project_id))
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>> {
        let state = self.state.read().map_err(poisoned_task)?;
        let tasks = sorted_tasks(&state, |task| task.project_id() == project_id);
        Ok(paginate(tasks, page))
    }

    async fn list_by_assignee(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>> {
        let state = self.state.read().map_err(poisoned_task)?;
        let tasks = sorted_tasks(&state, |task| {
            task.project_id() == project_id && task.is_assignee(employee_id)
        });
        Ok(paginate(tasks, page))
    }
}
