//! Workflow orchestration service for projects and tasks.
//!
//! Composes the stores, the directory, and the notification dispatcher to
//! implement every project/task use case. Each operation takes an explicit
//! [`TenantContext`], runs the authorization evaluator before mutating,
//! persists through a single atomic store operation, and dispatches
//! notifications best-effort afterwards.

use super::notifications;
use super::views::{ClientSummary, ProjectView, TaskView};
use crate::project::{
    domain::{
        AccessDenied, ActorRelations, ClientId, EmployeeId, NewProjectData, NewTaskData, Page,
        PageRequest, Participant, Project, ProjectAction, ProjectDomainError, ProjectId,
        ProjectStatus, Task, TaskId, TaskPriority, TaskStatus, TenantContext, authorize,
        ensure_same_tenant,
    },
    ports::{
        DirectoryError, EmployeeDirectory, NotificationDispatcher, ProjectStore,
        ProjectStoreError, TaskStore, TaskStoreError,
    },
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Participant entry supplied to project creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantSpec {
    /// Member employee.
    pub employee_id: EmployeeId,
    /// Free-form role label; "Leader" carries leader semantics.
    pub role: String,
}

impl ParticipantSpec {
    /// Creates a participant entry.
    #[must_use]
    pub fn new(employee_id: EmployeeId, role: impl Into<String>) -> Self {
        Self {
            employee_id,
            role: role.into(),
        }
    }
}

/// Request payload for creating a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
    created_by: EmployeeId,
    client_id: Option<ClientId>,
    leaders: Vec<EmployeeId>,
    participants: Vec<ParticipantSpec>,
}

impl CreateProjectRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        created_by: EmployeeId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            created_by,
            client_id: None,
            leaders: Vec::new(),
            participants: Vec::new(),
        }
    }

    /// Sets the client the project is delivered for.
    #[must_use]
    pub const fn with_client(mut self, client_id: ClientId) -> Self {
        self.client_id = Some(client_id);
        self
    }

    /// Sets the group leader ids.
    #[must_use]
    pub fn with_leaders(mut self, leaders: impl IntoIterator<Item = EmployeeId>) -> Self {
        self.leaders = leaders.into_iter().collect();
        self
    }

    /// Sets the initial participant entries.
    #[must_use]
    pub fn with_participants(
        mut self,
        participants: impl IntoIterator<Item = ParticipantSpec>,
    ) -> Self {
        self.participants = participants.into_iter().collect();
        self
    }
}

/// Request payload for creating a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    project_id: ProjectId,
    name: String,
    description: String,
    deadline: DateTime<Utc>,
    priority: Option<String>,
    assignees: Vec<EmployeeId>,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(
        project_id: ProjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            project_id,
            name: name.into(),
            description: description.into(),
            deadline,
            priority: None,
            assignees: Vec::new(),
        }
    }

    /// Sets the free-form priority label.
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the assigned employees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = EmployeeId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }
}

/// One task entry of a bulk scheduling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    name: String,
    description: String,
    deadline: DateTime<Utc>,
    priority: String,
    assigned_by: EmployeeId,
    assignees: Vec<EmployeeId>,
}

impl TaskDraft {
    /// Creates a draft with required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        deadline: DateTime<Utc>,
        priority: impl Into<String>,
        assigned_by: EmployeeId,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            deadline,
            priority: priority.into(),
            assigned_by,
            assignees: Vec::new(),
        }
    }

    /// Sets the assigned employees.
    #[must_use]
    pub fn with_assignees(mut self, assignees: impl IntoIterator<Item = EmployeeId>) -> Self {
        self.assignees = assignees.into_iter().collect();
        self
    }
}

/// Request payload for the legacy bulk scheduling path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTasksRequest {
    project_id: ProjectId,
    drafts: Vec<TaskDraft>,
}

impl ScheduleTasksRequest {
    /// Creates a bulk request for a project.
    #[must_use]
    pub fn new(project_id: ProjectId, drafts: impl IntoIterator<Item = TaskDraft>) -> Self {
        Self {
            project_id,
            drafts: drafts.into_iter().collect(),
        }
    }
}

/// Failure classification exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity does not exist.
    NotFound,
    /// Tenant mismatch or failed permission predicate.
    Forbidden,
    /// Structurally invalid input or violated business rule.
    Validation,
    /// Storage-level uniqueness violation.
    Conflict,
    /// Infrastructure failure.
    Internal,
}

/// Service-level errors for workflow operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The project was not found.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Authorization denied the operation.
    #[error(transparent)]
    Access(#[from] AccessDenied),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// Directory resolution failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// Project store operation failed.
    #[error(transparent)]
    ProjectStore(#[from] ProjectStoreError),

    /// Task store operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskStoreError),
}

impl WorkflowError {
    /// Classifies this failure into the caller-facing taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::ProjectNotFound(_) | Self::TaskNotFound(_) => ErrorKind::NotFound,
            Self::Access(_) => ErrorKind::Forbidden,
            Self::Domain(err) => match err {
                ProjectDomainError::ParticipantNotFound { .. }
                | ProjectDomainError::AssigneeNotParticipant { .. } => ErrorKind::NotFound,
                _ => ErrorKind::Validation,
            },
            Self::Directory(err) => match err {
                DirectoryError::EmployeeNotFound(_) | DirectoryError::ClientNotFound(_) => {
                    ErrorKind::NotFound
                }
                DirectoryError::Lookup(_) => ErrorKind::Internal,
            },
            Self::ProjectStore(err) => match err {
                ProjectStoreError::NotFound(_) => ErrorKind::NotFound,
                ProjectStoreError::DuplicateProject(_) => ErrorKind::Conflict,
                ProjectStoreError::OpenTasksRemain { .. } => ErrorKind::Validation,
                ProjectStoreError::Persistence(_) => ErrorKind::Internal,
            },
            Self::TaskStore(err) => match err {
                TaskStoreError::NotFound(_) | TaskStoreError::ProjectNotFound(_) => {
                    ErrorKind::NotFound
                }
                TaskStoreError::DuplicateTask(_) => ErrorKind::Conflict,
                TaskStoreError::Persistence(_) => ErrorKind::Internal,
            },
        }
    }
}

/// Result type for workflow service operations.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Project/task workflow orchestration service.
#[derive(Clone)]
pub struct ProjectWorkflowService<P, T, D, N, C>
where
    P: ProjectStore,
    T: TaskStore,
    D: EmployeeDirectory,
    N: NotificationDispatcher,
    C: Clock + Send + Sync,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    directory: Arc<D>,
    notifier: Arc<N>,
    clock: Arc<C>,
}

impl<P, T, D, N, C> ProjectWorkflowService<P, T, D, N, C>
where
    P: ProjectStore,
    T: TaskStore,
    D: EmployeeDirectory,
    N: NotificationDispatcher,
    C: Clock + Send + Sync,
{
    /// Creates a new workflow service.
    #[must_use]
    pub const fn new(
        projects: Arc<P>,
        tasks: Arc<T>,
        directory: Arc<D>,
        notifier: Arc<N>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            projects,
            tasks,
            directory,
            notifier,
            clock,
        }
    }

    async fn load_project(&self, project_id: ProjectId) -> WorkflowResult<Project> {
        self.projects
            .find_by_id(project_id)
            .await?
            .ok_or(WorkflowError::ProjectNotFound(project_id))
    }

    async fn load_task(&self, task_id: TaskId) -> WorkflowResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(WorkflowError::TaskNotFound(task_id))
    }

    async fn project_view(&self, project: &Project) -> WorkflowResult<ProjectView> {
        let participant_ids: Vec<EmployeeId> = project
            .participants()
            .iter()
            .map(Participant::employee_id)
            .collect();
        let profiles = self.directory.resolve_employees(&participant_ids).await?;
        let client = match project.client_id() {
            Some(client_id) => {
                let profile = self.directory.resolve_client(client_id).await?;
                Some(ClientSummary {
                    id: profile.id,
                    name: profile.name,
                })
            }
            None => None,
        };
        Ok(ProjectView::assemble(project, &profiles, client))
    }

    /// Creates a project with its initial leader/participant set.
    ///
    /// All directory resolution and invariant checks run before the single
    /// atomic store write; a failed call persists nothing. Notifications go
    /// out afterwards, independently per participant, best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when a referenced client or employee does
    /// not exist, when a leader is missing from the participant list, or
    /// when persistence fails.
    pub async fn create_project(
        &self,
        context: &TenantContext,
        request: CreateProjectRequest,
    ) -> WorkflowResult<ProjectView> {
        let CreateProjectRequest {
            name,
            description,
            created_by,
            client_id,
            leaders,
            participants,
        } = request;

        let client = match client_id {
            Some(id) => {
                let profile = self.directory.resolve_client(id).await?;
                Some(ClientSummary {
                    id: profile.id,
                    name: profile.name,
                })
            }
            None => None,
        };

        self.directory.resolve_employees(&leaders).await?;
        let participant_ids: Vec<EmployeeId> =
            participants.iter().map(|spec| spec.employee_id).collect();
        let profiles = self.directory.resolve_employees(&participant_ids).await?;

        let project = Project::create(
            NewProjectData {
                tenant_id: context.tenant_id(),
                name,
                description,
                created_by,
                client_id,
                leaders,
                participants: participants
                    .into_iter()
                    .map(|spec| Participant::new(spec.employee_id, spec.role))
                    .collect(),
            },
            &*self.clock,
        )?;

        self.projects.create(&project).await?;

        for participant in project.participants() {
            notifications::dispatch(
                &*self.notifier,
                notifications::project_created(participant.employee_id(), &project),
            )
            .await;
        }

        Ok(ProjectView::assemble(&project, &profiles, client))
    }

    /// Creates a single task under a project.
    ///
    /// The task enters at [`TaskStatus::Open`] with the caller as the
    /// assigning user. Assignees are resolved for existence only; unlike
    /// the bulk scheduling path, project membership is not required here.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] on tenant mismatch, unresolved assignees,
    /// or persistence failure.
    pub async fn create_task(
        &self,
        context: &TenantContext,
        request: CreateTaskRequest,
    ) -> WorkflowResult<TaskView> {
        let CreateTaskRequest {
            project_id,
            name,
            description,
            deadline,
            priority,
            assignees,
        } = request;

        let project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::CreateTask,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;

        if !assignees.is_empty() {
            self.directory.resolve_employees(&assignees).await?;
        }

        let task = Task::create(
            NewTaskData {
                project_id: project.id(),
                tenant_id: project.tenant_id(),
                name,
                description,
                priority,
                deadline,
                assigned_by: context.user_id(),
                assignees,
            },
            TaskStatus::Open,
            &*self.clock,
        )?;

        self.tasks.store(&task).await?;
        Ok(TaskView::from(&task))
    }

    /// Bulk-schedules tasks against a project (legacy path, stricter).
    ///
    /// Every assignee must already be a participant, every draft's
    /// assigning user must be a current leader or hold the Admin directory
    /// role, and priorities must be recognized. Tasks enter at
    /// [`TaskStatus::Pending`] and persist all-or-nothing; one notification
    /// per assignee goes out afterwards, best-effort.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when any draft fails validation or
    /// authorization; no task is persisted in that case.
    pub async fn schedule_tasks(
        &self,
        context: &TenantContext,
        request: ScheduleTasksRequest,
    ) -> WorkflowResult<Vec<TaskView>> {
        let ScheduleTasksRequest { project_id, drafts } = request;

        let project = self.load_project(project_id).await?;
        ensure_same_tenant(context, project.tenant_id())?;

        let mut prepared = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let TaskDraft {
                name,
                description,
                deadline,
                priority,
                assigned_by,
                assignees,
            } = draft;

            TaskPriority::try_from(priority.as_str()).map_err(ProjectDomainError::from)?;

            let assigner = self.directory.resolve_employee(assigned_by).await?;
            authorize(
                ProjectAction::ScheduleTasks,
                context,
                project.tenant_id(),
                ActorRelations::for_project(&project, assigned_by, assigner.role),
            )?;

            for assignee in &assignees {
                if !project.is_participant(*assignee) {
                    return Err(ProjectDomainError::AssigneeNotParticipant {
                        project: project.id(),
                        employee: *assignee,
                    }
                    .into());
                }
            }

            prepared.push(Task::create(
                NewTaskData {
                    project_id: project.id(),
                    tenant_id: project.tenant_id(),
                    name,
                    description,
                    priority: Some(priority),
                    deadline,
                    assigned_by,
                    assignees,
                },
                TaskStatus::Pending,
                &*self.clock,
            )?);
        }

        self.tasks.store_all(&prepared).await?;

        for task in &prepared {
            for assignee in task.assignees() {
                notifications::dispatch(
                    &*self.notifier,
                    notifications::task_assigned(*assignee, task),
                )
                .await;
            }
        }

        Ok(prepared.iter().map(TaskView::from).collect())
    }

    /// Sets a task's status, keeping the completion timestamp coupled.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the task does not exist, the caller
    /// fails the permission predicate, or persistence fails.
    pub async fn update_task_status(
        &self,
        context: &TenantContext,
        task_id: TaskId,
        status: TaskStatus,
    ) -> WorkflowResult<TaskView> {
        let mut task = self.load_task(task_id).await?;
        let project = self.load_project(task.project_id()).await?;
        authorize(
            ProjectAction::UpdateTaskStatus,
            context,
            task.tenant_id(),
            ActorRelations::for_task(&task, &project, context.user_id(), context.role()),
        )?;

        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        Ok(TaskView::from(&task))
    }

    /// Sets a project's status.
    ///
    /// Closing is gated on every owned task being closed; the condition is
    /// pre-checked for a precise error and re-verified atomically by the
    /// store when the status is written.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project does not exist, the
    /// caller fails the permission predicate, or an owned task is still
    /// open.
    pub async fn update_project_status(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
        status: ProjectStatus,
    ) -> WorkflowResult<ProjectView> {
        let mut project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::UpdateProjectStatus,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;

        if status == ProjectStatus::Closed {
            let owned = self.tasks.find_by_project(project_id).await?;
            project.ensure_can_close(&owned)?;
            self.projects.close(project_id).await?;
            project.set_status(ProjectStatus::Closed);
        } else {
            project.set_status(status);
            self.projects.update(&project).await?;
        }

        self.project_view(&project).await
    }

    /// Deletes a project with its explicit cascade.
    ///
    /// Owned tasks are deleted first, then the client association is
    /// detached, then the project itself — all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project does not exist or the
    /// caller is neither the creator nor privileged.
    pub async fn delete_project(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
    ) -> WorkflowResult<()> {
        let project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::DeleteProject,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;

        self.projects.delete(project_id).await?;
        Ok(())
    }

    /// Deletes a task that is not yet closed.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the task does not exist, the caller
    /// fails the permission predicate, or the task is closed.
    pub async fn delete_task(
        &self,
        context: &TenantContext,
        task_id: TaskId,
    ) -> WorkflowResult<()> {
        let task = self.load_task(task_id).await?;
        let project = self.load_project(task.project_id()).await?;
        authorize(
            ProjectAction::DeleteTask,
            context,
            task.tenant_id(),
            ActorRelations::for_task(&task, &project, context.user_id(), context.role()),
        )?;

        if task.status() == TaskStatus::Closed {
            return Err(ProjectDomainError::TaskAlreadyClosed(task_id).into());
        }

        self.tasks.delete(task_id).await?;
        Ok(())
    }

    /// Adds employees as ordinary members.
    ///
    /// Employees that already hold a participant row are skipped silently.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project or an employee does not
    /// exist, or the caller fails the permission predicate.
    pub async fn add_participants(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
        employee_ids: &[EmployeeId],
    ) -> WorkflowResult<()> {
        let mut project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::AddParticipants,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;

        self.directory.resolve_employees(employee_ids).await?;

        let mut changed = false;
        for employee_id in employee_ids {
            changed |= project.add_participant(*employee_id);
        }
        if changed {
            self.projects.update(&project).await?;
        }
        Ok(())
    }

    /// Removes a participant row.
    ///
    /// The leader set and task assignee lists are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project, employee, or participant
    /// row does not exist, or the caller fails the permission predicate.
    pub async fn remove_participant(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
        employee_id: EmployeeId,
    ) -> WorkflowResult<()> {
        let mut project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::RemoveParticipant,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;

        self.directory.resolve_employee(employee_id).await?;
        project.remove_participant(employee_id)?;
        self.projects.update(&project).await?;
        Ok(())
    }

    /// Returns one project as a denormalized view.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project does not exist or belongs
    /// to a different tenant.
    pub async fn get_project(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
    ) -> WorkflowResult<ProjectView> {
        let project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::ViewProject,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;
        self.project_view(&project).await
    }

    /// Lists the caller's tenant's projects, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the store or view assembly fails.
    pub async fn list_projects(
        &self,
        context: &TenantContext,
        status: Option<ProjectStatus>,
        page: PageRequest,
    ) -> WorkflowResult<Page<ProjectView>> {
        let projects = self
            .projects
            .list_by_tenant(context.tenant_id(), status, page)
            .await?;
        self.view_page(projects).await
    }

    /// Lists a client's projects within the caller's tenant.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the store or view assembly fails.
    pub async fn list_projects_by_client(
        &self,
        context: &TenantContext,
        client_id: ClientId,
        page: PageRequest,
    ) -> WorkflowResult<Page<ProjectView>> {
        let projects = self
            .projects
            .list_by_client(context.tenant_id(), client_id, page)
            .await?;
        self.view_page(projects).await
    }

    /// Lists a project's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project does not exist or belongs
    /// to a different tenant.
    pub async fn list_tasks_by_project(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
        page: PageRequest,
    ) -> WorkflowResult<Page<TaskView>> {
        let project = self.load_project(project_id).await?;
        authorize(
            ProjectAction::ViewProject,
            context,
            project.tenant_id(),
            ActorRelations::for_project(&project, context.user_id(), context.role()),
        )?;
        let tasks = self.tasks.list_by_project(project_id, page).await?;
        Ok(tasks.map(|task| TaskView::from(&task)))
    }

    /// Lists the tasks assigned to one employee within a project.
    ///
    /// Restricted to privileged roles, the employee themself, a leader, or
    /// the project creator.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError`] when the project or employee does not
    /// exist, or the caller fails the permission predicate.
    pub async fn list_tasks_by_employee(
        &self,
        context: &TenantContext,
        project_id: ProjectId,
        employee_id: EmployeeId,
        page: PageRequest,
    ) -> WorkflowResult<Page<TaskView>> {
        let project = self.load_project(project_id).await?;
        ensure_same_tenant(context, project.tenant_id())?;
        self.directory.resolve_employee(employee_id).await?;
        authorize(
            ProjectAction::ViewEmployeeTasks,
            context,
            project.tenant_id(),
            ActorRelations::for_employee_tasks(
                &project,
                context.user_id(),
                context.role(),
                employee_id,
            ),
        )?;

        let tasks = self
            .tasks
            .list_by_assignee(employee_id, project_id, page)
            .await?;
        Ok(tasks.map(|task| TaskView::from(&task)))
    }

    async fn view_page(&self, projects: Page<Project>) -> WorkflowResult<Page<ProjectView>> {
        let Page {
            items,
            page,
            size,
            total_elements,
            total_pages,
        } = projects;
        let mut views = Vec::with_capacity(items.len());
        for project in &items {
            views.push(self.project_view(project).await?);
        }
        Ok(Page {
            items: views,
            page,
            size,
            total_elements,
            total_pages,
        })
    }
}
