//! `PostgreSQL` store implementations for project/task persistence.

use super::models::{
    AssigneeRow, LeaderRow, NewTaskRow, ParticipantRow, ProjectRow, TaskRow, assemble_project,
    assemble_task, project_rows, task_rows,
};
use super::schema::{project_leaders, project_participants, projects, task_assignees, tasks};
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
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use uuid::Uuid;

/// `PostgreSQL` connection pool type used by the workspace adapters.
pub type WorkspacePgPool = Pool<ConnectionManager<PgConnection>>;

/// Transaction-local error carrier; Diesel errors become persistence
/// errors once the transaction resolves.
enum TxError<E> {
    Diesel(DieselError),
    Store(E),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

fn resolve_project(err: TxError<ProjectStoreError>) -> ProjectStoreError {
    match err {
        TxError::Diesel(inner) => ProjectStoreError::persistence(inner),
        TxError::Store(inner) => inner,
    }
}

fn resolve_task(err: TxError<TaskStoreError>) -> TaskStoreError {
    match err {
        TxError::Diesel(inner) => TaskStoreError::persistence(inner),
        TxError::Store(inner) => inner,
    }
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

/// `PostgreSQL`-backed project store.
#[derive(Debug, Clone)]
pub struct PostgresProjectStore {
    pool: WorkspacePgPool,
}

impl PostgresProjectStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> ProjectStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> ProjectStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(ProjectStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(ProjectStoreError::persistence)?
    }
}

fn load_project(connection: &mut PgConnection, row: ProjectRow) -> ProjectStoreResult<Project> {
    let participants = project_participants::table
        .filter(project_participants::project_id.eq(row.id))
        .select(ParticipantRow::as_select())
        .load::<ParticipantRow>(connection)
        .map_err(ProjectStoreError::persistence)?;
    let leaders = project_leaders::table
        .filter(project_leaders::project_id.eq(row.id))
        .select(LeaderRow::as_select())
        .load::<LeaderRow>(connection)
        .map_err(ProjectStoreError::persistence)?;
    let task_ids = tasks::table
        .filter(tasks::project_id.eq(row.id))
        .order((tasks::assigned_at.asc(), tasks::id.asc()))
        .select(tasks::id)
        .load::<Uuid>(connection)
        .map_err(ProjectStoreError::persistence)?;
    assemble_project(row, participants, leaders, task_ids).map_err(ProjectStoreError::persistence)
}

fn page_window(page: PageRequest) -> (i64, i64) {
    let limit = i64::from(page.size());
    let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);
    (limit, offset)
}

fn load_project_page(
    connection: &mut PgConnection,
    tenant_id: TenantId,
    status: Option<ProjectStatus>,
    client_id: Option<ClientId>,
    page: PageRequest,
) -> ProjectStoreResult<Page<Project>> {
    let tenant_uuid = tenant_id.into_inner();
    let build = |status: Option<ProjectStatus>, client_id: Option<ClientId>| {
        let mut query = projects::table
            .filter(projects::tenant_id.eq(tenant_uuid))
            .into_boxed();
        if let Some(wanted) = status {
            query = query.filter(projects::status.eq(wanted.as_str()));
        }
        if let Some(client) = client_id {
            query = query.filter(projects::client_id.eq(client.into_inner()));
        }
        query
    };

    let total: i64 = build(status, client_id)
        .count()
        .get_result(connection)
        .map_err(ProjectStoreError::persistence)?;

    let (limit, offset) = page_window(page);
    let rows = build(status, client_id)
        .order((projects::created_at.asc(), projects::id.asc()))
        .limit(limit)
        .offset(offset)
        .select(ProjectRow::as_select())
        .load::<ProjectRow>(connection)
        .map_err(ProjectStoreError::persistence)?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(load_project(connection, row)?);
    }
    Ok(Page::assemble(items, page, u64::try_from(total).unwrap_or(0)))
}

#[async_trait]
impl ProjectStore for PostgresProjectStore {
    async fn create(&self, project: &Project) -> ProjectStoreResult<()> {
        let (new_row, participant_rows, leader_rows) = project_rows(project);
        let project_id = project.id();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<ProjectStoreError>, _>(|tx| {
                    diesel::insert_into(projects::table)
                        .values(&new_row)
                        .execute(tx)
                        .map_err(|err| {
                            if is_unique_violation(&err) {
                                TxError::Store(ProjectStoreError::DuplicateProject(project_id))
                            } else {
                                TxError::Diesel(err)
                            }
                        })?;
                    if !participant_rows.is_empty() {
                        diesel::insert_into(project_participants::table)
                            .values(&participant_rows)
                            .execute(tx)?;
                    }
                    if !leader_rows.is_empty() {
                        diesel::insert_into(project_leaders::table)
                            .values(&leader_rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(resolve_project)
        })
        .await
    }

    async fn update(&self, project: &Project) -> ProjectStoreResult<()> {
        let (new_row, participant_rows, leader_rows) = project_rows(project);
        let project_id = project.id();
        let project_uuid = project_id.into_inner();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<ProjectStoreError>, _>(|tx| {
                    let affected =
                        diesel::update(projects::table.filter(projects::id.eq(project_uuid)))
                            .set((
                                projects::name.eq(&new_row.name),
                                projects::description.eq(&new_row.description),
                                projects::status.eq(&new_row.status),
                                projects::client_id.eq(new_row.client_id),
                            ))
                            .execute(tx)?;
                    if affected == 0 {
                        return Err(TxError::Store(ProjectStoreError::NotFound(project_id)));
                    }

                    diesel::delete(
                        project_participants::table
                            .filter(project_participants::project_id.eq(project_uuid)),
                    )
                    .execute(tx)?;
                    if !participant_rows.is_empty() {
                        diesel::insert_into(project_participants::table)
                            .values(&participant_rows)
                            .execute(tx)?;
                    }

                    diesel::delete(
                        project_leaders::table
                            .filter(project_leaders::project_id.eq(project_uuid)),
                    )
                    .execute(tx)?;
                    if !leader_rows.is_empty() {
                        diesel::insert_into(project_leaders::table)
                            .values(&leader_rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(resolve_project)
        })
        .await
    }

    async fn close(&self, project_id: ProjectId) -> ProjectStoreResult<()> {
        let project_uuid = project_id.into_inner();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<ProjectStoreError>, _>(|tx| {
                    let open: i64 = tasks::table
                        .filter(tasks::project_id.eq(project_uuid))
                        .filter(tasks::status.ne(TaskStatus::Closed.as_str()))
                        .count()
                        .get_result(tx)?;
                    if open > 0 {
                        return Err(TxError::Store(ProjectStoreError::OpenTasksRemain {
                            project: project_id,
                            open: usize::try_from(open).unwrap_or(usize::MAX),
                        }));
                    }

                    let affected =
                        diesel::update(projects::table.filter(projects::id.eq(project_uuid)))
                            .set(projects::status.eq(ProjectStatus::Closed.as_str()))
                            .execute(tx)?;
                    if affected == 0 {
                        return Err(TxError::Store(ProjectStoreError::NotFound(project_id)));
                    }
                    Ok(())
                })
                .map_err(resolve_project)
        })
        .await
    }

    async fn delete(&self, project_id: ProjectId) -> ProjectStoreResult<()> {
        let project_uuid = project_id.into_inner();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<ProjectStoreError>, _>(|tx| {
                    // Explicit cascade order: owned tasks, client
                    // association, then the aggregate rows.
                    let task_ids = tasks::table
                        .filter(tasks::project_id.eq(project_uuid))
                        .select(tasks::id)
                        .load::<Uuid>(tx)?;
                    diesel::delete(
                        task_assignees::table.filter(task_assignees::task_id.eq_any(&task_ids)),
                    )
                    .execute(tx)?;
                    diesel::delete(tasks::table.filter(tasks::project_id.eq(project_uuid)))
                        .execute(tx)?;

                    diesel::update(projects::table.filter(projects::id.eq(project_uuid)))
                        .set(projects::client_id.eq(None::<Uuid>))
                        .execute(tx)?;

                    diesel::delete(
                        project_participants::table
                            .filter(project_participants::project_id.eq(project_uuid)),
                    )
                    .execute(tx)?;
                    diesel::delete(
                        project_leaders::table
                            .filter(project_leaders::project_id.eq(project_uuid)),
                    )
                    .execute(tx)?;
                    let affected =
                        diesel::delete(projects::table.filter(projects::id.eq(project_uuid)))
                            .execute(tx)?;
                    if affected == 0 {
                        return Err(TxError::Store(ProjectStoreError::NotFound(project_id)));
                    }
                    Ok(())
                })
                .map_err(resolve_project)
        })
        .await
    }

    async fn find_by_id(&self, project_id: ProjectId) -> ProjectStoreResult<Option<Project>> {
        let project_uuid = project_id.into_inner();
        self.run_blocking(move |connection| {
            let row = projects::table
                .filter(projects::id.eq(project_uuid))
                .select(ProjectRow::as_select())
                .first::<ProjectRow>(connection)
                .optional()
                .map_err(ProjectStoreError::persistence)?;
            row.map(|found| load_project(connection, found)).transpose()
        })
        .await
    }

    async fn list_by_tenant(
        &self,
        tenant_id: TenantId,
        status: Option<ProjectStatus>,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>> {
        self.run_blocking(move |connection| {
            load_project_page(connection, tenant_id, status, None, page)
        })
        .await
    }

    async fn list_by_client(
        &self,
        tenant_id: TenantId,
        client_id: ClientId,
        page: PageRequest,
    ) -> ProjectStoreResult<Page<Project>> {
        self.run_blocking(move |connection| {
            load_project_page(connection, tenant_id, None, Some(client_id), page)
        })
        .await
    }
}

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: WorkspacePgPool,
}

impl PostgresTaskStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: WorkspacePgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

fn insert_task_tx(
    tx: &mut PgConnection,
    task_id: TaskId,
    project_id: ProjectId,
    new_row: &NewTaskRow,
    assignee_rows: &[AssigneeRow],
) -> Result<(), TxError<TaskStoreError>> {
    let owning: i64 = projects::table
        .filter(projects::id.eq(project_id.into_inner()))
        .count()
        .get_result(tx)?;
    if owning == 0 {
        return Err(TxError::Store(TaskStoreError::ProjectNotFound(project_id)));
    }

    diesel::insert_into(tasks::table)
        .values(new_row)
        .execute(tx)
        .map_err(|err| {
            if is_unique_violation(&err) {
                TxError::Store(TaskStoreError::DuplicateTask(task_id))
            } else {
                TxError::Diesel(err)
            }
        })?;
    if !assignee_rows.is_empty() {
        diesel::insert_into(task_assignees::table)
            .values(assignee_rows)
            .execute(tx)?;
    }
    Ok(())
}

fn load_task(connection: &mut PgConnection, row: TaskRow) -> TaskStoreResult<Task> {
    let assignees = task_assignees::table
        .filter(task_assignees::task_id.eq(row.id))
        .select(AssigneeRow::as_select())
        .load::<AssigneeRow>(connection)
        .map_err(TaskStoreError::persistence)?;
    assemble_task(row, assignees).map_err(TaskStoreError::persistence)
}

fn load_tasks(connection: &mut PgConnection, rows: Vec<TaskRow>) -> TaskStoreResult<Vec<Task>> {
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(load_task(connection, row)?);
    }
    Ok(items)
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn store(&self, task: &Task) -> TaskStoreResult<()> {
        let (new_row, assignee_rows) = task_rows(task);
        let task_id = task.id();
        let project_id = task.project_id();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<TaskStoreError>, _>(|tx| {
                    insert_task_tx(tx, task_id, project_id, &new_row, &assignee_rows)
                })
                .map_err(resolve_task)
        })
        .await
    }

    async fn store_all(&self, batch: &[Task]) -> TaskStoreResult<()> {
        let prepared: Vec<(TaskId, ProjectId, NewTaskRow, Vec<AssigneeRow>)> = batch
            .iter()
            .map(|task| {
                let (new_row, assignee_rows) = task_rows(task);
                (task.id(), task.project_id(), new_row, assignee_rows)
            })
            .collect();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<TaskStoreError>, _>(|tx| {
                    for (task_id, project_id, new_row, assignee_rows) in &prepared {
                        insert_task_tx(tx, *task_id, *project_id, new_row, assignee_rows)?;
                    }
                    Ok(())
                })
                .map_err(resolve_task)
        })
        .await
    }

    async fn update(&self, task: &Task) -> TaskStoreResult<()> {
        let (new_row, assignee_rows) = task_rows(task);
        let task_id = task.id();
        let task_uuid = task_id.into_inner();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<TaskStoreError>, _>(|tx| {
                    let affected = diesel::update(tasks::table.filter(tasks::id.eq(task_uuid)))
                        .set((
                            tasks::name.eq(&new_row.name),
                            tasks::description.eq(&new_row.description),
                            tasks::status.eq(&new_row.status),
                            tasks::priority.eq(new_row.priority.as_deref()),
                            tasks::deadline.eq(new_row.deadline),
                            tasks::completed_at.eq(new_row.completed_at),
                        ))
                        .execute(tx)?;
                    if affected == 0 {
                        return Err(TxError::Store(TaskStoreError::NotFound(task_id)));
                    }

                    diesel::delete(
                        task_assignees::table.filter(task_assignees::task_id.eq(task_uuid)),
                    )
                    .execute(tx)?;
                    if !assignee_rows.is_empty() {
                        diesel::insert_into(task_assignees::table)
                            .values(&assignee_rows)
                            .execute(tx)?;
                    }
                    Ok(())
                })
                .map_err(resolve_task)
        })
        .await
    }

    async fn delete(&self, task_id: TaskId) -> TaskStoreResult<()> {
        let task_uuid = task_id.into_inner();

        self.run_blocking(move |connection| {
            connection
                .transaction::<_, TxError<TaskStoreError>, _>(|tx| {
                    diesel::delete(
                        task_assignees::table.filter(task_assignees::task_id.eq(task_uuid)),
                    )
                    .execute(tx)?;
                    let affected =
                        diesel::delete(tasks::table.filter(tasks::id.eq(task_uuid))).execute(tx)?;
                    if affected == 0 {
                        return Err(TxError::Store(TaskStoreError::NotFound(task_id)));
                    }
                    Ok(())
                })
                .map_err(resolve_task)
        })
        .await
    }

    async fn find_by_id(&self, task_id: TaskId) -> TaskStoreResult<Option<Task>> {
        let task_uuid = task_id.into_inner();
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(task_uuid))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(|found| load_task(connection, found)).transpose()
        })
        .await
    }

    async fn find_by_project(&self, project_id: ProjectId) -> TaskStoreResult<Vec<Task>> {
        let project_uuid = project_id.into_inner();
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_uuid))
                .order((tasks::assigned_at.asc(), tasks::id.asc()))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            load_tasks(connection, rows)
        })
        .await
    }

    async fn list_by_project(
        &self,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>> {
        let project_uuid = project_id.into_inner();
        self.run_blocking(move |connection| {
            let total: i64 = tasks::table
                .filter(tasks::project_id.eq(project_uuid))
                .count()
                .get_result(connection)
                .map_err(TaskStoreError::persistence)?;

            let (limit, offset) = page_window(page);
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_uuid))
                .order((tasks::assigned_at.asc(), tasks::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            let items = load_tasks(connection, rows)?;
            Ok(Page::assemble(items, page, u64::try_from(total).unwrap_or(0)))
        })
        .await
    }

    async fn list_by_assignee(
        &self,
        employee_id: EmployeeId,
        project_id: ProjectId,
        page: PageRequest,
    ) -> TaskStoreResult<Page<Task>> {
        let employee_uuid = employee_id.into_inner();
        let project_uuid = project_id.into_inner();
        self.run_blocking(move |connection| {
            let assigned = task_assignees::table
                .filter(task_assignees::employee_id.eq(employee_uuid))
                .select(task_assignees::task_id)
                .load::<Uuid>(connection)
                .map_err(TaskStoreError::persistence)?;

            let total: i64 = tasks::table
                .filter(tasks::project_id.eq(project_uuid))
                .filter(tasks::id.eq_any(&assigned))
                .count()
                .get_result(connection)
                .map_err(TaskStoreError::persistence)?;

            let (limit, offset) = page_window(page);
            let rows = tasks::table
                .filter(tasks::project_id.eq(project_uuid))
                .filter(tasks::id.eq_any(&assigned))
                .order((tasks::assigned_at.asc(), tasks::id.asc()))
                .limit(limit)
                .offset(offset)
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            let items = load_tasks(connection, rows)?;
            Ok(Page::assemble(items, page, u64::try_from(total).unwrap_or(0)))
        })
        .await
    }
}
