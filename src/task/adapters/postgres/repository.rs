//! `PostgreSQL` repository implementation for task storage.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        NewTask, PersistedTaskData, Task, TaskId, TaskMutation, TaskPriority, TaskStatus,
        TaskTitle,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::Error as DieselError;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// SQL creating the task table. Safe to apply repeatedly.
const CREATE_TASKS_SQL: &str =
    include_str!("../../../../migrations/2025-02-01-000000_create_tasks/up.sql");

/// Builds a connection pool for the given database URL.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be opened.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<TaskPgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    /// Applies the task schema.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the DDL fails.
    pub async fn migrate(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute(CREATE_TASKS_SQL)
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    /// Removes every row and restarts the identifier sequence.
    ///
    /// Only the seeding tool calls this; the service never hard-deletes.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the statement fails.
    pub async fn truncate(&self) -> TaskRepositoryResult<()> {
        self.run_blocking(|connection| {
            connection
                .batch_execute("TRUNCATE TABLE tasks RESTART IDENTITY")
                .map_err(TaskRepositoryError::persistence)
        })
        .await
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn insert(
        &self,
        task: &NewTask,
        created_at: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let new_row = to_new_row(task, created_at);
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)?;
            row_to_task(row)
        })
        .await
    }

    async fn find_active(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .filter(tasks::deleted_at.is_null())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn list_active(&self) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .filter(tasks::deleted_at.is_null())
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)?;
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn modify_active(
        &self,
        id: TaskId,
        mutation: &TaskMutation,
    ) -> TaskRepositoryResult<Task> {
        let owned = mutation.clone();
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx| {
                // Row lock: a concurrent mutation waits and then sees the
                // committed soft delete or read-only flag.
                let row = tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .filter(tasks::deleted_at.is_null())
                    .select(TaskRow::as_select())
                    .for_update()
                    .first::<TaskRow>(tx)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;

                let mut task = row_to_task(row)?;
                task.apply(&owned)?;

                let changeset = to_changeset(&owned);
                if !changeset.is_empty() {
                    diesel::update(tasks::table.find(id.value()))
                        .set(&changeset)
                        .execute(tx)?;
                }
                Ok(task)
            })
        })
        .await
    }
}

fn to_new_row(task: &NewTask, created_at: DateTime<Utc>) -> NewTaskRow {
    NewTaskRow {
        title: task.title.as_str().to_owned(),
        description: task.description.clone(),
        status: task.status.as_str().to_owned(),
        priority: task.priority.as_str().to_owned(),
        due_date: task.due_date,
        created_at,
        read_only: task.read_only,
    }
}

fn to_changeset(mutation: &TaskMutation) -> TaskChangeset {
    match mutation {
        TaskMutation::Update(changes) => TaskChangeset {
            title: changes.title.as_ref().map(|title| title.as_str().to_owned()),
            description: changes.description.clone(),
            status: changes.status.map(|status| status.as_str().to_owned()),
            priority: changes.priority.map(|priority| priority.as_str().to_owned()),
            due_date: changes.due_date,
            deleted_at: None,
            read_only: changes.read_only,
        },
        TaskMutation::SoftDelete { deleted_at } => TaskChangeset {
            deleted_at: Some(*deleted_at),
            ..TaskChangeset::default()
        },
    }
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        title: persisted_title,
        description,
        status: persisted_status,
        priority: persisted_priority,
        due_date,
        created_at,
        deleted_at,
        read_only,
    } = row;

    let title = TaskTitle::new(persisted_title).map_err(TaskRepositoryError::persistence)?;
    let status =
        TaskStatus::try_from(persisted_status.as_str()).map_err(TaskRepositoryError::persistence)?;
    let priority = TaskPriority::try_from(persisted_priority.as_str())
        .map_err(TaskRepositoryError::persistence)?;

    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_persisted(id),
        title,
        description,
        status,
        priority,
        due_date,
        created_at,
        deleted_at,
        read_only,
    }))
}
