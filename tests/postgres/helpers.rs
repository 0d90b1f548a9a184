//! Shared helpers for `PostgreSQL` integration tests.

use std::sync::OnceLock;

use chrono::{TimeZone, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use eyre::{Result, WrapErr, eyre};
use pg_embedded_setup_unpriv::{ClusterHandle, TestCluster};
use rstest::fixture;
use taskdesk::task::{
    adapters::postgres::{PostgresTaskRepository, build_pool},
    domain::{NewTask, Task, TaskId, TaskPriority, TaskStatus, TaskTitle},
    ports::TaskRepository,
};
use tokio::runtime::Runtime;
use uuid::Uuid;

/// SQL creating the task table.
const CREATE_TASKS_SQL: &str =
    include_str!("../../migrations/2025-02-01-000000_create_tasks/up.sql");

/// Template database name for the pre-migrated schema.
const TEMPLATE_DB: &str = "taskdesk_test_template";

/// Connections per test database; the race tests need more than one.
const POOL_SIZE: u32 = 4;

static CLUSTER: OnceLock<Option<ClusterHandle>> = OnceLock::new();

/// Returns the shared cluster, or `None` when it cannot be started here.
#[expect(
    clippy::print_stderr,
    reason = "Skipped suites report why on stderr"
)]
fn shared_cluster() -> Option<&'static ClusterHandle> {
    CLUSTER
        .get_or_init(|| match TestCluster::new_split() {
            Ok((cluster, guard)) => {
                // The guard is `!Send`; the shared cluster lives for the whole process.
                std::mem::forget(guard);
                Some(cluster)
            }
            Err(err) => {
                eprintln!("SKIP-TEST-CLUSTER: failed to start PostgreSQL: {err}");
                None
            }
        })
        .as_ref()
}

fn ensure_template(cluster: &ClusterHandle) -> Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|err| eyre!("{err}"))?;
            conn.batch_execute(CREATE_TASKS_SQL)
                .map_err(|err| eyre!("schema error: {err}"))?;
            Ok(())
        })
        .map_err(|err| eyre!("template setup failed: {err}"))
}

/// Drops the per-test database once everything holding a connection is gone.
struct DropDatabase {
    cluster: &'static ClusterHandle,
    name: String,
}

impl Drop for DropDatabase {
    #[expect(
        clippy::print_stderr,
        reason = "Test cleanup warnings are informational"
    )]
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.name.as_str()) {
            eprintln!("Warning: failed to drop test database {}: {err}", self.name);
        }
    }
}

/// A fresh database copied from the template, with a repository over it.
///
/// Field order matters: the repository and its pool are dropped before the
/// database is.
pub struct TestDatabase {
    pub repository: PostgresTaskRepository,
    pub runtime: Runtime,
    url: String,
    _cleanup: DropDatabase,
}

impl TestDatabase {
    fn create(cluster: &'static ClusterHandle) -> Result<Self> {
        ensure_template(cluster)?;
        let name = format!("taskdesk_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|err| eyre!("create {name}: {err}"))?;
        let cleanup = DropDatabase { cluster, name };

        let url = cluster.connection().database_url(&cleanup.name);
        let pool = build_pool(&url, POOL_SIZE).wrap_err("open pool")?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .wrap_err("build test runtime")?;
        Ok(Self {
            repository: PostgresTaskRepository::new(pool),
            runtime,
            url,
            _cleanup: cleanup,
        })
    }

    /// Inserts a task titled `title` due on 2025-01-01.
    pub fn seed(&self, title: &str, read_only: bool) -> Result<Task> {
        let due = Utc
            .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| eyre!("invalid due date"))?;
        let task = NewTask::new(TaskTitle::new(title)?, TaskStatus::ToDo, TaskPriority::Low, due)
            .with_description("seeded")
            .with_read_only(read_only);
        Ok(self
            .runtime
            .block_on(self.repository.insert(&task, Utc::now()))?)
    }

    /// Reads the stored row directly, soft-deleted or not.
    pub fn stored_row(&self, id: TaskId) -> Result<Option<StoredRow>> {
        let mut conn = PgConnection::establish(&self.url).wrap_err("connect")?;
        diesel::sql_query(
            "SELECT title, status, read_only, deleted_at IS NOT NULL AS deleted \
             FROM tasks WHERE id = $1",
        )
        .bind::<diesel::sql_types::BigInt, _>(id.value())
        .get_result::<StoredRow>(&mut conn)
        .optional()
        .wrap_err("select task row")
    }

    /// Counts every row, soft-deleted ones included.
    pub fn row_count(&self) -> Result<i64> {
        #[derive(diesel::QueryableByName)]
        struct CountRow {
            #[diesel(sql_type = diesel::sql_types::BigInt)]
            count: i64,
        }

        let mut conn = PgConnection::establish(&self.url).wrap_err("connect")?;
        let row = diesel::sql_query("SELECT count(*) AS count FROM tasks")
            .get_result::<CountRow>(&mut conn)
            .wrap_err("count task rows")?;
        Ok(row.count)
    }
}

/// Raw column values of one task row.
#[derive(diesel::QueryableByName, Debug, PartialEq, Eq)]
pub struct StoredRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub title: String,
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub status: String,
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub read_only: bool,
    #[diesel(sql_type = diesel::sql_types::Bool)]
    pub deleted: bool,
}

/// A migrated database, or `None` when no cluster is available.
#[fixture]
pub fn database() -> Result<Option<TestDatabase>> {
    shared_cluster().map(TestDatabase::create).transpose()
}
