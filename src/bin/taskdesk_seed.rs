//! Replaces the contents of the task table with the sample tasks.
//!
//! Usage:
//!
//! ```text
//! DATABASE_URL=postgres://... taskdesk-seed
//! ```
//!
//! Existing rows are removed and the identifier sequence restarts, so the
//! sample tasks receive ids 1 to 20.

use chrono::Utc;
use eyre::{Result, WrapErr, eyre};
use taskdesk::{
    config::ServerConfig,
    task::{
        adapters::postgres::{PostgresTaskRepository, build_pool},
        ports::TaskRepository,
        services::sample_tasks,
    },
    telemetry,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().wrap_err("invalid configuration")?;
    telemetry::init_tracing(config.log_format).wrap_err("failed to install log subscriber")?;
    let database = config
        .database
        .ok_or_else(|| eyre!("DATABASE_URL must be set to seed the task table"))?;

    let pool = build_pool(&database.url, database.pool_size)
        .wrap_err("failed to open the Postgres pool")?;
    let repository = PostgresTaskRepository::new(pool);
    repository
        .migrate()
        .await
        .wrap_err("failed to apply the task schema")?;
    repository
        .truncate()
        .await
        .wrap_err("failed to clear the task table")?;

    let tasks = sample_tasks().wrap_err("invalid sample task")?;
    let now = Utc::now();
    for task in &tasks {
        let stored = repository
            .insert(task, now)
            .await
            .wrap_err_with(|| format!("failed to insert {}", task.title.as_str()))?;
        info!(task_id = stored.id().value(), title = %stored.title().as_str(), "seeded task");
    }
    info!(count = tasks.len(), "task table seeded");
    Ok(())
}
