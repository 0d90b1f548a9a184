//! taskdesk HTTP server.
//!
//! Reads its settings from the environment (see [`ServerConfig`]), wires the
//! configured adapters into the router and serves until interrupted.

use std::sync::Arc;

use eyre::{Result, WrapErr};
use taskdesk::{
    auth::{
        adapters::{memory::InMemoryIdentityProvider, supabase::SupabaseIdentityProvider},
        ports::IdentityProvider,
    },
    config::{DatabaseConfig, IdentityConfig, ServerConfig},
    http::{AppState, build_router, cors_layer},
    task::{
        adapters::{
            memory::InMemoryTaskRepository,
            postgres::{PostgresTaskRepository, build_pool},
        },
        ports::TaskRepository,
    },
    telemetry,
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::from_env().wrap_err("invalid configuration")?;
    telemetry::init_tracing(config.log_format).wrap_err("failed to install log subscriber")?;

    let repository = task_repository(config.database.as_ref()).await?;
    let provider = identity_provider(&config.identity)?;
    let state = AppState::new(repository, provider, config.cookies.clone())
        .with_api_docs(config.api_docs);
    if config.api_docs {
        info!("serving OpenAPI document at /api-docs/openapi.json");
    }
    let app = build_router(state).layer(cors_layer(config.cors_origin.clone()));

    let listener = TcpListener::bind(config.bind)
        .await
        .wrap_err_with(|| format!("failed to bind {}", config.bind))?;
    info!(addr = %config.bind, "taskdesk listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server stopped with an error")?;
    info!("taskdesk stopped");
    Ok(())
}

async fn task_repository(database: Option<&DatabaseConfig>) -> Result<Arc<dyn TaskRepository>> {
    let Some(settings) = database else {
        warn!("DATABASE_URL is unset; tasks are kept in memory");
        return Ok(Arc::new(InMemoryTaskRepository::new()));
    };
    let pool = build_pool(&settings.url, settings.pool_size)
        .wrap_err("failed to open the Postgres pool")?;
    let repository = PostgresTaskRepository::new(pool);
    if settings.run_migrations {
        repository
            .migrate()
            .await
            .wrap_err("failed to apply the task schema")?;
        info!("task schema applied");
    }
    Ok(Arc::new(repository))
}

fn identity_provider(identity: &IdentityConfig) -> Result<Arc<dyn IdentityProvider>> {
    match identity {
        IdentityConfig::Supabase { url, anon_key } => {
            info!(%url, "using Supabase identity provider");
            Ok(Arc::new(SupabaseIdentityProvider::new(
                url.as_str(),
                anon_key.as_str(),
            )))
        }
        IdentityConfig::Local(users) => {
            let provider = InMemoryIdentityProvider::new();
            for user in users {
                provider
                    .register(user.email(), user.password())
                    .wrap_err("failed to register development user")?;
            }
            if users.is_empty() {
                warn!("no identity provider configured and TASKDESK_DEV_USERS is empty");
            } else {
                info!(users = users.len(), "using in-memory identity provider");
            }
            Ok(Arc::new(provider))
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for shutdown signal");
    }
    info!("shutdown requested");
}
