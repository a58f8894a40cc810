//! # Database Persistence Layer
//!
//! Postgres persistence for receivers via SQLx.
//!
//! The database is **optional**. When `DATABASE_URL` is set, receivers are
//! stored in the `receivers` table through [`receivers::PgReceiverRepository`].
//! When absent, the API runs on the in-memory repository and state does not
//! survive restarts.

pub mod receivers;

use std::time::Duration;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::AppConfig;

/// Initialize the database connection pool and run migrations.
///
/// Returns `None` if no database URL is configured (in-memory mode).
/// Returns `Err` if the URL is set but the connection or migration fails.
pub async fn init_pool(config: &AppConfig) -> Result<Option<PgPool>, sqlx::Error> {
    let Some(url) = &config.database_url else {
        tracing::warn!(
            "DATABASE_URL not set, running in-memory only mode. \
             Receivers will not survive restarts."
        );
        return Ok(None);
    };

    let pool = connect(url, config.db_max_connections).await?;
    Ok(Some(pool))
}

/// Connect to `url` and apply the embedded migrations.
pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    tracing::info!(max_connections, "connected to PostgreSQL");

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}
