use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};
use tracing::info;

const SCHEMA: &str = include_str!("../migrations/0001_submissions.sql");

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Creates the submissions table and its index if they do not exist yet.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    pool.execute(SCHEMA)
        .await
        .context("Failed to apply submissions schema")?;
    info!("Submissions schema is in place");
    Ok(())
}
