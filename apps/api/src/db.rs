use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

/// Opens the warehouse connection pool. Only `list` queries go through it.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to warehouse...");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url)
        .await
        .context("Failed to connect to the warehouse database")?;

    info!("Warehouse connection pool established");
    Ok(pool)
}
