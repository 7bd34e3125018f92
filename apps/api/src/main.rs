mod config;
mod db;
mod errors;
mod models;
mod report;
mod routes;
mod state;
mod store;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, DataSource};
use crate::db::create_pool;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::{JsonFileStore, Records, WarehouseStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Skills Matrix API v{}", env!("CARGO_PKG_VERSION"));

    let records = build_records(&config).await?;
    info!(backend = records.backend(), "Record store ready");

    let state = AppState { records };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Picks the primary store from `DATA_SOURCE`. Warehouse mode gets a local JSON copy for writes.
async fn build_records(config: &Config) -> Result<Records> {
    match &config.data_source {
        DataSource::Json => {
            info!(path = %config.data_file.display(), "Using JSON file store");
            Ok(Records::new(
                Arc::new(JsonFileStore::new(config.data_file.clone())),
                None,
            ))
        }
        DataSource::Warehouse {
            database_url,
            table,
        } => {
            let pool = create_pool(database_url).await?;
            let warehouse = WarehouseStore::new(pool, table)?;
            info!(
                table = %table,
                local_copy = %config.local_copy_file.display(),
                "Using warehouse store"
            );
            Ok(Records::new(
                Arc::new(warehouse),
                Some(Arc::new(JsonFileStore::new(config.local_copy_file.clone()))),
            ))
        }
    }
}
