//! Application setup and initialization
//!
//! All startup logic lives here rather than in main.rs: configuration
//! validation, telemetry, database, upload directory, and routes.

pub mod database;
pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use stripscan_core::Config;

use crate::state::AppState;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry();
    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    // The shared upload directory receives originals and thumbnails
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", config.upload_dir))?;

    let state = Arc::new(AppState::new(config.clone(), pool));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
