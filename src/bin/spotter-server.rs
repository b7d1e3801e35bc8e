// ABOUTME: HTTP server binary for workout generation and safety validation
// ABOUTME: Loads configuration, opens the database, and serves the axum router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Spotter Fitness Safety

//! # Spotter Server Binary
//!
//! Starts the HTTP API. The generative provider is optional: when it cannot
//! be created the server still starts and serves fallback plans.

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use spotter_safety::SafetyEnvelope;
use spotter_server::{
    config::{env_keys, ServerConfig},
    database::Database,
    llm::create_provider,
    logging,
    resources::ServerResources,
    routes,
    stores::{load_library_file, Stores},
};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "spotter-server")]
#[command(about = "Spotter - safety-constrained workout generation API")]
struct Args {
    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,

    /// Import a JSON exercise library before serving
    #[arg(long)]
    library: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env().context("Invalid server configuration")?;
    if let Some(port) = args.port {
        config.port = port;
    }
    info!("Starting Spotter server");
    info!("{}", config.summary());

    let envelope = Arc::new(SafetyEnvelope::load().context("Invalid safety envelope")?);
    info!(
        max_duration = envelope.max_duration_minutes,
        max_sets = envelope.max_sets_per_exercise,
        max_reps = envelope.max_reps_per_set,
        "Safety envelope loaded"
    );

    let database = Database::new(&config.database_url).await?;
    info!("Database initialized: {}", config.database_url);

    let library_path = args.library.or_else(|| env::var(env_keys::LIBRARY_PATH).ok());
    if let Some(path) = library_path {
        let exercises = load_library_file(Path::new(&path))?;
        let imported = database.import_exercises(&exercises).await?;
        info!(path = %path, imported, "Exercise library imported");
    }

    let provider = match create_provider(config.llm_provider) {
        Ok(provider) => provider,
        Err(e) => {
            warn!(error = %e, "Generative provider unavailable; serving fallback plans only");
            None
        }
    };

    let stores = Stores::from_backend(Arc::new(database.clone()));
    let resources = Arc::new(ServerResources::new(
        &config,
        envelope,
        stores,
        provider,
        Some(database),
    ));
    let app = routes::router(resources, config.request_timeout());

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", config.bind_address());
    info!("  POST /api/workouts/generate");
    info!("  POST /api/safety/validate");
    info!("  GET  /health, /ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
}
