// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};
use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::application::chart_service::ChartService;
use crate::infrastructure::config::{load_sensors_config, load_store_config};
use crate::infrastructure::influx_repository::InfluxRepository;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{get_chart, get_dashboard, get_recent, health_check};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let store_config = load_store_config()?;
    let sensors_config = load_sensors_config()?;

    // Create repository (infrastructure layer)
    let repository = Arc::new(InfluxRepository::new(
        store_config.store.host,
        store_config.store.token,
        store_config.store.database,
        store_config.store.retention_policy,
    ));

    // Create service (application layer)
    let chart_service = ChartService::new(repository, sensors_config);

    // Create application state
    let state = Arc::new(AppState { chart_service });

    // Build router (presentation layer)
    // Static /api/dashboard wins over the /api/:sensor capture.
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/dashboard", get(get_dashboard))
        .route("/api/:sensor", get(get_recent))
        .route("/api/charts/:sensor", get(get_chart))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = SocketAddr::from(([0, 0, 0, 0], store_config.server.port));
    println!("Starting plant-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
