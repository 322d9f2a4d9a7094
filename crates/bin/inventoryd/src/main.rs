//! # inventoryd — inventory daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (`inventory.toml` plus environment overrides)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGINT/SIGTERM
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use anyhow::Context;
use inventory_adapter_http_axum::state::AppState;
use inventory_adapter_storage_sqlite_sqlx::{
    SqliteAssetRepository, SqliteAssignmentRepository, SqliteEmployeeRepository,
    SqliteMaintenanceRepository,
};
use inventory_app::services::asset_service::AssetService;
use inventory_app::services::assignment_service::AssignmentService;
use inventory_app::services::employee_service::EmployeeService;
use inventory_app::services::health_service::HealthService;
use inventory_app::services::maintenance_service::MaintenanceService;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{Config, DEFAULT_LOG_FILTER};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    let filter = EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|err| {
        eprintln!("invalid log filter {:?}: {err}", config.logging.filter);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database
    let db = config
        .storage()
        .build()
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    tracing::info!(url = %config.database.url, "database ready");

    // Services
    let asset_service = AssetService::new(SqliteAssetRepository::new(db.clone()));
    let employee_service = EmployeeService::new(SqliteEmployeeRepository::new(db.clone()));
    let assignment_service = AssignmentService::new(
        SqliteAssignmentRepository::new(db.clone()),
        SqliteAssetRepository::new(db.clone()),
        SqliteEmployeeRepository::new(db.clone()),
    );
    let maintenance_service = MaintenanceService::new(
        SqliteMaintenanceRepository::new(db.clone()),
        SqliteAssetRepository::new(db.clone()),
    );
    let health_service = HealthService::new(db.clone(), config.app.environment.clone());

    // HTTP
    let state = AppState::new(
        asset_service,
        employee_service,
        assignment_service,
        maintenance_service,
        health_service,
    );
    let app = inventory_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(
        %bind_addr,
        environment = %config.app.environment,
        "inventoryd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    db.close().await;
    tracing::info!("graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        () = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
