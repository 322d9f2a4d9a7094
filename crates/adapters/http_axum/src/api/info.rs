//! Application info endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub environment: String,
}

/// `GET /api/info`
pub async fn get<A, E, S, M, P>(State(state): State<AppState<A, E, S, M, P>>) -> Json<InfoResponse>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    Json(InfoResponse {
        name: "inventory",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.health_service.environment().to_string(),
    })
}
