//! Dashboard home page — overview of the inventory.

use askama::Template;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use inventory_app::ports::{
    AssetFilter, AssetRepository, AssignmentFilter, AssignmentRepository, EmployeeFilter,
    EmployeeRepository, HealthProbe, MaintenanceRepository,
};
use inventory_domain::asset::AssetStatus;
use inventory_domain::maintenance::MaintenanceStatus;

use super::{DashboardError, render};
use crate::state::AppState;

/// Number of assets in one status.
pub struct StatusCount {
    pub status: &'static str,
    pub count: usize,
}

/// Home page template.
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    asset_count: usize,
    by_status: Vec<StatusCount>,
    employee_count: usize,
    active_assignment_count: usize,
    open_maintenance_count: usize,
    environment: String,
}

impl IntoResponse for HomeTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// `GET /` — inventory overview.
pub async fn index<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
) -> Result<HomeTemplate, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let assets = state
        .asset_service
        .list_assets(AssetFilter::default())
        .await?;
    let employees = state
        .employee_service
        .list_employees(EmployeeFilter::default())
        .await?;
    let assignments = state
        .assignment_service
        .list_assignments(AssignmentFilter::default())
        .await?;
    let logs = state.maintenance_service.list_maintenance_logs().await?;

    let by_status = AssetStatus::ALL
        .iter()
        .map(|status| StatusCount {
            status: status.as_str(),
            count: assets.iter().filter(|a| a.status == *status).count(),
        })
        .collect();

    Ok(HomeTemplate {
        asset_count: assets.len(),
        by_status,
        employee_count: employees.len(),
        active_assignment_count: assignments
            .iter()
            .filter(|d| d.assignment.is_open())
            .count(),
        open_maintenance_count: logs
            .iter()
            .filter(|d| {
                matches!(
                    d.log.status,
                    MaintenanceStatus::Pending | MaintenanceStatus::InProgress
                )
            })
            .count(),
        environment: state.health_service.environment().to_string(),
    })
}
