//! Dashboard pages for maintenance logs.

use askama::Template;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Path, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetFilter, AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::asset::AssetStatus;
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, MaintenanceLogId};
use inventory_domain::maintenance::{MaintenanceDetails, MaintenanceRequest, MaintenanceStatus};

use super::{Choice, DashboardError, format_date, non_blank, parse_amount, render};
use crate::api::parse_id;
use crate::state::AppState;

pub struct MaintenanceRow {
    pub id: i64,
    pub asset_name: String,
    pub maintenance_date: String,
    pub description: String,
    pub technician: String,
    pub cost: String,
    pub status: &'static str,
    /// Status options for the inline change form, current one selected.
    pub statuses: Vec<Choice>,
}

impl From<&MaintenanceDetails> for MaintenanceRow {
    fn from(details: &MaintenanceDetails) -> Self {
        let log = &details.log;
        Self {
            id: log.id.get(),
            asset_name: details.asset.name.clone(),
            maintenance_date: format_date(log.maintenance_date),
            description: log.description.clone(),
            technician: log.technician.clone(),
            cost: log.cost.to_string(),
            status: log.status.as_str(),
            statuses: MaintenanceStatus::ALL
                .iter()
                .map(|s| Choice {
                    value: s.as_str().to_string(),
                    label: s.as_str().to_string(),
                    selected: *s == log.status,
                })
                .collect(),
        }
    }
}

/// Maintenance list page template.
#[derive(Template)]
#[template(path = "maintenance.html")]
pub struct MaintenanceListTemplate {
    logs: Vec<MaintenanceRow>,
    /// Assets that can be sent to maintenance.
    assets: Vec<Choice>,
}

impl IntoResponse for MaintenanceListTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// Form data for logging maintenance.
#[derive(Deserialize)]
pub struct MaintenanceForm {
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technician: String,
    #[serde(default)]
    pub cost: String,
}

/// Form data for a status change.
#[derive(Deserialize)]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
}

/// `GET /maintenance` — list logs and offer the log form.
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
) -> Result<MaintenanceListTemplate, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let logs = state.maintenance_service.list_maintenance_logs().await?;
    let assets = state
        .asset_service
        .list_assets(AssetFilter::default())
        .await?;

    Ok(MaintenanceListTemplate {
        logs: logs.iter().map(MaintenanceRow::from).collect(),
        assets: assets
            .iter()
            .filter(|asset| !matches!(asset.status, AssetStatus::Retired | AssetStatus::Lost))
            .map(|asset| Choice {
                value: asset.id.to_string(),
                label: format!("{} ({})", asset.name, asset.status),
                selected: false,
            })
            .collect(),
    })
}

/// `POST /maintenance` — log maintenance on an asset (PRG).
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    form: Result<Form<MaintenanceForm>, FormRejection>,
) -> Result<Redirect, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Form(form) = form?;
    let asset_id: AssetId = parse_id(&form.asset_id)?;

    state
        .maintenance_service
        .log_maintenance(MaintenanceRequest {
            asset_id,
            description: form.description,
            technician: non_blank(form.technician),
            cost: parse_amount("cost", &form.cost)?.unwrap_or_default(),
        })
        .await?;
    Ok(Redirect::to("/maintenance"))
}

/// `POST /maintenance/{id}/status` — change a log's status (PRG).
pub async fn set_status<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
    form: Result<Form<StatusForm>, FormRejection>,
) -> Result<Redirect, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let log_id: MaintenanceLogId = parse_id(&id)?;
    let Form(form) = form?;
    let status = form
        .status
        .parse::<MaintenanceStatus>()
        .map_err(InventoryError::from)?;

    state
        .maintenance_service
        .set_maintenance_status(log_id, status)
        .await?;
    Ok(Redirect::to("/maintenance"))
}
