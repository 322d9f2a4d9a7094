//! JSON handlers for maintenance logs.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Deserialize;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, MaintenanceLogId};
use inventory_domain::maintenance::{
    MaintenanceDetails, MaintenanceLog, MaintenanceRequest, MaintenanceStatus,
};
use inventory_domain::status::RawStatus;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Request body for logging maintenance.
#[derive(Deserialize)]
pub struct CreateMaintenanceRequest {
    pub asset_id: AssetId,
    #[serde(default)]
    pub description: String,
    pub technician: Option<String>,
    #[serde(default)]
    pub cost: Decimal,
}

/// Request body for changing a log's status.
#[derive(Deserialize)]
pub struct StatusRequest {
    pub status: RawStatus,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<MaintenanceDetails>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the per-asset endpoint.
pub enum HistoryResponse {
    Ok(Json<Vec<MaintenanceLog>>),
}

impl IntoResponse for HistoryResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<MaintenanceDetails>),
}

impl IntoResponse for GetResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the create endpoint.
pub enum CreateResponse {
    Created(Json<MaintenanceLog>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => {
                let location = format!("/api/maintenance/{}", json.id);
                (StatusCode::CREATED, [(header::LOCATION, location)], json).into_response()
            }
        }
    }
}

/// Possible responses from the status endpoint.
pub enum StatusResponse {
    NoContent,
}

impl IntoResponse for StatusResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/maintenance`
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
) -> Result<ListResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let logs = state.maintenance_service.list_maintenance_logs().await?;
    Ok(ListResponse::Ok(Json(logs)))
}

/// `GET /api/maintenance/{id}`
pub async fn get<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
) -> Result<GetResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let log_id: MaintenanceLogId = parse_id(&id)?;
    let details = state.maintenance_service.get_maintenance_log(log_id).await?;
    Ok(GetResponse::Ok(Json(details)))
}

/// `GET /api/maintenance/asset/{asset_id}`
pub async fn by_asset<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(asset_id): Path<String>,
) -> Result<HistoryResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let asset_id: AssetId = parse_id(&asset_id)?;
    let logs = state
        .maintenance_service
        .maintenance_for_asset(asset_id)
        .await?;
    Ok(HistoryResponse::Ok(Json(logs)))
}

/// `POST /api/maintenance`
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    payload: Result<Json<CreateMaintenanceRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let log = state
        .maintenance_service
        .log_maintenance(MaintenanceRequest {
            asset_id: req.asset_id,
            description: req.description,
            technician: req.technician,
            cost: req.cost,
        })
        .await?;
    Ok(CreateResponse::Created(Json(log)))
}

/// `PUT /api/maintenance/{id}/complete`
pub async fn set_status<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> Result<StatusResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let log_id: MaintenanceLogId = parse_id(&id)?;
    let Json(req) = payload?;
    let status = MaintenanceStatus::try_from(req.status).map_err(InventoryError::from)?;
    state
        .maintenance_service
        .set_maintenance_status(log_id, status)
        .await?;
    Ok(StatusResponse::NoContent)
}
