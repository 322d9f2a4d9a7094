//! JSON handlers for assets.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use rust_decimal::Decimal;
use serde::Deserialize;

use inventory_app::ports::{
    AssetFilter, AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::asset::{Asset, AssetStatus};
use inventory_domain::error::{InventoryError, ValidationError};
use inventory_domain::id::{AssetId, Version};
use inventory_domain::status::RawStatus;
use inventory_domain::time::Timestamp;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Status name or code.
    pub status: Option<String>,
}

/// Request body for creating an asset.
#[derive(Deserialize)]
pub struct CreateAssetRequest {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: Option<String>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<Timestamp>,
    pub purchase_cost: Option<Decimal>,
    pub status: Option<RawStatus>,
}

/// Request body for a full asset update.
#[derive(Deserialize)]
pub struct UpdateAssetRequest {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    #[serde(default)]
    pub serial_number: String,
    pub purchase_date: Timestamp,
    pub purchase_cost: Decimal,
    pub status: RawStatus,
    /// Version the caller read; the update is refused if the row moved on.
    pub version: i64,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Asset>>),
}

impl IntoResponse for ListResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Ok(json) => json.into_response(),
        }
    }
}

/// Possible responses from the get endpoint.
pub enum GetResponse {
    Ok(Json<Asset>),
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
    Created(Json<Asset>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => {
                let location = format!("/api/assets/{}", json.id);
                (StatusCode::CREATED, [(header::LOCATION, location)], json).into_response()
            }
        }
    }
}

/// Possible responses from the update and delete endpoints.
pub enum WriteResponse {
    NoContent,
}

impl IntoResponse for WriteResponse {
    fn into_response(self) -> Response {
        match self {
            Self::NoContent => StatusCode::NO_CONTENT.into_response(),
        }
    }
}

/// `GET /api/assets?status=`
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Query(query) = query?;
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(str::parse::<AssetStatus>)
        .transpose()
        .map_err(InventoryError::from)?;

    let assets = state
        .asset_service
        .list_assets(AssetFilter { status })
        .await?;
    Ok(ListResponse::Ok(Json(assets)))
}

/// `GET /api/assets/{id}`
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
    let asset_id: AssetId = parse_id(&id)?;
    let asset = state.asset_service.get_asset(asset_id).await?;
    Ok(GetResponse::Ok(Json(asset)))
}

/// `POST /api/assets`
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    payload: Result<Json<CreateAssetRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Asset::builder().name(req.name);
    if let Some(asset_type) = req.asset_type {
        builder = builder.asset_type(asset_type);
    }
    if let Some(serial_number) = req.serial_number {
        builder = builder.serial_number(serial_number);
    }
    if let Some(purchase_date) = req.purchase_date {
        builder = builder.purchase_date(purchase_date);
    }
    if let Some(purchase_cost) = req.purchase_cost {
        builder = builder.purchase_cost(purchase_cost);
    }
    if let Some(status) = req.status {
        builder = builder.status(AssetStatus::try_from(status).map_err(InventoryError::from)?);
    }

    let created = state.asset_service.create_asset(builder.build()?).await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/assets/{id}`
pub async fn update<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateAssetRequest>, JsonRejection>,
) -> Result<WriteResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let asset_id: AssetId = parse_id(&id)?;
    let Json(req) = payload?;
    if req.id != asset_id.get() {
        return Err(InventoryError::from(ValidationError::IdMismatch {
            path: asset_id.get(),
            body: req.id,
        })
        .into());
    }

    let asset = Asset {
        id: asset_id,
        name: req.name,
        asset_type: req.asset_type,
        serial_number: req.serial_number,
        purchase_date: req.purchase_date,
        purchase_cost: req.purchase_cost,
        status: AssetStatus::try_from(req.status).map_err(InventoryError::from)?,
        version: Version::new(req.version),
    };
    state.asset_service.update_asset(asset).await?;
    Ok(WriteResponse::NoContent)
}

/// `DELETE /api/assets/{id}`
pub async fn delete<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
) -> Result<WriteResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let asset_id: AssetId = parse_id(&id)?;
    state.asset_service.delete_asset(asset_id).await?;
    Ok(WriteResponse::NoContent)
}
