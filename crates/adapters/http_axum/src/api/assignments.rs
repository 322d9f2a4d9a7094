//! JSON handlers for assignments.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetRepository, AssignmentFilter, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::assignment::{Assignment, AssignmentDetails};
use inventory_domain::id::{AssetId, AssignmentId, EmployeeId};

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Substring of the asset name or the employee's full name.
    pub search: Option<String>,
}

/// Request body for assigning an asset.
#[derive(Deserialize)]
pub struct CreateAssignmentRequest {
    pub asset_id: AssetId,
    pub employee_id: EmployeeId,
    pub notes: Option<String>,
}

/// Possible responses from the list endpoints.
pub enum ListResponse {
    Ok(Json<Vec<AssignmentDetails>>),
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
    Ok(Json<AssignmentDetails>),
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
    Created(Json<Assignment>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => {
                let location = format!("/api/assignments/{}", json.id);
                (StatusCode::CREATED, [(header::LOCATION, location)], json).into_response()
            }
        }
    }
}

/// Possible responses from the return and delete endpoints.
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

/// `GET /api/assignments?search=`
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
    let filter = AssignmentFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let assignments = state.assignment_service.list_assignments(filter).await?;
    Ok(ListResponse::Ok(Json(assignments)))
}

/// `GET /api/assignments/{id}`
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
    let assignment_id: AssignmentId = parse_id(&id)?;
    let details = state
        .assignment_service
        .get_assignment(assignment_id)
        .await?;
    Ok(GetResponse::Ok(Json(details)))
}

/// `GET /api/assignments/asset/{asset_id}`
pub async fn by_asset<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(asset_id): Path<String>,
) -> Result<ListResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let asset_id: AssetId = parse_id(&asset_id)?;
    let history = state
        .assignment_service
        .assignments_for_asset(asset_id)
        .await?;
    Ok(ListResponse::Ok(Json(history)))
}

/// `POST /api/assignments`
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    payload: Result<Json<CreateAssignmentRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let created = state
        .assignment_service
        .create_assignment(req.asset_id, req.employee_id, req.notes)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/assignments/{id}/return`
pub async fn return_asset<A, E, S, M, P>(
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
    let assignment_id: AssignmentId = parse_id(&id)?;
    state
        .assignment_service
        .return_assignment(assignment_id)
        .await?;
    Ok(WriteResponse::NoContent)
}

/// `DELETE /api/assignments/{id}`
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
    let assignment_id: AssignmentId = parse_id(&id)?;
    state
        .assignment_service
        .delete_assignment(assignment_id)
        .await?;
    Ok(WriteResponse::NoContent)
}
