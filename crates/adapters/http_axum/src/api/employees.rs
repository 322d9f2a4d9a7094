//! JSON handlers for employees.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeFilter, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::employee::Employee;
use inventory_domain::error::{InventoryError, ValidationError};
use inventory_domain::id::{EmployeeId, Version};
use inventory_domain::time::Timestamp;

use super::parse_id;
use crate::error::ApiError;
use crate::state::AppState;

/// Query string of the list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
}

/// Request body for creating an employee.
#[derive(Deserialize)]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub department: Option<String>,
    pub hire_date: Option<Timestamp>,
    pub termination_date: Option<Timestamp>,
    pub is_active: Option<bool>,
}

/// Request body for a full employee update.
#[derive(Deserialize)]
pub struct UpdateEmployeeRequest {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub hire_date: Timestamp,
    pub termination_date: Option<Timestamp>,
    pub is_active: bool,
    pub version: i64,
}

/// Possible responses from the list endpoint.
pub enum ListResponse {
    Ok(Json<Vec<Employee>>),
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
    Ok(Json<Employee>),
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
    Created(Json<Employee>),
}

impl IntoResponse for CreateResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => {
                let location = format!("/api/employees/{}", json.id);
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

/// `GET /api/employees?search=`
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
    let filter = EmployeeFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
    };
    let employees = state.employee_service.list_employees(filter).await?;
    Ok(ListResponse::Ok(Json(employees)))
}

/// `GET /api/employees/{id}`
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
    let employee_id: EmployeeId = parse_id(&id)?;
    let employee = state.employee_service.get_employee(employee_id).await?;
    Ok(GetResponse::Ok(Json(employee)))
}

/// `POST /api/employees`
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    payload: Result<Json<CreateEmployeeRequest>, JsonRejection>,
) -> Result<CreateResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Json(req) = payload?;

    let mut builder = Employee::builder()
        .first_name(req.first_name)
        .last_name(req.last_name)
        .email(req.email);
    if let Some(department) = req.department {
        builder = builder.department(department);
    }
    if let Some(hire_date) = req.hire_date {
        builder = builder.hire_date(hire_date);
    }
    if let Some(termination_date) = req.termination_date {
        builder = builder.termination_date(termination_date);
    }
    if let Some(is_active) = req.is_active {
        builder = builder.is_active(is_active);
    }

    let created = state
        .employee_service
        .create_employee(builder.build()?)
        .await?;
    Ok(CreateResponse::Created(Json(created)))
}

/// `PUT /api/employees/{id}`
pub async fn update<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEmployeeRequest>, JsonRejection>,
) -> Result<WriteResponse, ApiError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let employee_id: EmployeeId = parse_id(&id)?;
    let Json(req) = payload?;
    if req.id != employee_id.get() {
        return Err(InventoryError::from(ValidationError::IdMismatch {
            path: employee_id.get(),
            body: req.id,
        })
        .into());
    }

    let employee = Employee {
        id: employee_id,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        department: req.department,
        hire_date: req.hire_date,
        termination_date: req.termination_date,
        is_active: req.is_active,
        version: Version::new(req.version),
    };
    state.employee_service.update_employee(employee).await?;
    Ok(WriteResponse::NoContent)
}

/// `DELETE /api/employees/{id}`
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
    let employee_id: EmployeeId = parse_id(&id)?;
    state.employee_service.delete_employee(employee_id).await?;
    Ok(WriteResponse::NoContent)
}
