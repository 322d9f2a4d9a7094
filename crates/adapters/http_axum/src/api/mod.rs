//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod assets;
#[allow(clippy::missing_errors_doc)]
pub mod assignments;
#[allow(clippy::missing_errors_doc)]
pub mod employees;
pub mod info;
#[allow(clippy::missing_errors_doc)]
pub mod maintenance;

use std::str::FromStr;

use axum::Router;
use axum::routing::{get, put};

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<A, E, S, M, P>() -> Router<AppState<A, E, S, M, P>>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    Router::new()
        // Assets
        .route(
            "/assets",
            get(assets::list::<A, E, S, M, P>).post(assets::create::<A, E, S, M, P>),
        )
        .route(
            "/assets/{id}",
            get(assets::get::<A, E, S, M, P>)
                .put(assets::update::<A, E, S, M, P>)
                .delete(assets::delete::<A, E, S, M, P>),
        )
        // Employees
        .route(
            "/employees",
            get(employees::list::<A, E, S, M, P>).post(employees::create::<A, E, S, M, P>),
        )
        .route(
            "/employees/{id}",
            get(employees::get::<A, E, S, M, P>)
                .put(employees::update::<A, E, S, M, P>)
                .delete(employees::delete::<A, E, S, M, P>),
        )
        // Assignments
        .route(
            "/assignments",
            get(assignments::list::<A, E, S, M, P>).post(assignments::create::<A, E, S, M, P>),
        )
        .route(
            "/assignments/{id}",
            get(assignments::get::<A, E, S, M, P>).delete(assignments::delete::<A, E, S, M, P>),
        )
        .route(
            "/assignments/{id}/return",
            put(assignments::return_asset::<A, E, S, M, P>),
        )
        .route(
            "/assignments/asset/{asset_id}",
            get(assignments::by_asset::<A, E, S, M, P>),
        )
        // Maintenance
        .route(
            "/maintenance",
            get(maintenance::list::<A, E, S, M, P>).post(maintenance::create::<A, E, S, M, P>),
        )
        .route("/maintenance/{id}", get(maintenance::get::<A, E, S, M, P>))
        .route(
            "/maintenance/{id}/complete",
            put(maintenance::set_status::<A, E, S, M, P>),
        )
        .route(
            "/maintenance/asset/{asset_id}",
            get(maintenance::by_asset::<A, E, S, M, P>),
        )
        // Info
        .route("/info", get(info::get::<A, E, S, M, P>))
}

/// Parse an id taken from the request path.
pub(crate) fn parse_id<T: FromStr>(raw: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("{raw:?} is not a valid id")))
}
