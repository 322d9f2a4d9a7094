//! Dashboard pages for assignments.

use askama::Template;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetFilter, AssetRepository, AssignmentFilter, AssignmentRepository, EmployeeFilter,
    EmployeeRepository, HealthProbe, MaintenanceRepository,
};
use inventory_domain::asset::AssetStatus;
use inventory_domain::assignment::AssignmentDetails;
use inventory_domain::id::{AssetId, AssignmentId, EmployeeId};

use super::{Choice, DashboardError, format_date, non_blank, render};
use crate::api::parse_id;
use crate::state::AppState;

pub struct AssignmentRow {
    pub id: i64,
    pub asset_name: String,
    pub employee_name: String,
    pub assigned_date: String,
    pub return_date: String,
    pub status: &'static str,
    pub notes: String,
    pub open: bool,
}

impl From<&AssignmentDetails> for AssignmentRow {
    fn from(details: &AssignmentDetails) -> Self {
        let assignment = &details.assignment;
        Self {
            id: assignment.id.get(),
            asset_name: details.asset.name.clone(),
            employee_name: details.employee.full_name(),
            assigned_date: format_date(assignment.assigned_date),
            return_date: assignment.return_date.map(format_date).unwrap_or_default(),
            status: assignment.status.as_str(),
            notes: assignment.notes.clone(),
            open: assignment.is_open(),
        }
    }
}

/// Assignment list page template.
#[derive(Template)]
#[template(path = "assignments.html")]
pub struct AssignmentListTemplate {
    assignments: Vec<AssignmentRow>,
    search: String,
    /// Assets that can be handed out right now.
    assets: Vec<Choice>,
    employees: Vec<Choice>,
}

impl IntoResponse for AssignmentListTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
}

/// Form data for assigning an asset.
#[derive(Deserialize)]
pub struct AssignmentForm {
    #[serde(default)]
    pub asset_id: String,
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub notes: String,
}

/// `GET /assignments` — list assignments and offer the assign form.
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<AssignmentListTemplate, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Query(query) = query?;
    let assignments = state
        .assignment_service
        .list_assignments(AssignmentFilter {
            search: non_blank(query.search.clone()),
        })
        .await?;
    let available = state
        .asset_service
        .list_assets(AssetFilter {
            status: Some(AssetStatus::Available),
        })
        .await?;
    let employees = state
        .employee_service
        .list_employees(EmployeeFilter::default())
        .await?;

    Ok(AssignmentListTemplate {
        assignments: assignments.iter().map(AssignmentRow::from).collect(),
        search: query.search,
        assets: available
            .iter()
            .map(|asset| Choice {
                value: asset.id.to_string(),
                label: format!("{} ({})", asset.name, asset.serial_number),
                selected: false,
            })
            .collect(),
        employees: employees
            .iter()
            .filter(|employee| employee.is_active)
            .map(|employee| Choice {
                value: employee.id.to_string(),
                label: employee.full_name(),
                selected: false,
            })
            .collect(),
    })
}

/// `POST /assignments` — assign an asset (PRG).
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    form: Result<Form<AssignmentForm>, FormRejection>,
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
    let employee_id: EmployeeId = parse_id(&form.employee_id)?;

    state
        .assignment_service
        .create_assignment(asset_id, employee_id, non_blank(form.notes))
        .await?;
    Ok(Redirect::to("/assignments"))
}

/// `POST /assignments/{id}/return` — mark an assignment returned (PRG).
pub async fn return_asset<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
) -> Result<Redirect, DashboardError>
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
    Ok(Redirect::to("/assignments"))
}

/// `POST /assignments/{id}/delete` — delete an assignment (PRG).
pub async fn delete<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    Path(id): Path<String>,
) -> Result<Redirect, DashboardError>
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
    Ok(Redirect::to("/assignments"))
}
