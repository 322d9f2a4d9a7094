//! Dashboard pages for employees.

use askama::Template;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeFilter, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::employee::Employee;
use inventory_domain::id::EmployeeId;

use super::{DashboardError, format_date, non_blank, parse_date, render};
use crate::api::parse_id;
use crate::state::AppState;

pub struct EmployeeRow {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub department: String,
    pub hire_date: String,
    pub is_active: bool,
}

impl From<&Employee> for EmployeeRow {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.get(),
            full_name: employee.full_name(),
            email: employee.email.clone(),
            department: employee.department.clone(),
            hire_date: format_date(employee.hire_date),
            is_active: employee.is_active,
        }
    }
}

/// Employee list page template.
#[derive(Template)]
#[template(path = "employees.html")]
pub struct EmployeeListTemplate {
    employees: Vec<EmployeeRow>,
    search: String,
}

impl IntoResponse for EmployeeListTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub search: String,
}

/// Form data for a new employee.
#[derive(Deserialize)]
pub struct EmployeeForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub hire_date: String,
}

/// `GET /employees` — list employees, optionally filtered by a search term.
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<EmployeeListTemplate, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Query(query) = query?;
    let employees = state
        .employee_service
        .list_employees(EmployeeFilter {
            search: non_blank(query.search.clone()),
        })
        .await?;

    Ok(EmployeeListTemplate {
        employees: employees.iter().map(EmployeeRow::from).collect(),
        search: query.search,
    })
}

/// `POST /employees` — create an employee (PRG).
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    form: Result<Form<EmployeeForm>, FormRejection>,
) -> Result<Redirect, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Form(form) = form?;

    let mut builder = Employee::builder()
        .first_name(form.first_name)
        .last_name(form.last_name)
        .email(form.email)
        .department(form.department);
    if let Some(hire_date) = parse_date("hire_date", &form.hire_date)? {
        builder = builder.hire_date(hire_date);
    }

    state.employee_service.create_employee(builder.build()?).await?;
    Ok(Redirect::to("/employees"))
}

/// `POST /employees/{id}/delete` — delete an employee (PRG).
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
    let employee_id: EmployeeId = parse_id(&id)?;
    state.employee_service.delete_employee(employee_id).await?;
    Ok(Redirect::to("/employees"))
}
