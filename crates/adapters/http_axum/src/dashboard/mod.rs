//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! Pages are askama templates from `templates/`. Every mutation is a form
//! POST that redirects back to its list page.

#[allow(clippy::missing_errors_doc)]
pub mod assets;
#[allow(clippy::missing_errors_doc)]
pub mod assignments;
#[allow(clippy::missing_errors_doc)]
pub mod employees;
#[allow(clippy::missing_errors_doc)]
pub mod home;
#[allow(clippy::missing_errors_doc)]
pub mod maintenance;

use askama::Template;
use axum::Router;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::error::{InventoryError, ValidationError};
use inventory_domain::time::{Timestamp, start_of_day};

use crate::error::ApiError;
use crate::state::AppState;

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<A, E, S, M, P>() -> Router<AppState<A, E, S, M, P>>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<A, E, S, M, P>))
        .route(
            "/assets",
            get(assets::list::<A, E, S, M, P>).post(assets::create::<A, E, S, M, P>),
        )
        .route("/assets/{id}/delete", post(assets::delete::<A, E, S, M, P>))
        .route(
            "/employees",
            get(employees::list::<A, E, S, M, P>).post(employees::create::<A, E, S, M, P>),
        )
        .route(
            "/employees/{id}/delete",
            post(employees::delete::<A, E, S, M, P>),
        )
        .route(
            "/assignments",
            get(assignments::list::<A, E, S, M, P>).post(assignments::create::<A, E, S, M, P>),
        )
        .route(
            "/assignments/{id}/return",
            post(assignments::return_asset::<A, E, S, M, P>),
        )
        .route(
            "/assignments/{id}/delete",
            post(assignments::delete::<A, E, S, M, P>),
        )
        .route(
            "/maintenance",
            get(maintenance::list::<A, E, S, M, P>).post(maintenance::create::<A, E, S, M, P>),
        )
        .route(
            "/maintenance/{id}/status",
            post(maintenance::set_status::<A, E, S, M, P>),
        )
}

/// Render a template, falling back to a bare 500 if rendering fails.
pub(crate) fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "template rendering failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    status: u16,
    reason: &'static str,
    message: String,
}

/// Failure of a dashboard handler, rendered as an HTML error page.
///
/// Shares its status mapping with the JSON API, so storage detail never
/// reaches the page.
#[derive(Debug)]
pub struct DashboardError(ApiError);

impl From<ApiError> for DashboardError {
    fn from(err: ApiError) -> Self {
        Self(err)
    }
}

impl From<InventoryError> for DashboardError {
    fn from(err: InventoryError) -> Self {
        Self(ApiError::from(err))
    }
}

impl From<FormRejection> for DashboardError {
    fn from(rejection: FormRejection) -> Self {
        Self(ApiError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for DashboardError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ApiError::from(rejection))
    }
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = self.0.status_and_message();
        let page = ErrorTemplate {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message,
        };
        (status, render(&page)).into_response()
    }
}

/// An `<option>` in a form select.
pub struct Choice {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// `YYYY-MM-DD` rendering used in every table.
pub(crate) fn format_date(ts: Timestamp) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Parse an optional `<input type="date">` value.
pub(crate) fn parse_date(
    field: &'static str,
    raw: &str,
) -> Result<Option<Timestamp>, InventoryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|date| Some(start_of_day(date)))
        .map_err(|_| ValidationError::InvalidDate { field }.into())
}

/// Parse an optional money amount typed into a form.
pub(crate) fn parse_amount(
    field: &'static str,
    raw: &str,
) -> Result<Option<Decimal>, InventoryError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<Decimal>()
        .map(Some)
        .map_err(|_| ValidationError::InvalidAmount { field }.into())
}

/// `None` for a blank input.
pub(crate) fn non_blank(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_treat_blank_inputs_as_absent() {
        assert_eq!(parse_date("purchase_date", " ").unwrap(), None);
        assert_eq!(parse_amount("purchase_cost", "").unwrap(), None);
        assert_eq!(non_blank("  ".to_string()), None);
    }

    #[test]
    fn should_parse_form_date_as_midnight_utc() {
        let ts = parse_date("hire_date", "2023-01-15").unwrap().unwrap();
        assert_eq!(format_date(ts), "2023-01-15");
    }

    #[test]
    fn should_name_field_when_date_is_malformed() {
        let err = parse_date("hire_date", "15/01/2023").unwrap_err();
        assert!(matches!(
            err,
            InventoryError::Validation(ValidationError::InvalidDate { field: "hire_date" })
        ));
    }

    #[test]
    fn should_parse_amount_exactly() {
        let amount = parse_amount("cost", "49.99").unwrap().unwrap();
        assert_eq!(amount, Decimal::new(4999, 2));
        assert!(parse_amount("cost", "lots").is_err());
    }
}
