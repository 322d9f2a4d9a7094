//! Dashboard pages for assets.

use askama::Template;
use axum::extract::rejection::{FormRejection, QueryRejection};
use axum::extract::{Form, Path, Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use inventory_app::ports::{
    AssetFilter, AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_domain::asset::{Asset, AssetStatus};
use inventory_domain::error::InventoryError;
use inventory_domain::id::AssetId;

use super::{Choice, DashboardError, format_date, non_blank, parse_amount, parse_date, render};
use crate::api::parse_id;
use crate::state::AppState;

/// One table row.
pub struct AssetRow {
    pub id: i64,
    pub name: String,
    pub asset_type: String,
    pub serial_number: String,
    pub purchase_date: String,
    pub purchase_cost: String,
    pub status: &'static str,
    pub deletable: bool,
}

impl From<&Asset> for AssetRow {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.id.get(),
            name: asset.name.clone(),
            asset_type: asset.asset_type.clone(),
            serial_number: asset.serial_number.clone(),
            purchase_date: format_date(asset.purchase_date),
            purchase_cost: asset.purchase_cost.to_string(),
            status: asset.status.as_str(),
            deletable: asset.status != AssetStatus::Assigned,
        }
    }
}

/// Asset list page template.
#[derive(Template)]
#[template(path = "assets.html")]
pub struct AssetListTemplate {
    assets: Vec<AssetRow>,
    statuses: Vec<Choice>,
}

impl IntoResponse for AssetListTemplate {
    fn into_response(self) -> Response {
        render(&self)
    }
}

/// Query string of the list page.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: String,
}

/// Form data for a new asset.
#[derive(Deserialize)]
pub struct AssetForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub purchase_date: String,
    #[serde(default)]
    pub purchase_cost: String,
}

/// `GET /assets` — list assets, optionally narrowed to one status.
pub async fn list<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<AssetListTemplate, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Query(query) = query?;
    let status = non_blank(query.status)
        .map(|raw| raw.parse::<AssetStatus>())
        .transpose()
        .map_err(InventoryError::from)?;

    let assets = state
        .asset_service
        .list_assets(AssetFilter { status })
        .await?;

    let statuses = AssetStatus::ALL
        .iter()
        .map(|s| Choice {
            value: s.as_str().to_string(),
            label: s.as_str().to_string(),
            selected: Some(*s) == status,
        })
        .collect();

    Ok(AssetListTemplate {
        assets: assets.iter().map(AssetRow::from).collect(),
        statuses,
    })
}

/// `POST /assets` — create an asset (PRG).
pub async fn create<A, E, S, M, P>(
    State(state): State<AppState<A, E, S, M, P>>,
    form: Result<Form<AssetForm>, FormRejection>,
) -> Result<Redirect, DashboardError>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    let Form(form) = form?;

    let mut builder = Asset::builder()
        .name(form.name)
        .asset_type(form.asset_type)
        .serial_number(form.serial_number);
    if let Some(purchase_date) = parse_date("purchase_date", &form.purchase_date)? {
        builder = builder.purchase_date(purchase_date);
    }
    if let Some(purchase_cost) = parse_amount("purchase_cost", &form.purchase_cost)? {
        builder = builder.purchase_cost(purchase_cost);
    }

    state.asset_service.create_asset(builder.build()?).await?;
    Ok(Redirect::to("/assets"))
}

/// `POST /assets/{id}/delete` — delete an asset (PRG).
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
    let asset_id: AssetId = parse_id(&id)?;
    state.asset_service.delete_asset(asset_id).await?;
    Ok(Redirect::to("/assets"))
}
