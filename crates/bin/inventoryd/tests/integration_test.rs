//! End-to-end tests for the full inventoryd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real repos,
//! real services, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot` — no TCP port is bound.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use inventory_adapter_http_axum::router;
use inventory_adapter_http_axum::state::AppState;
use inventory_adapter_storage_sqlite_sqlx::{
    Config, SqliteAssetRepository, SqliteAssignmentRepository, SqliteEmployeeRepository,
    SqliteMaintenanceRepository,
};
use inventory_app::services::asset_service::AssetService;
use inventory_app::services::assignment_service::AssignmentService;
use inventory_app::services::employee_service::EmployeeService;
use inventory_app::services::health_service::HealthService;
use inventory_app::services::maintenance_service::MaintenanceService;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> Router {
    let db = Config::new("sqlite::memory:")
        .build()
        .await
        .expect("in-memory database should initialise");

    let state = AppState::new(
        AssetService::new(SqliteAssetRepository::new(db.clone())),
        EmployeeService::new(SqliteEmployeeRepository::new(db.clone())),
        AssignmentService::new(
            SqliteAssignmentRepository::new(db.clone()),
            SqliteAssetRepository::new(db.clone()),
            SqliteEmployeeRepository::new(db.clone()),
        ),
        MaintenanceService::new(
            SqliteMaintenanceRepository::new(db.clone()),
            SqliteAssetRepository::new(db.clone()),
        ),
        HealthService::new(db, "Testing"),
    );

    router::build(state)
}

struct Reply {
    status: StatusCode,
    location: Option<String>,
    body: Value,
}

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Reply {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8(bytes.to_vec()).unwrap())
        })
    };

    Reply {
        status,
        location,
        body,
    }
}

async fn create_laptop(app: &Router) -> i64 {
    let reply = call(
        app,
        "POST",
        "/api/assets",
        Some(json!({
            "name": "Laptop-1",
            "type": "Laptop",
            "serial_number": "SN-001",
            "purchase_date": "2024-01-15T00:00:00Z",
            "purchase_cost": "1299.00"
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_i64().unwrap()
}

async fn create_employee(app: &Router, first: &str, last: &str) -> i64 {
    let reply = call(
        app,
        "POST",
        "/api/employees",
        Some(json!({
            "first_name": first,
            "last_name": last,
            "email": format!("{}@example.com", first.to_lowercase()),
            "department": "Engineering"
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::CREATED);
    reply.body["id"].as_i64().unwrap()
}

async fn asset_status(app: &Router, id: i64) -> String {
    let reply = call(app, "GET", &format!("/api/assets/{id}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.body["status"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Health and info
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_reachable_database_in_health() {
    let app = app().await;
    let reply = call(&app, "GET", "/health", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["status"], "Healthy");
    assert_eq!(reply.body["checks"][0]["name"], "database");
    assert_eq!(reply.body["environment"], "Testing");
}

#[tokio::test]
async fn should_return_application_info() {
    let app = app().await;
    let reply = call(&app, "GET", "/api/info", None).await;

    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "inventory");
    assert!(reply.body["version"].is_string());
}

// ---------------------------------------------------------------------------
// Assets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_asset_with_location_and_exact_cost() {
    let app = app().await;
    let reply = call(
        &app,
        "POST",
        "/api/assets",
        Some(json!({ "name": "Monitor", "type": "Display", "purchase_cost": 249.99 })),
    )
    .await;

    assert_eq!(reply.status, StatusCode::CREATED);
    let id = reply.body["id"].as_i64().unwrap();
    assert_eq!(reply.location.as_deref(), Some(format!("/api/assets/{id}").as_str()));
    assert_eq!(reply.body["purchase_cost"], "249.99");
    assert_eq!(reply.body["status"], "Available");
    assert_eq!(reply.body["version"], 1);
}

#[tokio::test]
async fn should_filter_assets_by_status_name_or_code() {
    let app = app().await;
    create_laptop(&app).await;
    call(
        &app,
        "POST",
        "/api/assets",
        Some(json!({ "name": "Old phone", "status": "Retired" })),
    )
    .await;

    let by_name = call(&app, "GET", "/api/assets?status=Retired", None).await;
    assert_eq!(by_name.body.as_array().unwrap().len(), 1);
    assert_eq!(by_name.body[0]["name"], "Old phone");

    let by_code = call(&app, "GET", "/api/assets?status=0", None).await;
    assert_eq!(by_code.body.as_array().unwrap().len(), 1);
    assert_eq!(by_code.body[0]["name"], "Laptop-1");

    let unknown = call(&app, "GET", "/api/assets?status=Broken", None).await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_status_99_without_mutating_the_row() {
    let app = app().await;
    let id = create_laptop(&app).await;

    let reply = call(
        &app,
        "PUT",
        &format!("/api/assets/{id}"),
        Some(json!({
            "id": id,
            "name": "Renamed",
            "type": "Laptop",
            "serial_number": "SN-001",
            "purchase_date": "2024-01-15T00:00:00Z",
            "purchase_cost": "1299.00",
            "status": 99,
            "version": 1
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    let stored = call(&app, "GET", &format!("/api/assets/{id}"), None).await;
    assert_eq!(stored.body["name"], "Laptop-1");
    assert_eq!(stored.body["version"], 1);
}

#[tokio::test]
async fn should_give_exactly_one_winner_on_racing_updates() {
    let app = app().await;
    let id = create_laptop(&app).await;
    let update = |name: &str| {
        json!({
            "id": id,
            "name": name,
            "type": "Laptop",
            "serial_number": "SN-001",
            "purchase_date": "2024-01-15T00:00:00Z",
            "purchase_cost": "1299.00",
            "status": "Available",
            "version": 1
        })
    };

    let first = call(&app, "PUT", &format!("/api/assets/{id}"), Some(update("A"))).await;
    let second = call(&app, "PUT", &format!("/api/assets/{id}"), Some(update("B"))).await;

    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(second.status, StatusCode::CONFLICT);
    let stored = call(&app, "GET", &format!("/api/assets/{id}"), None).await;
    assert_eq!(stored.body["name"], "A");
    assert_eq!(stored.body["version"], 2);
}

#[tokio::test]
async fn should_return_404_when_updating_missing_asset() {
    let app = app().await;
    let reply = call(
        &app,
        "PUT",
        "/api/assets/404",
        Some(json!({
            "id": 404,
            "name": "Ghost",
            "type": "Laptop",
            "purchase_date": "2024-01-15T00:00:00Z",
            "purchase_cost": "0",
            "status": "Available",
            "version": 1
        })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_block_deleting_assigned_asset_then_cascade_after_return() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let employee_id = create_employee(&app, "Ada", "Lovelace").await;

    let assigned = call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": employee_id })),
    )
    .await;
    let assignment_id = assigned.body["id"].as_i64().unwrap();

    let blocked = call(&app, "DELETE", &format!("/api/assets/{asset_id}"), None).await;
    assert_eq!(blocked.status, StatusCode::BAD_REQUEST);

    let returned = call(
        &app,
        "PUT",
        &format!("/api/assignments/{assignment_id}/return"),
        None,
    )
    .await;
    assert_eq!(returned.status, StatusCode::NO_CONTENT);

    call(
        &app,
        "POST",
        "/api/maintenance",
        Some(json!({ "asset_id": asset_id, "description": "Wipe", "cost": "0" })),
    )
    .await;

    let deleted = call(&app, "DELETE", &format!("/api/assets/{asset_id}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = call(&app, "GET", &format!("/api/assets/{asset_id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    let history = call(&app, "GET", &format!("/api/assignments/{assignment_id}"), None).await;
    assert_eq!(history.status, StatusCode::NOT_FOUND);
    let logs = call(&app, "GET", "/api/maintenance", None).await;
    assert_eq!(logs.body, json!([]));
}

// ---------------------------------------------------------------------------
// Assignments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_walk_laptop_through_assign_and_return() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let ada = create_employee(&app, "Ada", "Lovelace").await;
    let grace = create_employee(&app, "Grace", "Hopper").await;

    let first = call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": ada, "notes": "desk 4" })),
    )
    .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let assignment_id = first.body["id"].as_i64().unwrap();
    assert_eq!(
        first.location.as_deref(),
        Some(format!("/api/assignments/{assignment_id}").as_str())
    );
    assert_eq!(first.body["status"], "Active");
    assert!(first.body["return_date"].is_null());
    assert_eq!(asset_status(&app, asset_id).await, "Assigned");

    let second = call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": grace })),
    )
    .await;
    assert_eq!(second.status, StatusCode::BAD_REQUEST);
    assert!(
        second.body["error"]
            .as_str()
            .unwrap()
            .contains("current status: Assigned")
    );

    let returned = call(
        &app,
        "PUT",
        &format!("/api/assignments/{assignment_id}/return"),
        None,
    )
    .await;
    assert_eq!(returned.status, StatusCode::NO_CONTENT);
    assert_eq!(asset_status(&app, asset_id).await, "Available");

    let again = call(
        &app,
        "PUT",
        &format!("/api/assignments/{assignment_id}/return"),
        None,
    )
    .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);

    let details = call(&app, "GET", &format!("/api/assignments/{assignment_id}"), None).await;
    assert_eq!(details.body["status"], "Returned");
    assert!(details.body["return_date"].is_string());
    assert_eq!(details.body["asset"]["name"], "Laptop-1");
    assert_eq!(details.body["employee"]["last_name"], "Lovelace");
}

#[tokio::test]
async fn should_return_404_for_asset_without_assignments() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;

    let reply = call(&app, "GET", &format!("/api/assignments/asset/{asset_id}"), None).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_list_asset_history_and_search_by_employee_name() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let ada = create_employee(&app, "Ada", "Lovelace").await;
    let assigned = call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": ada })),
    )
    .await;
    assert_eq!(assigned.status, StatusCode::CREATED);

    let history = call(&app, "GET", &format!("/api/assignments/asset/{asset_id}"), None).await;
    assert_eq!(history.status, StatusCode::OK);
    assert_eq!(history.body.as_array().unwrap().len(), 1);

    let hit = call(&app, "GET", "/api/assignments?search=lovelace", None).await;
    assert_eq!(hit.body.as_array().unwrap().len(), 1);
    let miss = call(&app, "GET", "/api/assignments?search=hopper", None).await;
    assert_eq!(miss.body, json!([]));
}

#[tokio::test]
async fn should_free_asset_when_assignment_deleted() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let ada = create_employee(&app, "Ada", "Lovelace").await;
    let assigned = call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": ada })),
    )
    .await;
    let assignment_id = assigned.body["id"].as_i64().unwrap();

    let deleted = call(
        &app,
        "DELETE",
        &format!("/api/assignments/{assignment_id}"),
        None,
    )
    .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(asset_status(&app, asset_id).await, "Available");
}

#[tokio::test]
async fn should_release_assets_when_employee_deleted() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let ada = create_employee(&app, "Ada", "Lovelace").await;
    call(
        &app,
        "POST",
        "/api/assignments",
        Some(json!({ "asset_id": asset_id, "employee_id": ada })),
    )
    .await;

    let deleted = call(&app, "DELETE", &format!("/api/employees/{ada}"), None).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    assert_eq!(asset_status(&app, asset_id).await, "Available");
    let history = call(&app, "GET", &format!("/api/assignments/asset/{asset_id}"), None).await;
    assert_eq!(history.status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_validate_and_search_employees() {
    let app = app().await;
    create_employee(&app, "Ada", "Lovelace").await;
    create_employee(&app, "Grace", "Hopper").await;

    let invalid = call(
        &app,
        "POST",
        "/api/employees",
        Some(json!({ "first_name": "No", "last_name": "Mail", "email": "nope" })),
    )
    .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let found = call(&app, "GET", "/api/employees?search=hop", None).await;
    assert_eq!(found.body.as_array().unwrap().len(), 1);
    assert_eq!(found.body[0]["first_name"], "Grace");
}

#[tokio::test]
async fn should_reject_stale_employee_update() {
    let app = app().await;
    let id = create_employee(&app, "Ada", "Lovelace").await;
    let update = json!({
        "id": id,
        "first_name": "Ada",
        "last_name": "King",
        "email": "ada@example.com",
        "department": "Research",
        "hire_date": "2020-01-01T00:00:00Z",
        "is_active": true,
        "version": 1
    });

    let first = call(&app, "PUT", &format!("/api/employees/{id}"), Some(update.clone())).await;
    let stale = call(&app, "PUT", &format!("/api/employees/{id}"), Some(update)).await;

    assert_eq!(first.status, StatusCode::NO_CONTENT);
    assert_eq!(stale.status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_move_asset_through_maintenance() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;

    let logged = call(
        &app,
        "POST",
        "/api/maintenance",
        Some(json!({
            "asset_id": asset_id,
            "description": "Replace keyboard",
            "technician": "Grace",
            "cost": "49.99"
        })),
    )
    .await;
    assert_eq!(logged.status, StatusCode::CREATED);
    let log_id = logged.body["id"].as_i64().unwrap();
    assert_eq!(logged.body["status"], "Pending");
    assert_eq!(logged.body["cost"], "49.99");
    assert_eq!(asset_status(&app, asset_id).await, "InMaintenance");

    let completed = call(
        &app,
        "PUT",
        &format!("/api/maintenance/{log_id}/complete"),
        Some(json!({ "status": "Completed" })),
    )
    .await;
    assert_eq!(completed.status, StatusCode::NO_CONTENT);
    assert_eq!(asset_status(&app, asset_id).await, "Available");

    let history = call(&app, "GET", &format!("/api/maintenance/asset/{asset_id}"), None).await;
    assert_eq!(history.body[0]["status"], "Completed");

    let details = call(&app, "GET", &format!("/api/maintenance/{log_id}"), None).await;
    assert_eq!(details.body["asset"]["name"], "Laptop-1");
}

#[tokio::test]
async fn should_reject_negative_maintenance_cost() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;

    let reply = call(
        &app,
        "POST",
        "/api/maintenance",
        Some(json!({ "asset_id": asset_id, "description": "Refund", "cost": "-5" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(asset_status(&app, asset_id).await, "Available");
}

#[tokio::test]
async fn should_return_empty_history_for_unserviced_asset() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;

    let reply = call(&app, "GET", &format!("/api/maintenance/asset/{asset_id}"), None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, json!([]));
}

// ---------------------------------------------------------------------------
// Dashboard (SSR) pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_render_every_dashboard_page() {
    let app = app().await;
    create_laptop(&app).await;

    for (uri, marker) in [
        ("/", "Overview"),
        ("/assets", "Laptop-1"),
        ("/employees", "Employees"),
        ("/assignments", "Assign an asset"),
        ("/maintenance", "Log maintenance"),
    ] {
        let reply = call(&app, "GET", uri, None).await;
        assert_eq!(reply.status, StatusCode::OK, "{uri}");
        assert!(reply.body.as_str().unwrap().contains(marker), "{uri}");
    }
}

#[tokio::test]
async fn should_assign_from_dashboard_form() {
    let app = app().await;
    let asset_id = create_laptop(&app).await;
    let ada = create_employee(&app, "Ada", "Lovelace").await;

    let request = Request::builder()
        .method("POST")
        .uri("/assignments")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(format!(
            "asset_id={asset_id}&employee_id={ada}&notes="
        )))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(asset_status(&app, asset_id).await, "Assigned");
}
