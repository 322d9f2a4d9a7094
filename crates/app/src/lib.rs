//! # inventory-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `AssetRepository` — CRUD for assets, filtered by status
//!   - `EmployeeRepository` — CRUD for employees, free-text search
//!   - `AssignmentRepository` — lookups plus atomic check-out / check-in
//!   - `MaintenanceRepository` — lookups plus atomic intake / progress
//!   - `HealthProbe` — datastore reachability
//! - Define **driving/inbound ports** as use-case structs:
//!   - `AssetService`, `EmployeeService` — validated CRUD
//!   - `AssignmentService`, `MaintenanceService` — run the lifecycle rules
//!     from `inventory-domain` and commit the resulting plan in one call
//!   - `HealthService` — aggregate probes into a report
//!
//! ## Dependency rule
//! Depends on `inventory-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
