//! # inventory-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `inventory-app::ports`
//! - Manage `SQLite` connection pool lifecycle, retrying transient failures
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//! - Apply every lifecycle plan in a single transaction, guarded by row versions
//!
//! ## Dependency rule
//! Depends on `inventory-app` (for port traits) and `inventory-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod asset_repo;
pub mod assignment_repo;
pub mod employee_repo;
pub mod error;
mod guard;
pub mod maintenance_repo;
pub mod pool;
pub mod retry;
mod rows;

pub use asset_repo::SqliteAssetRepository;
pub use assignment_repo::SqliteAssignmentRepository;
pub use employee_repo::SqliteEmployeeRepository;
pub use maintenance_repo::SqliteMaintenanceRepository;
pub use pool::{Config, Database};
pub use retry::RetryPolicy;
