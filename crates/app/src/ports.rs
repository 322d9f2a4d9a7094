//! Port definitions — traits that adapters implement.
//!
//! Ports are the boundaries between the application core and the outside world.
//! They are defined here (in `app`) so that both the use-case layer and the
//! adapter layer can depend on them without creating circular dependencies.

pub mod asset_repo;
pub mod assignment_repo;
pub mod employee_repo;
pub mod health;
pub mod maintenance_repo;

pub use asset_repo::{AssetFilter, AssetRepository};
pub use assignment_repo::{AssignmentFilter, AssignmentRepository};
pub use employee_repo::{EmployeeFilter, EmployeeRepository};
pub use health::HealthProbe;
pub use maintenance_repo::MaintenanceRepository;
