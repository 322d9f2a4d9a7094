//! Shared application state for axum handlers.

use std::sync::Arc;

use inventory_app::ports::{
    AssetRepository, AssignmentRepository, EmployeeRepository, HealthProbe,
    MaintenanceRepository,
};
use inventory_app::services::asset_service::AssetService;
use inventory_app::services::assignment_service::AssignmentService;
use inventory_app::services::employee_service::EmployeeService;
use inventory_app::services::health_service::HealthService;
use inventory_app::services::maintenance_service::MaintenanceService;

/// Application state shared across all axum handlers.
///
/// Generic over the asset (`A`), employee (`E`), assignment (`S`) and
/// maintenance (`M`) repositories and the health probe (`P`) to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<A, E, S, M, P> {
    pub asset_service: Arc<AssetService<A>>,
    pub employee_service: Arc<EmployeeService<E>>,
    pub assignment_service: Arc<AssignmentService<S, A, E>>,
    pub maintenance_service: Arc<MaintenanceService<M, A>>,
    pub health_service: Arc<HealthService<P>>,
}

impl<A, E, S, M, P> Clone for AppState<A, E, S, M, P> {
    fn clone(&self) -> Self {
        Self {
            asset_service: Arc::clone(&self.asset_service),
            employee_service: Arc::clone(&self.employee_service),
            assignment_service: Arc::clone(&self.assignment_service),
            maintenance_service: Arc::clone(&self.maintenance_service),
            health_service: Arc::clone(&self.health_service),
        }
    }
}

impl<A, E, S, M, P> AppState<A, E, S, M, P>
where
    A: AssetRepository + Send + Sync + 'static,
    E: EmployeeRepository + Send + Sync + 'static,
    S: AssignmentRepository + Send + Sync + 'static,
    M: MaintenanceRepository + Send + Sync + 'static,
    P: HealthProbe + Send + Sync + 'static,
{
    /// Create a new application state from service instances.
    pub fn new(
        asset_service: AssetService<A>,
        employee_service: EmployeeService<E>,
        assignment_service: AssignmentService<S, A, E>,
        maintenance_service: MaintenanceService<M, A>,
        health_service: HealthService<P>,
    ) -> Self {
        Self {
            asset_service: Arc::new(asset_service),
            employee_service: Arc::new(employee_service),
            assignment_service: Arc::new(assignment_service),
            maintenance_service: Arc::new(maintenance_service),
            health_service: Arc::new(health_service),
        }
    }
}
