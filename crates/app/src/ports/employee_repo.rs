//! Employee repository port — persistence for employees.

use std::future::Future;

use inventory_domain::employee::{Employee, NewEmployee};
use inventory_domain::error::InventoryError;
use inventory_domain::id::EmployeeId;

/// Narrowing applied by [`EmployeeRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilter {
    /// Case-insensitive substring of first name, last name, email or department.
    pub search: Option<String>,
}

/// Repository for persisting and querying [`Employee`]s.
pub trait EmployeeRepository {
    /// Insert a new employee.
    fn create(
        &self,
        employee: NewEmployee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send;

    /// Get an employee by its identifier.
    fn get_by_id(
        &self,
        id: EmployeeId,
    ) -> impl Future<Output = Result<Option<Employee>, InventoryError>> + Send;

    /// List employees ordered by last name, then first name.
    fn list(
        &self,
        filter: EmployeeFilter,
    ) -> impl Future<Output = Result<Vec<Employee>, InventoryError>> + Send;

    /// Version-checked full update, same contract as
    /// [`AssetRepository::update`](super::AssetRepository::update).
    fn update(
        &self,
        employee: Employee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send;

    /// Delete an employee together with their assignments.
    ///
    /// Assets held through an active assignment go back to `Available`.
    fn delete(&self, id: EmployeeId) -> impl Future<Output = Result<(), InventoryError>> + Send;
}
