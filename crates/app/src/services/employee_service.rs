//! Employee service — use-cases for managing employees.

use inventory_domain::employee::{Employee, NewEmployee};
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::EmployeeId;

use crate::ports::{EmployeeFilter, EmployeeRepository};

/// Application service for employee CRUD operations.
pub struct EmployeeService<R> {
    repo: R,
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new employee.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, employee), fields(email = %employee.email))]
    pub async fn create_employee(&self, employee: NewEmployee) -> Result<Employee, InventoryError> {
        employee.validate()?;
        self.repo.create(employee).await
    }

    /// Look up an employee by id.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when no employee with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_employee(&self, id: EmployeeId) -> Result<Employee, InventoryError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Employee",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List employees, optionally narrowed by a search term.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_employees(
        &self,
        filter: EmployeeFilter,
    ) -> Result<Vec<Employee>, InventoryError> {
        self.repo.list(filter).await
    }

    /// Overwrite an employee, conditioned on the version it carries.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if invariants fail,
    /// [`InventoryError::NotFound`] or [`InventoryError::Conflict`] from the
    /// repository.
    #[tracing::instrument(skip(self, employee), fields(employee_id = %employee.id))]
    pub async fn update_employee(&self, employee: Employee) -> Result<Employee, InventoryError> {
        employee.validate()?;
        self.repo.update(employee).await
    }

    /// Delete an employee and their assignments.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the employee is missing.
    #[tracing::instrument(skip(self))]
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), InventoryError> {
        self.repo.delete(id).await?;
        tracing::info!(employee_id = %id, "employee deleted");
        Ok(())
    }
}
