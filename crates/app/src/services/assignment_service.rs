//! Assignment service — handing assets to employees and getting them back.
//!
//! Every write reads the rows involved, asks [`lifecycle`] for a plan, then
//! commits the plan through one [`AssignmentRepository`] call. The plan is
//! pinned to the asset version that was checked, so a racing writer turns
//! into a `Conflict` instead of a second active assignment.

use inventory_domain::assignment::{Assignment, AssignmentDetails};
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::{AssetId, AssignmentId, EmployeeId};
use inventory_domain::lifecycle;
use inventory_domain::time::now;

use crate::ports::{AssetRepository, AssignmentFilter, AssignmentRepository, EmployeeRepository};

fn not_found(entity: &'static str, id: impl ToString) -> InventoryError {
    NotFoundError {
        entity,
        id: id.to_string(),
    }
    .into()
}

/// Application service for the assignment lifecycle.
pub struct AssignmentService<S, A, E> {
    assignments: S,
    assets: A,
    employees: E,
}

impl<S, A, E> AssignmentService<S, A, E>
where
    S: AssignmentRepository,
    A: AssetRepository,
    E: EmployeeRepository,
{
    pub fn new(assignments: S, assets: A, employees: E) -> Self {
        Self {
            assignments,
            assets,
            employees,
        }
    }

    /// Assign an available asset to an employee.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the asset or the employee is
    /// missing, [`InventoryError::InvalidState`] when the asset is not
    /// available, or [`InventoryError::Conflict`] when the asset changed
    /// while the assignment was being recorded.
    #[tracing::instrument(skip(self, notes))]
    pub async fn create_assignment(
        &self,
        asset_id: AssetId,
        employee_id: EmployeeId,
        notes: Option<String>,
    ) -> Result<Assignment, InventoryError> {
        let asset = self
            .assets
            .get_by_id(asset_id)
            .await?
            .ok_or_else(|| not_found("Asset", asset_id))?;
        let employee = self
            .employees
            .get_by_id(employee_id)
            .await?
            .ok_or_else(|| not_found("Employee", employee_id))?;

        let plan = lifecycle::check_out(&asset, &employee, notes, now())?;
        let assignment = self.assignments.open(plan).await?;
        tracing::info!(
            assignment_id = %assignment.id,
            asset_id = %asset_id,
            employee_id = %employee_id,
            "asset assigned"
        );
        Ok(assignment)
    }

    /// Mark an assignment returned and put its asset back to `Available`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the assignment is missing and
    /// [`InventoryError::InvalidState`] when it was already returned.
    #[tracing::instrument(skip(self))]
    pub async fn return_assignment(&self, id: AssignmentId) -> Result<Assignment, InventoryError> {
        let assignment = self
            .assignments
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found("Assignment", id))?;
        let asset = self
            .assets
            .get_by_id(assignment.asset_id)
            .await?
            .ok_or_else(|| not_found("Asset", assignment.asset_id))?;

        let plan = lifecycle::check_in(&assignment, &asset, now())?;
        let returned = self.assignments.close(plan).await?;
        tracing::info!(assignment_id = %id, asset_id = %asset.id, "asset returned");
        Ok(returned)
    }

    /// Delete an assignment. Its asset goes back to `Available`.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the assignment is missing.
    #[tracing::instrument(skip(self))]
    pub async fn delete_assignment(&self, id: AssignmentId) -> Result<(), InventoryError> {
        let assignment = self
            .assignments
            .get_by_id(id)
            .await?
            .ok_or_else(|| not_found("Assignment", id))?;
        let asset = self
            .assets
            .get_by_id(assignment.asset_id)
            .await?
            .ok_or_else(|| not_found("Asset", assignment.asset_id))?;

        self.assignments
            .remove(id, lifecycle::release(&asset))
            .await?;
        tracing::info!(assignment_id = %id, asset_id = %asset.id, "assignment deleted");
        Ok(())
    }

    /// Look up an assignment with its asset and employee.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when no assignment with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_assignment(
        &self,
        id: AssignmentId,
    ) -> Result<AssignmentDetails, InventoryError> {
        self.assignments
            .get_details(id)
            .await?
            .ok_or_else(|| not_found("Assignment", id))
    }

    /// List assignments, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_assignments(
        &self,
        filter: AssignmentFilter,
    ) -> Result<Vec<AssignmentDetails>, InventoryError> {
        self.assignments.list(filter).await
    }

    /// Assignment history of one asset, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the asset has never been
    /// assigned.
    #[tracing::instrument(skip(self))]
    pub async fn assignments_for_asset(
        &self,
        asset_id: AssetId,
    ) -> Result<Vec<AssignmentDetails>, InventoryError> {
        let history = self.assignments.find_by_asset(asset_id).await?;
        if history.is_empty() {
            return Err(NotFoundError {
                entity: "Assignments for asset",
                id: asset_id.to_string(),
            }
            .into());
        }
        Ok(history)
    }
}
