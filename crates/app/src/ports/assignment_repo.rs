//! Assignment repository port.
//!
//! Reads return [`AssignmentDetails`] with the linked asset and employee.
//! Writes take a plan produced by [`inventory_domain::lifecycle`] and apply
//! it atomically: either every row in the plan is written or none is.

use std::future::Future;

use inventory_domain::assignment::{Assignment, AssignmentDetails};
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, AssignmentId};
use inventory_domain::lifecycle::{AssetTransition, Checkin, Checkout};

/// Narrowing applied by [`AssignmentRepository::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentFilter {
    /// Case-insensitive substring of the asset name or employee full name.
    pub search: Option<String>,
}

pub trait AssignmentRepository {
    fn get_by_id(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<Assignment>, InventoryError>> + Send;

    fn get_details(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<AssignmentDetails>, InventoryError>> + Send;

    /// Newest assignment first.
    fn list(
        &self,
        filter: AssignmentFilter,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send;

    /// Every assignment of one asset, newest first.
    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send;

    /// Insert the assignment and move the asset, in one transaction.
    ///
    /// Fails with `Conflict` if the asset moved past the checked version and
    /// with `InvalidState` if the asset already has an active assignment.
    fn open(
        &self,
        plan: Checkout,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send;

    /// Persist the returned assignment and free the asset, in one transaction.
    fn close(
        &self,
        plan: Checkin,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send;

    /// Delete the assignment and apply `asset`, in one transaction.
    fn remove(
        &self,
        id: AssignmentId,
        asset: AssetTransition,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;
}
