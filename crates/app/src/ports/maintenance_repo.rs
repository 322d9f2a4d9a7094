//! Maintenance repository port.

use std::future::Future;

use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, MaintenanceLogId};
use inventory_domain::lifecycle::{MaintenanceIntake, MaintenanceProgress};
use inventory_domain::maintenance::{MaintenanceDetails, MaintenanceLog};

/// Repository for [`MaintenanceLog`]s. Writes are atomic with the asset
/// transition they carry.
pub trait MaintenanceRepository {
    fn get_by_id(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceLog>, InventoryError>> + Send;

    fn get_details(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceDetails>, InventoryError>> + Send;

    /// All logs with their asset, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<MaintenanceDetails>, InventoryError>> + Send;

    /// Logs of one asset, newest first.
    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<MaintenanceLog>, InventoryError>> + Send;

    /// Insert the log and, when present, move the asset into maintenance.
    fn open(
        &self,
        plan: MaintenanceIntake,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send;

    /// Persist the new log status and, when present, free the asset.
    fn progress(
        &self,
        plan: MaintenanceProgress,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send;
}
