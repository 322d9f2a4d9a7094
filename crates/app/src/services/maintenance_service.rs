//! Maintenance service — logging service work and closing it out.

use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::{AssetId, MaintenanceLogId};
use inventory_domain::lifecycle;
use inventory_domain::maintenance::{
    MaintenanceDetails, MaintenanceLog, MaintenanceRequest, MaintenanceStatus,
};
use inventory_domain::time::now;

use crate::ports::{AssetRepository, MaintenanceRepository};

/// Application service for the maintenance lifecycle.
pub struct MaintenanceService<M, A> {
    logs: M,
    assets: A,
}

impl<M, A> MaintenanceService<M, A>
where
    M: MaintenanceRepository,
    A: AssetRepository,
{
    pub fn new(logs: M, assets: A) -> Self {
        Self { logs, assets }
    }

    /// Record maintenance on an asset and move it into maintenance.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the asset is missing,
    /// [`InventoryError::Validation`] for a negative cost, or
    /// [`InventoryError::Conflict`] when the asset changed concurrently.
    #[tracing::instrument(skip(self, request), fields(asset_id = %request.asset_id))]
    pub async fn log_maintenance(
        &self,
        request: MaintenanceRequest,
    ) -> Result<MaintenanceLog, InventoryError> {
        let asset = self
            .assets
            .get_by_id(request.asset_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Asset",
                id: request.asset_id.to_string(),
            })?;

        let plan = lifecycle::open_maintenance(&asset, request, now())?;
        let log = self.logs.open(plan).await?;
        tracing::info!(log_id = %log.id, asset_id = %asset.id, "maintenance logged");
        Ok(log)
    }

    /// Move a log to `status`. Completing it makes the asset available again.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the log or its asset is
    /// missing, or [`InventoryError::Conflict`] on a concurrent write.
    #[tracing::instrument(skip(self))]
    pub async fn set_maintenance_status(
        &self,
        id: MaintenanceLogId,
        status: MaintenanceStatus,
    ) -> Result<MaintenanceLog, InventoryError> {
        let log = self
            .logs
            .get_by_id(id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "MaintenanceLog",
                id: id.to_string(),
            })?;
        let asset = self
            .assets
            .get_by_id(log.asset_id)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Asset",
                id: log.asset_id.to_string(),
            })?;

        let plan = lifecycle::progress_maintenance(&log, &asset, status);
        let updated = self.logs.progress(plan).await?;
        tracing::info!(log_id = %id, %status, "maintenance status changed");
        Ok(updated)
    }

    /// Look up a log with its asset.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when no log with `id` exists.
    #[tracing::instrument(skip(self))]
    pub async fn get_maintenance_log(
        &self,
        id: MaintenanceLogId,
    ) -> Result<MaintenanceDetails, InventoryError> {
        self.logs.get_details(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "MaintenanceLog",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// Every log, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_maintenance_logs(&self) -> Result<Vec<MaintenanceDetails>, InventoryError> {
        self.logs.list().await
    }

    /// Logs of one asset, newest first. An asset with no history yields an
    /// empty list.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn maintenance_for_asset(
        &self,
        asset_id: AssetId,
    ) -> Result<Vec<MaintenanceLog>, InventoryError> {
        self.logs.find_by_asset(asset_id).await
    }
}
