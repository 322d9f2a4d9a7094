//! Asset service — use-cases for managing assets.

use inventory_domain::asset::{Asset, NewAsset};
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::AssetId;
use inventory_domain::lifecycle;

use crate::ports::{AssetFilter, AssetRepository};

/// Application service for asset CRUD operations.
pub struct AssetService<R> {
    repo: R,
}

impl<R: AssetRepository> AssetService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register a new asset after validating domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if invariants fail, or a
    /// storage error propagated from the repository.
    #[tracing::instrument(skip(self, asset), fields(asset_name = %asset.name))]
    pub async fn create_asset(&self, asset: NewAsset) -> Result<Asset, InventoryError> {
        asset.validate()?;
        let created = self.repo.create(asset).await?;
        tracing::info!(asset_id = %created.id, status = %created.status, "asset registered");
        Ok(created)
    }

    /// Look up an asset by id, returning an error if not found.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when no asset with `id` exists,
    /// or a storage error from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn get_asset(&self, id: AssetId) -> Result<Asset, InventoryError> {
        self.repo.get_by_id(id).await?.ok_or_else(|| {
            NotFoundError {
                entity: "Asset",
                id: id.to_string(),
            }
            .into()
        })
    }

    /// List assets, optionally narrowed to one status.
    ///
    /// # Errors
    ///
    /// Returns a storage error propagated from the repository.
    #[tracing::instrument(skip(self))]
    pub async fn list_assets(&self, filter: AssetFilter) -> Result<Vec<Asset>, InventoryError> {
        self.repo.list(filter).await
    }

    /// Overwrite an asset, conditioned on the version it carries.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if invariants fail,
    /// [`InventoryError::NotFound`] if the asset is gone, or
    /// [`InventoryError::Conflict`] if it changed since it was read.
    #[tracing::instrument(skip(self, asset), fields(asset_id = %asset.id, version = %asset.version))]
    pub async fn update_asset(&self, asset: Asset) -> Result<Asset, InventoryError> {
        asset.validate()?;
        self.repo.update(asset).await
    }

    /// Delete an asset and everything recorded against it.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::NotFound`] when the asset is missing and
    /// [`InventoryError::InvalidState`] while it is assigned.
    #[tracing::instrument(skip(self))]
    pub async fn delete_asset(&self, id: AssetId) -> Result<(), InventoryError> {
        let asset = self.get_asset(id).await?;
        lifecycle::ensure_deletable(&asset)?;
        self.repo.delete(id, asset.version).await?;
        tracing::info!(asset_id = %id, "asset deleted");
        Ok(())
    }
}
