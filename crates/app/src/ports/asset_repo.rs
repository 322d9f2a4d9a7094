//! Asset repository port — persistence for assets.

use std::future::Future;

use inventory_domain::asset::{Asset, AssetStatus, NewAsset};
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, Version};

/// Narrowing applied by [`AssetRepository::list`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetFilter {
    pub status: Option<AssetStatus>,
}

/// Repository for persisting and querying [`Asset`]s.
pub trait AssetRepository {
    /// Insert a new asset and return it with its assigned id and initial version.
    fn create(&self, asset: NewAsset) -> impl Future<Output = Result<Asset, InventoryError>> + Send;

    /// Get an asset by its identifier.
    fn get_by_id(
        &self,
        id: AssetId,
    ) -> impl Future<Output = Result<Option<Asset>, InventoryError>> + Send;

    /// List assets ordered by id.
    fn list(
        &self,
        filter: AssetFilter,
    ) -> impl Future<Output = Result<Vec<Asset>, InventoryError>> + Send;

    /// Overwrite every field of an asset.
    ///
    /// The write only applies while the stored row is still at
    /// `asset.version`; the returned asset carries the bumped version.
    /// A missed write is reported as `NotFound` when the row is gone and
    /// `Conflict` when it changed.
    fn update(&self, asset: Asset) -> impl Future<Output = Result<Asset, InventoryError>> + Send;

    /// Delete an asset that is still at `expected`, cascading to its
    /// assignments and maintenance logs.
    fn delete(
        &self,
        id: AssetId,
        expected: Version,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send;
}
