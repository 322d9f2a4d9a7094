//! `SQLite` implementation of [`AssetRepository`].

use std::future::Future;

use inventory_app::ports::{AssetFilter, AssetRepository};
use inventory_domain::asset::{Asset, NewAsset};
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, Version};
use inventory_domain::time::to_storage;
use sqlx::Sqlite;

use crate::error::StorageError;
use crate::guard::{self, ASSET_EXISTS};
use crate::pool::Database;
use crate::rows::AssetRow;

const INSERT: &str = "INSERT INTO assets (name, asset_type, serial_number, purchase_date, purchase_cost, status) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM assets WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM assets ORDER BY id";
const SELECT_BY_STATUS: &str = "SELECT * FROM assets WHERE status = ? ORDER BY id";
const UPDATE: &str = "UPDATE assets SET name = ?, asset_type = ?, serial_number = ?, purchase_date = ?, purchase_cost = ?, status = ?, version = version + 1 WHERE id = ? AND version = ?";
const DELETE: &str = "DELETE FROM assets WHERE id = ? AND version = ?";

/// `SQLite`-backed asset repository.
#[derive(Clone)]
pub struct SqliteAssetRepository {
    db: Database,
}

impl SqliteAssetRepository {
    /// Create a new repository using the given database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl AssetRepository for SqliteAssetRepository {
    fn create(&self, asset: NewAsset) -> impl Future<Output = Result<Asset, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let result = sqlx::query(INSERT)
                .bind(&asset.name)
                .bind(&asset.asset_type)
                .bind(&asset.serial_number)
                .bind(to_storage(asset.purchase_date))
                .bind(asset.purchase_cost.to_string())
                .bind(asset.status.code())
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(asset.persisted(AssetId::new(result.last_insert_rowid())))
        }
    }

    fn get_by_id(
        &self,
        id: AssetId,
    ) -> impl Future<Output = Result<Option<Asset>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<AssetRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list(
        &self,
        filter: AssetFilter,
    ) -> impl Future<Output = Result<Vec<Asset>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let query = match filter.status {
                Some(status) => {
                    sqlx::query_as::<Sqlite, AssetRow>(SELECT_BY_STATUS).bind(status.code())
                }
                None => sqlx::query_as::<Sqlite, AssetRow>(SELECT_ALL),
            };
            let rows = query
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn update(&self, asset: Asset) -> impl Future<Output = Result<Asset, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            let result = sqlx::query(UPDATE)
                .bind(&asset.name)
                .bind(&asset.asset_type)
                .bind(&asset.serial_number)
                .bind(to_storage(asset.purchase_date))
                .bind(asset.purchase_cost.to_string())
                .bind(asset.status.code())
                .bind(asset.id.get())
                .bind(asset.version.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(guard::missed(&mut tx, ASSET_EXISTS, "Asset", asset.id.get()).await);
            }
            tx.commit().await.map_err(StorageError::from)?;

            let version = asset.version.next();
            Ok(Asset { version, ..asset })
        }
    }

    fn delete(
        &self,
        id: AssetId,
        expected: Version,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            let result = sqlx::query(DELETE)
                .bind(id.get())
                .bind(expected.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(guard::missed(&mut tx, ASSET_EXISTS, "Asset", id.get()).await);
            }
            tx.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
    }
}
