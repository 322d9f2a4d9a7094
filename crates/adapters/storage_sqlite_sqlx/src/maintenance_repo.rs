//! `SQLite` implementation of [`MaintenanceRepository`].

use std::future::Future;

use inventory_app::ports::MaintenanceRepository;
use inventory_domain::error::InventoryError;
use inventory_domain::id::{AssetId, MaintenanceLogId};
use inventory_domain::lifecycle::{MaintenanceIntake, MaintenanceProgress};
use inventory_domain::maintenance::{MaintenanceDetails, MaintenanceLog};
use inventory_domain::time::to_storage;

use crate::error::StorageError;
use crate::guard::{self, MAINTENANCE_LOG_EXISTS};
use crate::pool::Database;
use crate::rows::{MaintenanceDetailsRow, MaintenanceLogRow};

/// Log joined with its asset, followed by `$tail`.
macro_rules! with_asset {
    ($tail:literal) => {
        concat!(
            "SELECT m.*, ",
            "s.id AS asset__id, s.name AS asset__name, s.asset_type AS asset__asset_type, ",
            "s.serial_number AS asset__serial_number, s.purchase_date AS asset__purchase_date, ",
            "s.purchase_cost AS asset__purchase_cost, s.status AS asset__status, s.version AS asset__version ",
            "FROM maintenance_logs m ",
            "JOIN assets s ON s.id = m.asset_id ",
            $tail
        )
    };
}

const INSERT: &str = "INSERT INTO maintenance_logs (asset_id, maintenance_date, description, technician, cost, status) VALUES (?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM maintenance_logs WHERE id = ?";
const SELECT_BY_ASSET: &str = "SELECT * FROM maintenance_logs WHERE asset_id = ? ORDER BY maintenance_date DESC, id DESC";
const SELECT_DETAILS_BY_ID: &str = with_asset!("WHERE m.id = ?");
const SELECT_DETAILS_ALL: &str = with_asset!("ORDER BY m.maintenance_date DESC, m.id DESC");
const UPDATE_STATUS: &str = "UPDATE maintenance_logs SET status = ?, version = version + 1 WHERE id = ? AND version = ?";

/// `SQLite`-backed maintenance log repository.
#[derive(Clone)]
pub struct SqliteMaintenanceRepository {
    db: Database,
}

impl SqliteMaintenanceRepository {
    /// Create a new repository using the given database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl MaintenanceRepository for SqliteMaintenanceRepository {
    fn get_by_id(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceLog>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<MaintenanceLogRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn get_details(
        &self,
        id: MaintenanceLogId,
    ) -> impl Future<Output = Result<Option<MaintenanceDetails>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<MaintenanceDetailsRow> = sqlx::query_as(SELECT_DETAILS_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list(&self) -> impl Future<Output = Result<Vec<MaintenanceDetails>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let rows: Vec<MaintenanceDetailsRow> = sqlx::query_as(SELECT_DETAILS_ALL)
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<MaintenanceLog>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let rows: Vec<MaintenanceLogRow> = sqlx::query_as(SELECT_BY_ASSET)
                .bind(asset_id.get())
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn open(
        &self,
        plan: MaintenanceIntake,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            if let Some(transition) = &plan.asset {
                guard::apply_transition(&mut tx, transition).await?;
            }

            let new = plan.log;
            let result = sqlx::query(INSERT)
                .bind(new.asset_id.get())
                .bind(to_storage(new.maintenance_date))
                .bind(&new.description)
                .bind(&new.technician)
                .bind(new.cost.to_string())
                .bind(new.status.code())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(new.persisted(MaintenanceLogId::new(result.last_insert_rowid())))
        }
    }

    fn progress(
        &self,
        plan: MaintenanceProgress,
    ) -> impl Future<Output = Result<MaintenanceLog, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let log = plan.log;
            let mut tx = db.begin().await?;
            let result = sqlx::query(UPDATE_STATUS)
                .bind(log.status.code())
                .bind(log.id.get())
                .bind(log.version.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(guard::missed(
                    &mut tx,
                    MAINTENANCE_LOG_EXISTS,
                    "MaintenanceLog",
                    log.id.get(),
                )
                .await);
            }
            if let Some(transition) = &plan.asset {
                guard::apply_transition(&mut tx, transition).await?;
            }
            tx.commit().await.map_err(StorageError::from)?;

            let version = log.version.next();
            Ok(MaintenanceLog { version, ..log })
        }
    }
}

#[cfg(test)]
mod tests {
    use inventory_app::ports::AssetRepository;
    use inventory_domain::asset::{Asset, AssetStatus};
    use inventory_domain::lifecycle;
    use inventory_domain::maintenance::{MaintenanceRequest, MaintenanceStatus};
    use inventory_domain::time::now;
    use rust_decimal::Decimal;

    use super::*;
    use crate::asset_repo::SqliteAssetRepository;
    use crate::pool::Config;

    async fn setup() -> (SqliteAssetRepository, SqliteMaintenanceRepository, Asset) {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        let assets = SqliteAssetRepository::new(db.clone());
        let asset = assets
            .create(Asset::builder().name("Printer").build().unwrap())
            .await
            .unwrap();
        (assets, SqliteMaintenanceRepository::new(db), asset)
    }

    async fn log(
        assets: &SqliteAssetRepository,
        repo: &SqliteMaintenanceRepository,
        asset_id: AssetId,
        description: &str,
    ) -> MaintenanceLog {
        let asset = assets.get_by_id(asset_id).await.unwrap().unwrap();
        let request = MaintenanceRequest {
            asset_id,
            description: description.to_string(),
            technician: Some("Grace".to_string()),
            cost: Decimal::new(1050, 2),
        };
        let plan = lifecycle::open_maintenance(&asset, request, now()).unwrap();
        repo.open(plan).await.unwrap()
    }

    #[tokio::test]
    async fn should_open_log_and_move_asset_into_maintenance() {
        let (assets, repo, asset) = setup().await;

        let created = log(&assets, &repo, asset.id, "Toner jam").await;

        let details = repo.get_details(created.id).await.unwrap().unwrap();
        assert_eq!(details.log, created);
        assert_eq!(details.log.cost, Decimal::new(1050, 2));
        assert_eq!(details.asset.status, AssetStatus::InMaintenance);
    }

    #[tokio::test]
    async fn should_not_bump_asset_when_already_in_maintenance() {
        let (assets, repo, asset) = setup().await;
        log(&assets, &repo, asset.id, "First").await;
        let before = assets.get_by_id(asset.id).await.unwrap().unwrap();

        log(&assets, &repo, asset.id, "Second").await;

        let after = assets.get_by_id(asset.id).await.unwrap().unwrap();
        assert_eq!(before.version, after.version);
    }

    #[tokio::test]
    async fn should_complete_log_and_free_asset() {
        let (assets, repo, asset) = setup().await;
        let created = log(&assets, &repo, asset.id, "Toner jam").await;
        let current = assets.get_by_id(asset.id).await.unwrap().unwrap();

        let plan = lifecycle::progress_maintenance(&created, &current, MaintenanceStatus::Completed);
        let updated = repo.progress(plan).await.unwrap();

        assert_eq!(updated.status, MaintenanceStatus::Completed);
        let current = assets.get_by_id(asset.id).await.unwrap().unwrap();
        assert_eq!(current.status, AssetStatus::Available);
    }

    #[tokio::test]
    async fn should_conflict_on_stale_log_version() {
        let (assets, repo, asset) = setup().await;
        let created = log(&assets, &repo, asset.id, "Toner jam").await;
        let current = assets.get_by_id(asset.id).await.unwrap().unwrap();

        let first = lifecycle::progress_maintenance(&created, &current, MaintenanceStatus::InProgress);
        repo.progress(first).await.unwrap();
        let second = lifecycle::progress_maintenance(&created, &current, MaintenanceStatus::Cancelled);

        let result = repo.progress(second).await;
        assert!(matches!(result, Err(InventoryError::Conflict(_))));
    }

    #[tokio::test]
    async fn should_list_asset_logs_newest_first() {
        let (assets, repo, asset) = setup().await;
        log(&assets, &repo, asset.id, "First").await;
        log(&assets, &repo, asset.id, "Second").await;

        let by_asset = repo.find_by_asset(asset.id).await.unwrap();
        let all = repo.list().await.unwrap();

        assert_eq!(by_asset[0].description, "Second");
        assert_eq!(by_asset[1].description, "First");
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].asset.name, "Printer");
    }
}
