//! `SQLite` implementation of [`AssignmentRepository`].

use std::future::Future;

use inventory_app::ports::{AssignmentFilter, AssignmentRepository};
use inventory_domain::assignment::{Assignment, AssignmentDetails};
use inventory_domain::error::{InvalidStateError, InventoryError, NotFoundError};
use inventory_domain::id::{AssetId, AssignmentId};
use inventory_domain::lifecycle::{AssetTransition, Checkin, Checkout};
use inventory_domain::time::to_storage;
use sqlx::Sqlite;

use crate::error::{StorageError, is_unique_violation};
use crate::guard::{self, ASSIGNMENT_EXISTS};
use crate::pool::Database;
use crate::rows::{AssignmentDetailsRow, AssignmentRow, like_pattern};

/// Assignment joined with its asset and employee, followed by `$tail`.
macro_rules! with_details {
    ($tail:literal) => {
        concat!(
            "SELECT a.*, ",
            "s.id AS asset__id, s.name AS asset__name, s.asset_type AS asset__asset_type, ",
            "s.serial_number AS asset__serial_number, s.purchase_date AS asset__purchase_date, ",
            "s.purchase_cost AS asset__purchase_cost, s.status AS asset__status, s.version AS asset__version, ",
            "e.id AS employee__id, e.first_name AS employee__first_name, e.last_name AS employee__last_name, ",
            "e.email AS employee__email, e.department AS employee__department, e.hire_date AS employee__hire_date, ",
            "e.termination_date AS employee__termination_date, e.is_active AS employee__is_active, ",
            "e.version AS employee__version ",
            "FROM assignments a ",
            "JOIN assets s ON s.id = a.asset_id ",
            "JOIN employees e ON e.id = a.employee_id ",
            $tail
        )
    };
}

const INSERT: &str = "INSERT INTO assignments (asset_id, employee_id, assigned_date, return_date, notes, status) VALUES (?, ?, ?, NULL, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM assignments WHERE id = ?";
const SELECT_DETAILS_BY_ID: &str = with_details!("WHERE a.id = ?");
const SELECT_DETAILS_ALL: &str = with_details!("ORDER BY a.assigned_date DESC, a.id DESC");
const SEARCH_DETAILS: &str = with_details!(
    r"WHERE s.name LIKE ? ESCAPE '\' OR (e.first_name || ' ' || e.last_name) LIKE ? ESCAPE '\' ORDER BY a.assigned_date DESC, a.id DESC"
);
const SELECT_DETAILS_BY_ASSET: &str =
    with_details!("WHERE a.asset_id = ? ORDER BY a.assigned_date DESC, a.id DESC");
const CLOSE: &str = "UPDATE assignments SET return_date = ?, status = ?, notes = ?, version = version + 1 WHERE id = ? AND version = ?";
const DELETE: &str = "DELETE FROM assignments WHERE id = ?";

/// `SQLite`-backed assignment repository.
#[derive(Clone)]
pub struct SqliteAssignmentRepository {
    db: Database,
}

impl SqliteAssignmentRepository {
    /// Create a new repository using the given database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl AssignmentRepository for SqliteAssignmentRepository {
    fn get_by_id(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<Assignment>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<AssignmentRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn get_details(
        &self,
        id: AssignmentId,
    ) -> impl Future<Output = Result<Option<AssignmentDetails>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<AssignmentDetailsRow> = sqlx::query_as(SELECT_DETAILS_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list(
        &self,
        filter: AssignmentFilter,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let query = match filter.search.as_deref().map(like_pattern) {
                Some(pattern) => sqlx::query_as::<Sqlite, AssignmentDetailsRow>(SEARCH_DETAILS)
                    .bind(pattern.clone())
                    .bind(pattern),
                None => sqlx::query_as::<Sqlite, AssignmentDetailsRow>(SELECT_DETAILS_ALL),
            };
            let rows = query
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn find_by_asset(
        &self,
        asset_id: AssetId,
    ) -> impl Future<Output = Result<Vec<AssignmentDetails>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let rows: Vec<AssignmentDetailsRow> = sqlx::query_as(SELECT_DETAILS_BY_ASSET)
                .bind(asset_id.get())
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn open(
        &self,
        plan: Checkout,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            guard::apply_transition(&mut tx, &plan.asset).await?;

            let new = plan.assignment;
            let result = sqlx::query(INSERT)
                .bind(new.asset_id.get())
                .bind(new.employee_id.get())
                .bind(to_storage(new.assigned_date))
                .bind(&new.notes)
                .bind(new.status.code())
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    if is_unique_violation(&err) {
                        InvalidStateError::AssetAlreadyAssigned {
                            asset_id: new.asset_id.get(),
                        }
                        .into()
                    } else {
                        InventoryError::from(StorageError::from(err))
                    }
                })?;
            tx.commit().await.map_err(StorageError::from)?;

            Ok(new.persisted(AssignmentId::new(result.last_insert_rowid())))
        }
    }

    fn close(
        &self,
        plan: Checkin,
    ) -> impl Future<Output = Result<Assignment, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let assignment = plan.assignment;
            let mut tx = db.begin().await?;
            let result = sqlx::query(CLOSE)
                .bind(assignment.return_date.map(to_storage))
                .bind(assignment.status.code())
                .bind(&assignment.notes)
                .bind(assignment.id.get())
                .bind(assignment.version.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(guard::missed(
                    &mut tx,
                    ASSIGNMENT_EXISTS,
                    "Assignment",
                    assignment.id.get(),
                )
                .await);
            }
            guard::apply_transition(&mut tx, &plan.asset).await?;
            tx.commit().await.map_err(StorageError::from)?;

            let version = assignment.version.next();
            Ok(Assignment {
                version,
                ..assignment
            })
        }
    }

    fn remove(
        &self,
        id: AssignmentId,
        asset: AssetTransition,
    ) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            let result = sqlx::query(DELETE)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Assignment",
                    id: id.to_string(),
                }
                .into());
            }
            guard::apply_transition(&mut tx, &asset).await?;
            tx.commit().await.map_err(StorageError::from)?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use inventory_app::ports::{AssetRepository, EmployeeRepository, MaintenanceRepository};
    use inventory_domain::asset::{Asset, AssetStatus};
    use inventory_domain::assignment::AssignmentStatus;
    use inventory_domain::employee::Employee;
    use inventory_domain::lifecycle;
    use inventory_domain::maintenance::MaintenanceRequest;
    use inventory_domain::time::now;
    use rust_decimal::Decimal;

    use super::*;
    use crate::asset_repo::SqliteAssetRepository;
    use crate::employee_repo::SqliteEmployeeRepository;
    use crate::maintenance_repo::SqliteMaintenanceRepository;
    use crate::pool::Config;

    struct Fixture {
        assets: SqliteAssetRepository,
        employees: SqliteEmployeeRepository,
        repo: SqliteAssignmentRepository,
        asset: Asset,
        employee: Employee,
    }

    async fn setup() -> Fixture {
        let db = Config::new("sqlite::memory:").build().await.unwrap();
        let assets = SqliteAssetRepository::new(db.clone());
        let employees = SqliteEmployeeRepository::new(db.clone());
        let asset = assets
            .create(Asset::builder().name("Laptop-1").build().unwrap())
            .await
            .unwrap();
        let employee = employees
            .create(
                Employee::builder()
                    .first_name("Ada")
                    .last_name("Lovelace")
                    .email("ada@example.com")
                    .build()
                    .unwrap(),
            )
            .await
            .unwrap();
        Fixture {
            repo: SqliteAssignmentRepository::new(db),
            assets,
            employees,
            asset,
            employee,
        }
    }

    async fn check_out(f: &Fixture) -> Assignment {
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        let plan = lifecycle::check_out(&asset, &f.employee, Some("desk 4".into()), now()).unwrap();
        f.repo.open(plan).await.unwrap()
    }

    #[tokio::test]
    async fn should_open_assignment_and_mark_asset_assigned_atomically() {
        let f = setup().await;

        let assignment = check_out(&f).await;

        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        assert_eq!(asset.status, AssetStatus::Assigned);
        assert_eq!(asset.version, f.asset.version.next());

        let details = f.repo.get_details(assignment.id).await.unwrap().unwrap();
        assert_eq!(details.assignment.status, AssignmentStatus::Active);
        assert_eq!(details.assignment.notes, "desk 4");
        assert_eq!(details.asset.name, "Laptop-1");
        assert_eq!(details.employee.email, "ada@example.com");
    }

    #[tokio::test]
    async fn should_conflict_when_plan_pinned_to_old_asset_version() {
        let f = setup().await;
        let stale = lifecycle::check_out(&f.asset, &f.employee, None, now()).unwrap();
        let mut renamed = f.asset.clone();
        renamed.name = "Laptop-1b".to_string();
        f.assets.update(renamed).await.unwrap();

        let result = f.repo.open(stale).await;

        assert!(matches!(result, Err(InventoryError::Conflict(_))));
        assert!(f.repo.find_by_asset(f.asset.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_reject_second_active_assignment_through_unique_index() {
        let f = setup().await;
        check_out(&f).await;

        // Force the asset back to Available without closing the assignment.
        let mut asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        asset.status = AssetStatus::Available;
        let asset = f.assets.update(asset).await.unwrap();

        let plan = lifecycle::check_out(&asset, &f.employee, None, now()).unwrap();
        let result = f.repo.open(plan).await;

        assert!(matches!(
            result,
            Err(InventoryError::InvalidState(InvalidStateError::AssetAlreadyAssigned { .. }))
        ));
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        assert_eq!(asset.status, AssetStatus::Available, "rolled back");
    }

    #[tokio::test]
    async fn should_close_assignment_and_free_asset() {
        let f = setup().await;
        let assignment = check_out(&f).await;
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();

        let plan = lifecycle::check_in(&assignment, &asset, now()).unwrap();
        let closed = f.repo.close(plan).await.unwrap();

        let stored = f.repo.get_by_id(assignment.id).await.unwrap().unwrap();
        assert_eq!(stored, closed);
        assert_eq!(stored.status, AssignmentStatus::Returned);
        assert!(stored.return_date.is_some());
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        assert_eq!(asset.status, AssetStatus::Available);
    }

    #[tokio::test]
    async fn should_remove_assignment_and_reset_asset() {
        let f = setup().await;
        let assignment = check_out(&f).await;
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();

        f.repo
            .remove(assignment.id, lifecycle::release(&asset))
            .await
            .unwrap();

        assert!(f.repo.get_by_id(assignment.id).await.unwrap().is_none());
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        assert_eq!(asset.status, AssetStatus::Available);
    }

    #[tokio::test]
    async fn should_search_by_asset_name_or_employee_full_name() {
        let f = setup().await;
        check_out(&f).await;

        let search = |q: &str| AssignmentFilter {
            search: Some(q.to_string()),
        };
        assert_eq!(f.repo.list(search("laptop")).await.unwrap().len(), 1);
        assert_eq!(f.repo.list(search("ada lovelace")).await.unwrap().len(), 1);
        assert!(f.repo.list(search("grace")).await.unwrap().is_empty());
        assert_eq!(f.repo.list(AssignmentFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn should_cascade_when_asset_deleted() {
        let f = setup().await;
        let assignment = check_out(&f).await;
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        let plan = lifecycle::check_in(&assignment, &asset, now()).unwrap();
        f.repo.close(plan).await.unwrap();

        let logs = SqliteMaintenanceRepository::new(f.repo.db.clone());
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        let intake = lifecycle::open_maintenance(
            &asset,
            MaintenanceRequest {
                asset_id: asset.id,
                description: "Fan noise".to_string(),
                technician: None,
                cost: Decimal::ZERO,
            },
            now(),
        )
        .unwrap();
        let log = logs.open(intake).await.unwrap();

        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        f.assets.delete(asset.id, asset.version).await.unwrap();

        assert!(f.repo.get_by_id(assignment.id).await.unwrap().is_none());
        assert!(MaintenanceRepository::get_by_id(&logs, log.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_release_assets_and_cascade_when_employee_deleted() {
        let f = setup().await;
        let assignment = check_out(&f).await;

        f.employees.delete(f.employee.id).await.unwrap();

        assert!(f.repo.get_by_id(assignment.id).await.unwrap().is_none());
        let asset = f.assets.get_by_id(f.asset.id).await.unwrap().unwrap();
        assert_eq!(asset.status, AssetStatus::Available);
    }
}
