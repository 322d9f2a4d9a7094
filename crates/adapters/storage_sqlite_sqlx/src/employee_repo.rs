//! `SQLite` implementation of [`EmployeeRepository`].

use std::future::Future;

use inventory_app::ports::{EmployeeFilter, EmployeeRepository};
use inventory_domain::employee::{Employee, NewEmployee};
use inventory_domain::error::{InventoryError, NotFoundError};
use inventory_domain::id::EmployeeId;
use inventory_domain::time::to_storage;
use sqlx::Sqlite;

use crate::error::StorageError;
use crate::guard::{self, EMPLOYEE_EXISTS};
use crate::pool::Database;
use crate::rows::{EmployeeRow, like_pattern};

const INSERT: &str = "INSERT INTO employees (first_name, last_name, email, department, hire_date, termination_date, is_active) VALUES (?, ?, ?, ?, ?, ?, ?)";
const SELECT_BY_ID: &str = "SELECT * FROM employees WHERE id = ?";
const SELECT_ALL: &str = "SELECT * FROM employees ORDER BY last_name, first_name, id";
const SEARCH: &str = r"SELECT * FROM employees
WHERE first_name LIKE ? ESCAPE '\'
   OR last_name LIKE ? ESCAPE '\'
   OR email LIKE ? ESCAPE '\'
   OR department LIKE ? ESCAPE '\'
ORDER BY last_name, first_name, id";
const UPDATE: &str = "UPDATE employees SET first_name = ?, last_name = ?, email = ?, department = ?, hire_date = ?, termination_date = ?, is_active = ?, version = version + 1 WHERE id = ? AND version = ?";
const RELEASE_HELD_ASSETS: &str = "UPDATE assets SET status = 0, version = version + 1 WHERE id IN (SELECT asset_id FROM assignments WHERE employee_id = ? AND status = 0)";
const DELETE: &str = "DELETE FROM employees WHERE id = ?";

/// `SQLite`-backed employee repository.
#[derive(Clone)]
pub struct SqliteEmployeeRepository {
    db: Database,
}

impl SqliteEmployeeRepository {
    /// Create a new repository using the given database handle.
    #[must_use]
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

impl EmployeeRepository for SqliteEmployeeRepository {
    fn create(
        &self,
        employee: NewEmployee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let result = sqlx::query(INSERT)
                .bind(&employee.first_name)
                .bind(&employee.last_name)
                .bind(&employee.email)
                .bind(&employee.department)
                .bind(to_storage(employee.hire_date))
                .bind(employee.termination_date.map(to_storage))
                .bind(employee.is_active)
                .execute(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(employee.persisted(EmployeeId::new(result.last_insert_rowid())))
        }
    }

    fn get_by_id(
        &self,
        id: EmployeeId,
    ) -> impl Future<Output = Result<Option<Employee>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let row: Option<EmployeeRow> = sqlx::query_as(SELECT_BY_ID)
                .bind(id.get())
                .fetch_optional(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(row.map(|r| r.0))
        }
    }

    fn list(
        &self,
        filter: EmployeeFilter,
    ) -> impl Future<Output = Result<Vec<Employee>, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut conn = db.acquire().await?;
            let query = match filter.search.as_deref().map(like_pattern) {
                Some(pattern) => sqlx::query_as::<Sqlite, EmployeeRow>(SEARCH)
                    .bind(pattern.clone())
                    .bind(pattern.clone())
                    .bind(pattern.clone())
                    .bind(pattern),
                None => sqlx::query_as::<Sqlite, EmployeeRow>(SELECT_ALL),
            };
            let rows = query
                .fetch_all(&mut *conn)
                .await
                .map_err(StorageError::from)?;

            Ok(rows.into_iter().map(|r| r.0).collect())
        }
    }

    fn update(
        &self,
        employee: Employee,
    ) -> impl Future<Output = Result<Employee, InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            let result = sqlx::query(UPDATE)
                .bind(&employee.first_name)
                .bind(&employee.last_name)
                .bind(&employee.email)
                .bind(&employee.department)
                .bind(to_storage(employee.hire_date))
                .bind(employee.termination_date.map(to_storage))
                .bind(employee.is_active)
                .bind(employee.id.get())
                .bind(employee.version.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(
                    guard::missed(&mut tx, EMPLOYEE_EXISTS, "Employee", employee.id.get()).await,
                );
            }
            tx.commit().await.map_err(StorageError::from)?;

            let version = employee.version.next();
            Ok(Employee {
                version,
                ..employee
            })
        }
    }

    fn delete(&self, id: EmployeeId) -> impl Future<Output = Result<(), InventoryError>> + Send {
        let db = self.db.clone();
        async move {
            let mut tx = db.begin().await?;
            let released = sqlx::query(RELEASE_HELD_ASSETS)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;
            let result = sqlx::query(DELETE)
                .bind(id.get())
                .execute(&mut *tx)
                .await
                .map_err(StorageError::from)?;

            if result.rows_affected() == 0 {
                return Err(NotFoundError {
                    entity: "Employee",
                    id: id.to_string(),
                }
                .into());
            }
            tx.commit().await.map_err(StorageError::from)?;

            tracing::debug!(
                employee_id = %id,
                released_assets = released.rows_affected(),
                "employee removed with their assignments"
            );
            Ok(())
        }
    }
}
