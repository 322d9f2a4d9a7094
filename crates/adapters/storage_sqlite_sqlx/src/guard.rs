//! Version-guarded writes.
//!
//! Every conditional `UPDATE`/`DELETE` matches on `id` and `version`. When it
//! touches no row, [`missed`] asks the same transaction whether the row still
//! exists to tell a deleted row from a concurrent modification.

use inventory_domain::error::{ConflictError, InventoryError, NotFoundError};
use inventory_domain::lifecycle::AssetTransition;
use sqlx::SqliteConnection;

use crate::error::StorageError;

const UPDATE_ASSET_STATUS: &str =
    "UPDATE assets SET status = ?, version = version + 1 WHERE id = ? AND version = ?";

/// Existence probes, one per versioned table.
pub(crate) const ASSET_EXISTS: &str = "SELECT 1 FROM assets WHERE id = ?";
pub(crate) const EMPLOYEE_EXISTS: &str = "SELECT 1 FROM employees WHERE id = ?";
pub(crate) const ASSIGNMENT_EXISTS: &str = "SELECT 1 FROM assignments WHERE id = ?";
pub(crate) const MAINTENANCE_LOG_EXISTS: &str = "SELECT 1 FROM maintenance_logs WHERE id = ?";

/// Explain why a version-guarded write on `entity` `id` touched no row.
pub(crate) async fn missed(
    conn: &mut SqliteConnection,
    exists: &'static str,
    entity: &'static str,
    id: i64,
) -> InventoryError {
    let found: Result<Option<i64>, sqlx::Error> = sqlx::query_scalar(exists)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await;

    match found {
        Ok(Some(_)) => ConflictError {
            entity,
            id: id.to_string(),
        }
        .into(),
        Ok(None) => NotFoundError {
            entity,
            id: id.to_string(),
        }
        .into(),
        Err(err) => StorageError::from(err).into(),
    }
}

/// Move an asset to a new status, provided it is still at the checked version.
pub(crate) async fn apply_transition(
    conn: &mut SqliteConnection,
    transition: &AssetTransition,
) -> Result<(), InventoryError> {
    let result = sqlx::query(UPDATE_ASSET_STATUS)
        .bind(transition.status.code())
        .bind(transition.asset_id.get())
        .bind(transition.expected_version.get())
        .execute(&mut *conn)
        .await
        .map_err(StorageError::from)?;

    if result.rows_affected() == 0 {
        return Err(missed(conn, ASSET_EXISTS, "Asset", transition.asset_id.get()).await);
    }

    tracing::debug!(
        asset_id = %transition.asset_id,
        status = %transition.status,
        "asset status changed"
    );
    Ok(())
}
