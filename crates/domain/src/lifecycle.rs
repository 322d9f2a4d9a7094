//! Lifecycle rules — how assignment and maintenance events move an asset
//! between statuses.
//!
//! Every rule is a pure function over the rows the caller has just read. It
//! either rejects the event or returns the rows to write, including an
//! [`AssetTransition`] pinned to the asset version that was checked. The
//! storage adapter applies the whole plan in one transaction and refuses it
//! if the asset moved on in the meantime.
//!
//! ```text
//! Available ──assign──▶ Assigned ──return / delete assignment──▶ Available
//! Available ──log maintenance──▶ InMaintenance ──complete──▶ Available
//! any ──direct update──▶ Retired | Lost
//! ```

use crate::asset::{Asset, AssetStatus};
use crate::assignment::{Assignment, AssignmentStatus, NewAssignment};
use crate::employee::Employee;
use crate::error::{InvalidStateError, InventoryError};
use crate::id::{AssetId, Version};
use crate::maintenance::{
    MaintenanceLog, MaintenanceRequest, MaintenanceStatus, NewMaintenanceLog,
};
use crate::time::Timestamp;

/// A status write on an asset, valid only while the asset is still at
/// `expected_version`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetTransition {
    pub asset_id: AssetId,
    pub expected_version: Version,
    pub status: AssetStatus,
}

impl AssetTransition {
    fn of(asset: &Asset, status: AssetStatus) -> Self {
        Self {
            asset_id: asset.id,
            expected_version: asset.version,
            status,
        }
    }
}

/// Rows written when an asset is handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub assignment: NewAssignment,
    pub asset: AssetTransition,
}

/// Rows written when an asset comes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Checkin {
    pub assignment: Assignment,
    pub asset: AssetTransition,
}

/// Rows written when maintenance is logged.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceIntake {
    pub log: NewMaintenanceLog,
    /// `None` when the asset is already in maintenance.
    pub asset: Option<AssetTransition>,
}

/// Rows written when a maintenance log changes status.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceProgress {
    pub log: MaintenanceLog,
    /// `Some` only when the log is completed.
    pub asset: Option<AssetTransition>,
}

/// Hand `asset` to `employee`.
///
/// # Errors
///
/// Returns [`InvalidStateError::AssetUnavailable`] unless the asset is
/// [`AssetStatus::Available`].
pub fn check_out(
    asset: &Asset,
    employee: &Employee,
    notes: Option<String>,
    at: Timestamp,
) -> Result<Checkout, InventoryError> {
    if asset.status != AssetStatus::Available {
        return Err(InvalidStateError::AssetUnavailable {
            asset_id: asset.id.get(),
            status: asset.status,
        }
        .into());
    }

    Ok(Checkout {
        assignment: NewAssignment {
            asset_id: asset.id,
            employee_id: employee.id,
            assigned_date: at,
            notes: notes.unwrap_or_default(),
            status: AssignmentStatus::Active,
        },
        asset: AssetTransition::of(asset, AssetStatus::Assigned),
    })
}

/// Close `assignment` and put its asset back on the shelf.
///
/// # Errors
///
/// Returns [`InvalidStateError::AlreadyReturned`] when the assignment already
/// carries a return date.
pub fn check_in(
    assignment: &Assignment,
    asset: &Asset,
    at: Timestamp,
) -> Result<Checkin, InventoryError> {
    if !assignment.is_open() {
        return Err(InvalidStateError::AlreadyReturned {
            assignment_id: assignment.id.get(),
        }
        .into());
    }

    let mut returned = assignment.clone();
    returned.return_date = Some(at);
    returned.status = AssignmentStatus::Returned;

    Ok(Checkin {
        assignment: returned,
        asset: AssetTransition::of(asset, AssetStatus::Available),
    })
}

/// Asset write that accompanies deleting an assignment.
///
/// The asset goes back to [`AssetStatus::Available`] whatever its current
/// status.
#[must_use]
pub fn release(asset: &Asset) -> AssetTransition {
    AssetTransition::of(asset, AssetStatus::Available)
}

/// Refuse to delete an asset that is out with an employee.
///
/// # Errors
///
/// Returns [`InvalidStateError::AssetInUse`] when the asset is
/// [`AssetStatus::Assigned`].
pub fn ensure_deletable(asset: &Asset) -> Result<(), InventoryError> {
    if asset.status == AssetStatus::Assigned {
        return Err(InvalidStateError::AssetInUse {
            asset_id: asset.id.get(),
        }
        .into());
    }
    Ok(())
}

/// Open a maintenance log for `asset`.
///
/// # Errors
///
/// Returns [`InventoryError::Validation`] when the request is invalid.
pub fn open_maintenance(
    asset: &Asset,
    request: MaintenanceRequest,
    at: Timestamp,
) -> Result<MaintenanceIntake, InventoryError> {
    request.validate()?;

    let transition = (asset.status != AssetStatus::InMaintenance)
        .then(|| AssetTransition::of(asset, AssetStatus::InMaintenance));

    Ok(MaintenanceIntake {
        log: NewMaintenanceLog {
            asset_id: asset.id,
            maintenance_date: at,
            description: request.description,
            technician: request
                .technician
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Unassigned".to_string()),
            cost: request.cost,
            status: MaintenanceStatus::Pending,
        },
        asset: transition,
    })
}

/// Move `log` to `status`; completing it frees the asset.
#[must_use]
pub fn progress_maintenance(
    log: &MaintenanceLog,
    asset: &Asset,
    status: MaintenanceStatus,
) -> MaintenanceProgress {
    let mut updated = log.clone();
    updated.status = status;

    MaintenanceProgress {
        log: updated,
        asset: (status == MaintenanceStatus::Completed)
            .then(|| AssetTransition::of(asset, AssetStatus::Available)),
    }
}
