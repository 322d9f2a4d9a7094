//! Maintenance log — a record of service performed on an asset.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::error::{InventoryError, ValidationError};
use crate::id::{AssetId, MaintenanceLogId, Version};
use crate::status::define_status;
use crate::time::Timestamp;

define_status!(
    /// Status of a [`MaintenanceLog`].
    MaintenanceStatus, "maintenance status" {
        Pending = 0,
        InProgress = 1,
        Completed = 2,
        Cancelled = 3,
    }
);

/// A persisted maintenance log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceLog {
    pub id: MaintenanceLogId,
    pub asset_id: AssetId,
    pub maintenance_date: Timestamp,
    pub description: String,
    pub technician: String,
    pub cost: Decimal,
    pub status: MaintenanceStatus,
    pub version: Version,
}

/// What a caller supplies when logging maintenance.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceRequest {
    pub asset_id: AssetId,
    pub description: String,
    pub technician: Option<String>,
    pub cost: Decimal,
}

impl MaintenanceRequest {
    /// Check field rules.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] when the cost is negative.
    pub fn validate(&self) -> Result<(), InventoryError> {
        if self.cost < Decimal::ZERO {
            return Err(ValidationError::NegativeAmount { field: "cost" }.into());
        }
        Ok(())
    }
}

/// A maintenance log awaiting its surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaintenanceLog {
    pub asset_id: AssetId,
    pub maintenance_date: Timestamp,
    pub description: String,
    pub technician: String,
    pub cost: Decimal,
    pub status: MaintenanceStatus,
}

impl NewMaintenanceLog {
    /// Attach the key assigned by the datastore.
    #[must_use]
    pub fn persisted(self, id: MaintenanceLogId) -> MaintenanceLog {
        MaintenanceLog {
            id,
            asset_id: self.asset_id,
            maintenance_date: self.maintenance_date,
            description: self.description,
            technician: self.technician,
            cost: self.cost,
            status: self.status,
            version: Version::INITIAL,
        }
    }
}

/// A log read together with the asset it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaintenanceDetails {
    #[serde(flatten)]
    pub log: MaintenanceLog,
    pub asset: Asset,
}
