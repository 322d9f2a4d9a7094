//! Asset — a trackable physical item with a lifecycle status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, ValidationError};
use crate::id::{AssetId, Version};
use crate::status::define_status;
use crate::time::{Timestamp, now};

define_status!(
    /// Lifecycle status of an [`Asset`].
    AssetStatus, "asset status" {
        /// On the shelf, can be handed out.
        Available = 0,
        /// Held by an employee through an active assignment.
        Assigned = 1,
        /// Being serviced.
        InMaintenance = 2,
        Retired = 3,
        Lost = 4,
    }
);

impl Default for AssetStatus {
    fn default() -> Self {
        Self::Available
    }
}

/// A persisted asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub name: String,
    #[serde(rename = "type")]
    pub asset_type: String,
    pub serial_number: String,
    pub purchase_date: Timestamp,
    pub purchase_cost: Decimal,
    pub status: AssetStatus,
    pub version: Version,
}

impl Asset {
    /// Create a builder for a not-yet-persisted asset.
    #[must_use]
    pub fn builder() -> AssetBuilder {
        AssetBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] when `name` is empty or the
    /// purchase cost is negative.
    pub fn validate(&self) -> Result<(), InventoryError> {
        validate_fields(&self.name, self.purchase_cost)
    }
}

/// An asset awaiting its surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAsset {
    pub name: String,
    pub asset_type: String,
    pub serial_number: String,
    pub purchase_date: Timestamp,
    pub purchase_cost: Decimal,
    pub status: AssetStatus,
}

impl NewAsset {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Same rules as [`Asset::validate`].
    pub fn validate(&self) -> Result<(), InventoryError> {
        validate_fields(&self.name, self.purchase_cost)
    }

    /// Attach the key assigned by the datastore.
    #[must_use]
    pub fn persisted(self, id: AssetId) -> Asset {
        Asset {
            id,
            name: self.name,
            asset_type: self.asset_type,
            serial_number: self.serial_number,
            purchase_date: self.purchase_date,
            purchase_cost: self.purchase_cost,
            status: self.status,
            version: Version::INITIAL,
        }
    }
}

fn validate_fields(name: &str, purchase_cost: Decimal) -> Result<(), InventoryError> {
    if name.trim().is_empty() {
        return Err(ValidationError::Required { field: "name" }.into());
    }
    if purchase_cost < Decimal::ZERO {
        return Err(ValidationError::NegativeAmount {
            field: "purchase_cost",
        }
        .into());
    }
    Ok(())
}

/// Step-by-step builder for [`NewAsset`].
#[derive(Debug, Default)]
pub struct AssetBuilder {
    name: Option<String>,
    asset_type: Option<String>,
    serial_number: Option<String>,
    purchase_date: Option<Timestamp>,
    purchase_cost: Option<Decimal>,
    status: Option<AssetStatus>,
}

impl AssetBuilder {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn asset_type(mut self, asset_type: impl Into<String>) -> Self {
        self.asset_type = Some(asset_type.into());
        self
    }

    #[must_use]
    pub fn serial_number(mut self, serial_number: impl Into<String>) -> Self {
        self.serial_number = Some(serial_number.into());
        self
    }

    #[must_use]
    pub fn purchase_date(mut self, purchase_date: Timestamp) -> Self {
        self.purchase_date = Some(purchase_date);
        self
    }

    #[must_use]
    pub fn purchase_cost(mut self, purchase_cost: Decimal) -> Self {
        self.purchase_cost = Some(purchase_cost);
        self
    }

    #[must_use]
    pub fn status(mut self, status: AssetStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Consume the builder, validate, and return a [`NewAsset`].
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if `name` is missing or the
    /// cost is negative.
    pub fn build(self) -> Result<NewAsset, InventoryError> {
        let asset = NewAsset {
            name: self.name.unwrap_or_default(),
            asset_type: self
                .asset_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "Unspecified".to_string()),
            serial_number: self.serial_number.unwrap_or_default(),
            purchase_date: self.purchase_date.unwrap_or_else(now),
            purchase_cost: self.purchase_cost.unwrap_or_default(),
            status: self.status.unwrap_or_default(),
        };
        asset.validate()?;
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_available_asset_with_defaults() {
        let asset = Asset::builder().name("Laptop-1").build().unwrap();
        assert_eq!(asset.status, AssetStatus::Available);
        assert_eq!(asset.asset_type, "Unspecified");
        assert_eq!(asset.purchase_cost, Decimal::ZERO);
    }

    #[test]
    fn should_return_validation_error_when_name_is_empty() {
        let result = Asset::builder().name("   ").build();
        assert!(matches!(
            result,
            Err(InventoryError::Validation(ValidationError::Required { field: "name" }))
        ));
    }

    #[test]
    fn should_reject_negative_purchase_cost() {
        let result = Asset::builder()
            .name("Monitor")
            .purchase_cost(Decimal::new(-100, 2))
            .build();
        assert!(matches!(
            result,
            Err(InventoryError::Validation(ValidationError::NegativeAmount { .. }))
        ));
    }

    #[test]
    fn should_start_persisted_asset_at_initial_version() {
        let asset = Asset::builder()
            .name("Dock")
            .serial_number("SN-1")
            .build()
            .unwrap()
            .persisted(AssetId::new(5));
        assert_eq!(asset.id.get(), 5);
        assert_eq!(asset.version, Version::INITIAL);
    }

    #[test]
    fn should_serialize_type_field_and_status_name() {
        let asset = Asset::builder()
            .name("Laptop-1")
            .asset_type("Laptop")
            .build()
            .unwrap()
            .persisted(AssetId::new(1));
        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["type"], "Laptop");
        assert_eq!(json["status"], "Available");
        assert_eq!(json["version"], 1);
    }
}
