//! Assignment — one asset handed to one employee for a bounded period.

use serde::{Deserialize, Serialize};

use crate::asset::Asset;
use crate::employee::Employee;
use crate::id::{AssetId, AssignmentId, EmployeeId, Version};
use crate::status::define_status;
use crate::time::Timestamp;

define_status!(
    /// Status of an [`Assignment`].
    AssignmentStatus, "assignment status" {
        Active = 0,
        Returned = 1,
        Lost = 2,
        Damaged = 3,
    }
);

/// A persisted assignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub asset_id: AssetId,
    pub employee_id: EmployeeId,
    pub assigned_date: Timestamp,
    pub return_date: Option<Timestamp>,
    pub notes: String,
    pub status: AssignmentStatus,
    pub version: Version,
}

impl Assignment {
    /// Whether the asset is still out with the employee.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.return_date.is_none()
    }
}

/// An assignment awaiting its surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAssignment {
    pub asset_id: AssetId,
    pub employee_id: EmployeeId,
    pub assigned_date: Timestamp,
    pub notes: String,
    pub status: AssignmentStatus,
}

impl NewAssignment {
    /// Attach the key assigned by the datastore.
    #[must_use]
    pub fn persisted(self, id: AssignmentId) -> Assignment {
        Assignment {
            id,
            asset_id: self.asset_id,
            employee_id: self.employee_id,
            assigned_date: self.assigned_date,
            return_date: None,
            notes: self.notes,
            status: self.status,
            version: Version::INITIAL,
        }
    }
}

/// An assignment read together with the asset and employee it links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssignmentDetails {
    #[serde(flatten)]
    pub assignment: Assignment,
    pub asset: Asset,
    pub employee: Employee,
}
