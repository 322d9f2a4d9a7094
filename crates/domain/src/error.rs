//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`InventoryError`] via `#[from]`. Adapters only ever see this enum.

use crate::asset::AssetStatus;

/// Top-level error for every use-case in the inventory.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    /// A field failed validation.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A referenced row does not exist.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// A status value is out of domain or a business precondition failed.
    #[error(transparent)]
    InvalidState(#[from] InvalidStateError),

    /// The row changed since it was read.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Anything raised by the persistence layer.
    #[error("storage error")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
}

/// Field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("{0:?} is not a valid email address")]
    InvalidEmail(String),

    #[error("{field} must not be negative")]
    NegativeAmount { field: &'static str },

    #[error("{field} is not a valid amount")]
    InvalidAmount { field: &'static str },

    #[error("{field} is not a valid date")]
    InvalidDate { field: &'static str },

    #[error("termination date is before hire date")]
    TerminationBeforeHire,

    #[error("id in path ({path}) does not match id in body ({body})")]
    IdMismatch { path: i64, body: i64 },
}

/// A lookup by id returned nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Rejections raised by the lifecycle rules or by status parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStateError {
    #[error("{value:?} is not a valid {kind}")]
    UnknownStatus { kind: &'static str, value: String },

    #[error("asset {asset_id} is not available for assignment (current status: {status})")]
    AssetUnavailable { asset_id: i64, status: AssetStatus },

    #[error("asset {asset_id} already has an active assignment")]
    AssetAlreadyAssigned { asset_id: i64 },

    #[error("assignment {assignment_id} is already returned")]
    AlreadyReturned { assignment_id: i64 },

    #[error("cannot delete asset {asset_id} while it is assigned")]
    AssetInUse { asset_id: i64 },
}

/// Optimistic concurrency failure: the row exists but its version moved on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} was modified by another request")]
pub struct ConflictError {
    pub entity: &'static str,
    pub id: String,
}
