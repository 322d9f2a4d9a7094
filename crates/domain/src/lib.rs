//! # inventory-domain
//!
//! Pure domain model for the IT-asset inventory tracker.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, the row version token, error
//!   conventions, timestamps
//! - Define **Assets** (trackable items with a lifecycle status)
//! - Define **Employees** (people assets are handed to)
//! - Define **Assignments** (asset ↔ employee for a bounded period)
//! - Define **Maintenance logs** (service performed on an asset)
//! - Contain the **lifecycle rules** that move an asset between statuses
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod status;
pub mod time;

pub mod asset;
pub mod assignment;
pub mod employee;
pub mod lifecycle;
pub mod maintenance;
