//! # inventory-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve the **JSON API** under `/api` (`/api/assets`, `/api/employees`,
//!   `/api/assignments`, `/api/maintenance`, `/api/info`)
//! - Serve `/health` with the datastore probe result
//! - Serve a **server-side-rendered HTML dashboard** built from askama
//!   templates and plain HTML forms
//! - Map HTTP requests into application service calls and map results and
//!   [`InventoryError`](inventory_domain::error::InventoryError)s back into
//!   responses
//!
//! ## Dashboard approach
//! - Every page is rendered server-side as complete HTML.
//! - Mutations are `<form>` POSTs that redirect back to the list page (PRG).
//! - Failures render an error page carrying the domain message, never the
//!   storage detail.
//!
//! ## Dependency rule
//! Depends on `inventory-app` (for port traits and services) and
//! `inventory-domain` (for types used in request/response mapping). Never
//! leaks axum types into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
