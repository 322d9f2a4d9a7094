//! Application services — use-case implementations.
//!
//! Each service struct accepts port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod asset_service;
pub mod assignment_service;
pub mod employee_service;
pub mod health_service;
pub mod maintenance_service;

#[cfg(test)]
pub(crate) mod in_memory;
