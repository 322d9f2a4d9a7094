//! Employee — a person assets can be handed to.

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::error::{InventoryError, ValidationError};
use crate::id::{EmployeeId, Version};
use crate::time::{Timestamp, now};

const NAME_MAX: usize = 50;
const EMAIL_MAX: usize = 100;
const DEPARTMENT_MAX: usize = 50;

/// A persisted employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub hire_date: Timestamp,
    pub termination_date: Option<Timestamp>,
    pub is_active: bool,
    pub version: Version,
}

impl Employee {
    /// Create a builder for a not-yet-persisted employee.
    #[must_use]
    pub fn builder() -> EmployeeBuilder {
        EmployeeBuilder::default()
    }

    /// `"First Last"`.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] for missing or over-long
    /// names, a malformed email, or a termination date before hire.
    pub fn validate(&self) -> Result<(), InventoryError> {
        validate_fields(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
            self.hire_date,
            self.termination_date,
        )
    }
}

/// An employee awaiting its surrogate key.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
    pub hire_date: Timestamp,
    pub termination_date: Option<Timestamp>,
    pub is_active: bool,
}

impl NewEmployee {
    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Same rules as [`Employee::validate`].
    pub fn validate(&self) -> Result<(), InventoryError> {
        validate_fields(
            &self.first_name,
            &self.last_name,
            &self.email,
            &self.department,
            self.hire_date,
            self.termination_date,
        )
    }

    /// Attach the key assigned by the datastore.
    #[must_use]
    pub fn persisted(self, id: EmployeeId) -> Employee {
        Employee {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            department: self.department,
            hire_date: self.hire_date,
            termination_date: self.termination_date,
            is_active: self.is_active,
            version: Version::INITIAL,
        }
    }
}

fn required(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required { field });
    }
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

fn validate_fields(
    first_name: &str,
    last_name: &str,
    email: &str,
    department: &str,
    hire_date: Timestamp,
    termination_date: Option<Timestamp>,
) -> Result<(), InventoryError> {
    required("first_name", first_name, NAME_MAX)?;
    required("last_name", last_name, NAME_MAX)?;
    required("email", email, EMAIL_MAX)?;
    if !email.validate_email() {
        return Err(ValidationError::InvalidEmail(email.to_string()).into());
    }
    required("department", department, DEPARTMENT_MAX)?;
    if termination_date.is_some_and(|terminated| terminated < hire_date) {
        return Err(ValidationError::TerminationBeforeHire.into());
    }
    Ok(())
}

/// Step-by-step builder for [`NewEmployee`].
#[derive(Debug, Default)]
pub struct EmployeeBuilder {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    department: Option<String>,
    hire_date: Option<Timestamp>,
    termination_date: Option<Timestamp>,
    is_active: Option<bool>,
}

impl EmployeeBuilder {
    #[must_use]
    pub fn first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    #[must_use]
    pub fn last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    #[must_use]
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    #[must_use]
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    #[must_use]
    pub fn hire_date(mut self, hire_date: Timestamp) -> Self {
        self.hire_date = Some(hire_date);
        self
    }

    #[must_use]
    pub fn termination_date(mut self, termination_date: Timestamp) -> Self {
        self.termination_date = Some(termination_date);
        self
    }

    #[must_use]
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Consume the builder, validate, and return a [`NewEmployee`].
    ///
    /// # Errors
    ///
    /// Returns [`InventoryError::Validation`] if any field rule fails.
    pub fn build(self) -> Result<NewEmployee, InventoryError> {
        let employee = NewEmployee {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            department: self
                .department
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| "Unassigned".to_string()),
            hire_date: self.hire_date.unwrap_or_else(now),
            termination_date: self.termination_date,
            is_active: self.is_active.unwrap_or(true),
        };
        employee.validate()?;
        Ok(employee)
    }
}
