//! Row decoding shared by the repositories.
//!
//! Joined queries alias the columns of a related table with a prefix
//! (`asset__name`, `employee__email`) so one row can yield several entities.

use std::str::FromStr;

use chrono::DateTime;
use inventory_domain::asset::Asset;
use inventory_domain::assignment::{Assignment, AssignmentDetails};
use inventory_domain::employee::Employee;
use inventory_domain::error::InvalidStateError;
use inventory_domain::id::Version;
use inventory_domain::maintenance::{MaintenanceDetails, MaintenanceLog};
use inventory_domain::time::Timestamp;
use rust_decimal::Decimal;
use sqlx::sqlite::SqliteRow;
use sqlx::{Decode, FromRow, Row, Sqlite, Type};

const ASSET_PREFIX: &str = "asset__";
const EMPLOYEE_PREFIX: &str = "employee__";

fn decode_error(err: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::Decode(Box::new(err))
}

/// LIKE pattern matching `needle` anywhere, with wildcards escaped by `\`.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

struct Columns<'r> {
    row: &'r SqliteRow,
    prefix: &'static str,
}

impl<'r> Columns<'r> {
    fn new(row: &'r SqliteRow, prefix: &'static str) -> Self {
        Self { row, prefix }
    }

    fn get<T>(&self, name: &str) -> Result<T, sqlx::Error>
    where
        T: Decode<'r, Sqlite> + Type<Sqlite>,
    {
        self.row.try_get(format!("{}{name}", self.prefix).as_str())
    }

    fn timestamp(&self, name: &str) -> Result<Timestamp, sqlx::Error> {
        let raw: String = self.get(name)?;
        parse_timestamp(&raw)
    }

    fn optional_timestamp(&self, name: &str) -> Result<Option<Timestamp>, sqlx::Error> {
        let raw: Option<String> = self.get(name)?;
        raw.as_deref().map(parse_timestamp).transpose()
    }

    fn decimal(&self, name: &str) -> Result<Decimal, sqlx::Error> {
        let raw: String = self.get(name)?;
        Decimal::from_str(&raw).map_err(decode_error)
    }

    fn status<S>(&self, name: &str) -> Result<S, sqlx::Error>
    where
        S: TryFrom<i64, Error = InvalidStateError>,
    {
        let code: i64 = self.get(name)?;
        S::try_from(code).map_err(decode_error)
    }
}

fn parse_timestamp(raw: &str) -> Result<Timestamp, sqlx::Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.to_utc())
        .map_err(decode_error)
}

fn asset(row: &SqliteRow, prefix: &'static str) -> Result<Asset, sqlx::Error> {
    let cols = Columns::new(row, prefix);
    Ok(Asset {
        id: cols.get::<i64>("id")?.into(),
        name: cols.get("name")?,
        asset_type: cols.get("asset_type")?,
        serial_number: cols.get("serial_number")?,
        purchase_date: cols.timestamp("purchase_date")?,
        purchase_cost: cols.decimal("purchase_cost")?,
        status: cols.status("status")?,
        version: Version::new(cols.get("version")?),
    })
}

fn employee(row: &SqliteRow, prefix: &'static str) -> Result<Employee, sqlx::Error> {
    let cols = Columns::new(row, prefix);
    Ok(Employee {
        id: cols.get::<i64>("id")?.into(),
        first_name: cols.get("first_name")?,
        last_name: cols.get("last_name")?,
        email: cols.get("email")?,
        department: cols.get("department")?,
        hire_date: cols.timestamp("hire_date")?,
        termination_date: cols.optional_timestamp("termination_date")?,
        is_active: cols.get("is_active")?,
        version: Version::new(cols.get("version")?),
    })
}

fn assignment(row: &SqliteRow) -> Result<Assignment, sqlx::Error> {
    let cols = Columns::new(row, "");
    Ok(Assignment {
        id: cols.get::<i64>("id")?.into(),
        asset_id: cols.get::<i64>("asset_id")?.into(),
        employee_id: cols.get::<i64>("employee_id")?.into(),
        assigned_date: cols.timestamp("assigned_date")?,
        return_date: cols.optional_timestamp("return_date")?,
        notes: cols.get("notes")?,
        status: cols.status("status")?,
        version: Version::new(cols.get("version")?),
    })
}

fn maintenance_log(row: &SqliteRow) -> Result<MaintenanceLog, sqlx::Error> {
    let cols = Columns::new(row, "");
    Ok(MaintenanceLog {
        id: cols.get::<i64>("id")?.into(),
        asset_id: cols.get::<i64>("asset_id")?.into(),
        maintenance_date: cols.timestamp("maintenance_date")?,
        description: cols.get("description")?,
        technician: cols.get("technician")?,
        cost: cols.decimal("cost")?,
        status: cols.status("status")?,
        version: Version::new(cols.get("version")?),
    })
}

/// Wrappers for converting database rows into domain types.
pub(crate) struct AssetRow(pub Asset);
pub(crate) struct EmployeeRow(pub Employee);
pub(crate) struct AssignmentRow(pub Assignment);
pub(crate) struct AssignmentDetailsRow(pub AssignmentDetails);
pub(crate) struct MaintenanceLogRow(pub MaintenanceLog);
pub(crate) struct MaintenanceDetailsRow(pub MaintenanceDetails);

impl<'r> FromRow<'r, SqliteRow> for AssetRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        asset(row, "").map(Self)
    }
}

impl<'r> FromRow<'r, SqliteRow> for EmployeeRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        employee(row, "").map(Self)
    }
}

impl<'r> FromRow<'r, SqliteRow> for AssignmentRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        assignment(row).map(Self)
    }
}

impl<'r> FromRow<'r, SqliteRow> for AssignmentDetailsRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(AssignmentDetails {
            assignment: assignment(row)?,
            asset: asset(row, ASSET_PREFIX)?,
            employee: employee(row, EMPLOYEE_PREFIX)?,
        }))
    }
}

impl<'r> FromRow<'r, SqliteRow> for MaintenanceLogRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        maintenance_log(row).map(Self)
    }
}

impl<'r> FromRow<'r, SqliteRow> for MaintenanceDetailsRow {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self(MaintenanceDetails {
            log: maintenance_log(row)?,
            asset: asset(row, ASSET_PREFIX)?,
        }))
    }
}
