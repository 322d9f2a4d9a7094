//! Time and timestamp helpers.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};

/// UTC timestamp used for purchase, hire, assignment and maintenance dates.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time, truncated to the microsecond precision
/// timestamps are stored with.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now().trunc_subsecs(6)
}

/// Fixed-width RFC 3339 rendering so stored timestamps sort lexically.
#[must_use]
pub fn to_storage(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Midnight UTC of a calendar date (how dates entered in forms are stored).
#[must_use]
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc()
}
