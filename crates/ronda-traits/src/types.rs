//! Common types used throughout the ronda engine.

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// Name of the time index when a table is flattened into a `DataFrame`.
pub const DATE_COLUMN: &str = "date";

/// Days between 0001-01-01 (chrono's CE day 1) and the Unix epoch used by
/// polars `Date` columns.
pub(crate) const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Returns the value if it is present and finite.
///
/// Nulls and non-finite floats are both treated as missing observations.
#[must_use]
pub fn defined(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Returns `true` if the value is null or not finite.
#[must_use]
pub fn is_missing(value: Option<f64>) -> bool {
    defined(value).is_none()
}
