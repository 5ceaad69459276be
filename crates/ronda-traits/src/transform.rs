//! Transform trait for table-to-table computations.
//!
//! Rolling averages, lags, row filters and the momentum scorer all take a
//! [`TimeSeriesTable`] and produce a new one. The [`Transform`] trait is the
//! seam that lets callers chain and register them uniformly.

use crate::{Result, TimeSeriesTable};

/// A computation that maps a table to a new table.
///
/// Implementations must not mutate their input and must be deterministic.
/// They are `Send + Sync` so a configured transform can be shared across
/// threads.
///
/// # Example
///
/// ```
/// use ronda_traits::{Result, TimeSeriesTable, Transform};
///
/// struct Identity;
///
/// impl Transform for Identity {
///     fn name(&self) -> &str {
///         "identity"
///     }
///
///     fn lookback(&self) -> usize {
///         0
///     }
///
///     fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
///         Ok(table.clone())
///     }
/// }
/// ```
pub trait Transform: Send + Sync {
    /// Returns the name of this transform, used in logs and the registry.
    fn name(&self) -> &str;

    /// Returns the number of leading rows consumed before the transform
    /// produces its first defined value.
    fn lookback(&self) -> usize;

    /// Applies the transform, returning a new table.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookback does not fit the table, a referenced
    /// column is missing, or a value cannot be evaluated.
    fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable>;
}
