//! Row filter for trimming tables to dense rows.

use std::fmt;
use std::sync::Arc;

use ronda_traits::{Result, Row, TimeSeriesTable, Transform, is_missing};

/// Custom row predicate. Returns `true` for rows that should be removed.
pub type RowPredicateFn = dyn Fn(&Row<'_>) -> bool + Send + Sync;

/// Decides which rows a [`RowFilter`] removes.
#[derive(Clone, Default)]
pub enum RowPredicate {
    /// Remove rows where any value is missing or non-finite.
    #[default]
    AnyMissing,
    /// Remove rows where every value is missing or non-finite.
    AllMissing,
    /// Remove rows for which the closure returns `true`.
    Custom(Arc<RowPredicateFn>),
}

impl RowPredicate {
    /// Returns `true` if the row should be removed.
    pub fn matches(&self, row: &Row<'_>) -> bool {
        match self {
            Self::AnyMissing => row.values.iter().any(|(_, v)| is_missing(*v)),
            Self::AllMissing => row.values.iter().all(|(_, v)| is_missing(*v)),
            Self::Custom(predicate) => predicate(row),
        }
    }
}

impl fmt::Debug for RowPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnyMissing => f.write_str("AnyMissing"),
            Self::AllMissing => f.write_str("AllMissing"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Removes rows matching a predicate.
///
/// Surviving rows keep their original order and every column is preserved.
/// Rows are never reordered or deduplicated.
///
/// # Example
///
/// ```
/// use ronda_traits::{Date, TimeSeriesTable};
/// use ronda_window::RowFilter;
///
/// let times: Vec<Date> = (1..=3).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
/// let table = TimeSeriesTable::from_nullable_columns(
///     times,
///     vec![("SPY", vec![Some(1.0), None, Some(3.0)])],
/// )
/// .unwrap();
///
/// let dense = RowFilter::default().apply(&table).unwrap();
/// assert_eq!(dense.values("SPY").unwrap(), vec![Some(1.0), Some(3.0)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RowFilter {
    predicate: RowPredicate,
}

impl RowFilter {
    /// Create a filter with the given predicate.
    #[must_use]
    pub const fn new(predicate: RowPredicate) -> Self {
        Self { predicate }
    }

    /// Filter removing rows with any missing value.
    #[must_use]
    pub const fn any_missing() -> Self {
        Self::new(RowPredicate::AnyMissing)
    }

    /// Filter removing rows where every value is missing.
    #[must_use]
    pub const fn all_missing() -> Self {
        Self::new(RowPredicate::AllMissing)
    }

    /// Filter removing rows for which `predicate` returns `true`.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&Row<'_>) -> bool + Send + Sync + 'static,
    {
        Self::new(RowPredicate::Custom(Arc::new(predicate)))
    }

    /// Get the predicate.
    #[must_use]
    pub const fn predicate(&self) -> &RowPredicate {
        &self.predicate
    }

    fn keep_mask(&self, table: &TimeSeriesTable) -> Result<Vec<bool>> {
        Ok(table
            .rows()?
            .map(|row| !self.predicate.matches(&row))
            .collect())
    }

    /// Return a new table without the matching rows.
    pub fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let mask = self.keep_mask(table)?;
        let filtered = table.filter(&mask)?;
        tracing::debug!(
            predicate = ?self.predicate,
            rows = table.len(),
            kept = filtered.len(),
            "row filter applied"
        );
        Ok(filtered)
    }

    /// Remove the matching rows from `table` in place.
    ///
    /// This is the only in-place operation in the engine. It replaces the
    /// table's contents after the full mask is computed, so an error leaves the
    /// table untouched. Returns the number of removed rows.
    pub fn apply_in_place(&self, table: &mut TimeSeriesTable) -> Result<usize> {
        let mask = self.keep_mask(table)?;
        let removed = table.retain(&mask)?;
        tracing::debug!(predicate = ?self.predicate, removed, "row filter applied in place");
        Ok(removed)
    }
}

impl Transform for RowFilter {
    fn name(&self) -> &str {
        "row_filter"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        Self::apply(self, table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ronda_traits::Date;

    fn dates(n: usize) -> Vec<Date> {
        let start = Date::from_ymd_opt(2024, 1, 1).unwrap();
        (0..n)
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect()
    }

    fn five_rows() -> TimeSeriesTable {
        TimeSeriesTable::from_nullable_columns(
            dates(5),
            vec![
                ("SPY", vec![Some(0.0), Some(1.0), Some(2.0), Some(3.0), Some(4.0)]),
                ("TLT", vec![Some(10.0), Some(11.0), None, Some(13.0), Some(14.0)]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_drops_row_with_missing_value() {
        let table = five_rows();
        let dense = RowFilter::default().apply(&table).unwrap();

        assert_eq!(dense.len(), 4);
        assert_eq!(
            dense.values("SPY").unwrap(),
            vec![Some(0.0), Some(1.0), Some(3.0), Some(4.0)]
        );
        let all = dates(5);
        assert_eq!(dense.times(), &[all[0], all[1], all[3], all[4]]);
        assert_eq!(dense.column_names(), table.column_names());
    }

    #[test]
    fn test_non_finite_counts_as_missing() {
        let table = TimeSeriesTable::from_columns(
            dates(3),
            vec![("SPY", vec![1.0, f64::NAN, f64::INFINITY])],
        )
        .unwrap();
        let dense = RowFilter::any_missing().apply(&table).unwrap();
        assert_eq!(dense.len(), 1);
    }

    #[test]
    fn test_all_missing_keeps_partial_rows() {
        let table = TimeSeriesTable::from_nullable_columns(
            dates(3),
            vec![
                ("SPY", vec![None, Some(1.0), None]),
                ("TLT", vec![None, None, Some(2.0)]),
            ],
        )
        .unwrap();
        let kept = RowFilter::all_missing().apply(&table).unwrap();
        assert_eq!(kept.len(), 2);
        assert_eq!(kept.times(), &dates(3)[1..]);
    }

    #[test]
    fn test_custom_predicate() {
        let table = five_rows();
        let filter = RowFilter::custom(|row| row.get("SPY").is_some_and(|v| v >= 3.0));
        let kept = filter.apply(&table).unwrap();
        assert_eq!(kept.len(), 3);
        assert_eq!(format!("{:?}", filter.predicate()), "Custom(..)");
    }

    #[test]
    fn test_in_place_mode() {
        let mut table = five_rows();
        let removed = RowFilter::default().apply_in_place(&mut table).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(table.len(), 4);
        assert!(table.rows().unwrap().all(|row| row.is_dense()));
    }

    #[test]
    fn test_no_dedup_of_equal_rows() {
        let table = TimeSeriesTable::from_columns(dates(3), vec![("SPY", vec![1.0, 1.0, 1.0])])
            .unwrap();
        let kept = RowFilter::default().apply(&table).unwrap();
        assert_eq!(kept.len(), 3);
    }
}
