//! Lag operator: shift every column back by a fixed number of periods.

use polars::prelude::*;
use ronda_traits::{Result, RondaError, TimeSeriesTable, Transform};
use serde::{Deserialize, Serialize};

/// Configuration for the lag operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LagConfig {
    /// Number of periods to shift by (default: 1)
    pub periods: usize,

    /// Drop the leading rows that have no lagged value instead of leaving
    /// them missing (default: false)
    pub drop_leading: bool,
}

impl Default for LagConfig {
    fn default() -> Self {
        Self {
            periods: 1,
            drop_leading: false,
        }
    }
}

/// Time-shifted view of a table.
///
/// Output row `i` holds input row `i - periods`. The first `periods` rows are
/// missing, or dropped when [`LagConfig::drop_leading`] is set. Columns are
/// renamed to `<column>_LAG<periods>` so the lagged and un-lagged series can
/// live in one table.
#[derive(Debug, Clone, Default)]
pub struct Lag {
    config: LagConfig,
}

impl Lag {
    /// Create a lag operator with the given configuration.
    #[must_use]
    pub const fn new(config: LagConfig) -> Self {
        Self { config }
    }

    /// Create a lag operator that pads the leading rows.
    #[must_use]
    pub const fn with_periods(periods: usize) -> Self {
        Self::new(LagConfig {
            periods,
            drop_leading: false,
        })
    }

    /// Get the shift in periods.
    #[must_use]
    pub const fn periods(&self) -> usize {
        self.config.periods
    }

    /// Whether leading rows are dropped.
    #[must_use]
    pub const fn drop_leading(&self) -> bool {
        self.config.drop_leading
    }

    /// Name of the lagged column derived from `source`.
    #[must_use]
    pub fn column_name(source: &str, periods: usize) -> String {
        format!("{source}_LAG{periods}")
    }

    /// Compute the lagged table.
    ///
    /// A shift longer than the table is allowed and yields an all-missing
    /// table (or an empty one when dropping leading rows).
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidLookback`] for a shift of zero.
    pub fn compute(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let periods = self.config.periods;
        if periods == 0 {
            return Err(RondaError::InvalidLookback {
                lookback: periods,
                rows: table.len(),
            });
        }

        let columns = table
            .data()
            .get_columns()
            .iter()
            .map(|c| {
                c.as_materialized_series()
                    .shift(periods as i64)
                    .with_name(Self::column_name(c.name().as_str(), periods).into())
                    .into_column()
            })
            .collect::<Vec<_>>();
        let data = if columns.is_empty() {
            DataFrame::default()
        } else {
            DataFrame::new(columns)?
        };
        let lagged = TimeSeriesTable::new(table.times().to_vec(), data)?;

        tracing::debug!(
            periods,
            rows = table.len(),
            drop_leading = self.config.drop_leading,
            "lag computed"
        );

        if self.config.drop_leading {
            Ok(lagged.slice(periods, lagged.len()))
        } else {
            Ok(lagged)
        }
    }
}

impl Transform for Lag {
    fn name(&self) -> &str {
        "lag"
    }

    fn lookback(&self) -> usize {
        self.config.periods
    }

    fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        self.compute(table)
    }
}
