//! Simple moving average over a fixed trailing window.

use ndarray::{Array2, Axis};
use ronda_traits::{Result, RondaError, TableBuilder, TimeSeriesTable, Transform, defined};
use serde::{Deserialize, Serialize};

/// Suffix appended to an asset name to label its rolling mean.
pub const DEFAULT_SMA_SUFFIX: &str = "_SMA";

/// Configuration for the rolling average.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RollingAverageConfig {
    /// Number of trailing periods in the window (default: 10)
    pub lookback: usize,

    /// Suffix for the smoothed column names (default: `_SMA`)
    pub suffix: String,
}

impl Default for RollingAverageConfig {
    fn default() -> Self {
        Self {
            lookback: 10,
            suffix: DEFAULT_SMA_SUFFIX.to_string(),
        }
    }
}

/// Trailing simple moving average.
///
/// Each value column is pushed through a fixed-capacity circular buffer of
/// the last `lookback` observations (slot `row mod lookback`). The first
/// `lookback - 1` rows are warm-up and produce no output. Every later row
/// emits the raw value and the arithmetic mean of the buffer, so the output
/// has `rows - lookback + 1` rows laid out as `<asset>`, `<asset><suffix>`
/// per asset.
///
/// The mean is recomputed from the buffer on every row rather than kept as a
/// running sum; a window holding a missing value yields a missing mean.
///
/// There is no in-place mode: the source table is never modified.
///
/// # Example
///
/// ```
/// use ronda_traits::{Date, TimeSeriesTable};
/// use ronda_window::RollingAverage;
///
/// let times: Vec<Date> = (1..=4).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
/// let prices = TimeSeriesTable::from_columns(times, vec![("SPY", vec![1.0, 2.0, 3.0, 4.0])]).unwrap();
///
/// let smoothed = RollingAverage::with_lookback(2).compute(&prices).unwrap();
/// assert_eq!(smoothed.len(), 3);
/// assert_eq!(smoothed.values("SPY_SMA").unwrap(), vec![Some(1.5), Some(2.5), Some(3.5)]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RollingAverage {
    config: RollingAverageConfig,
}

impl RollingAverage {
    /// Create a rolling average with the given configuration.
    #[must_use]
    pub const fn new(config: RollingAverageConfig) -> Self {
        Self { config }
    }

    /// Create a rolling average with the default suffix.
    #[must_use]
    pub fn with_lookback(lookback: usize) -> Self {
        Self::new(RollingAverageConfig {
            lookback,
            ..Default::default()
        })
    }

    /// Get the window length in periods.
    #[must_use]
    pub const fn lookback(&self) -> usize {
        self.config.lookback
    }

    /// Get the suffix used for smoothed columns.
    #[must_use]
    pub const fn suffix(&self) -> &str {
        self.config.suffix.as_str()
    }

    /// Compute the smoothed table.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidLookback`] unless `0 < lookback <= rows`,
    /// and [`RondaError::InvalidData`] if a smoothed column name collides with
    /// an existing column.
    #[tracing::instrument(
        level = "debug",
        name = "rolling_average",
        skip_all,
        fields(lookback = self.config.lookback, rows = table.len())
    )]
    pub fn compute(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let rows = table.len();
        let lookback = self.config.lookback;
        if lookback == 0 || lookback > rows {
            return Err(RondaError::InvalidLookback { lookback, rows });
        }

        let assets = table.column_names();
        let output_names = self.output_names(&assets)?;
        let width = assets.len();

        let mut buffer = Array2::<f64>::from_elem((lookback, width), f64::NAN);
        let mut builder = TableBuilder::with_capacity(output_names, rows - lookback + 1);
        let mut output = vec![None; 2 * width];

        for (i, row) in table.rows()?.enumerate() {
            let slot = i % lookback;
            for (j, (_, value)) in row.values.iter().enumerate() {
                buffer[[slot, j]] = defined(*value).unwrap_or(f64::NAN);
            }

            // warm-up
            if i + 1 < lookback {
                continue;
            }

            let means = buffer
                .mean_axis(Axis(0))
                .ok_or_else(|| RondaError::Other("empty rolling window".to_string()))?;

            for (j, (_, value)) in row.values.iter().enumerate() {
                output[2 * j] = *value;
                output[2 * j + 1] = defined(Some(means[j]));
            }
            builder.push_row(row.time, &output)?;
        }

        tracing::debug!(output_rows = builder.len(), "rolling average computed");
        builder.build()
    }

    fn output_names(&self, assets: &[String]) -> Result<Vec<String>> {
        let mut names = Vec::with_capacity(assets.len() * 2);
        for asset in assets {
            let smoothed = format!("{asset}{}", self.config.suffix);
            if assets.contains(&smoothed) || names.contains(&smoothed) {
                return Err(RondaError::InvalidData(format!(
                    "smoothed column '{smoothed}' collides with an existing column"
                )));
            }
            names.push(asset.clone());
            names.push(smoothed);
        }
        Ok(names)
    }
}

impl Transform for RollingAverage {
    fn name(&self) -> &str {
        "rolling_average"
    }

    fn lookback(&self) -> usize {
        self.config.lookback
    }

    fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        self.compute(table)
    }
}
