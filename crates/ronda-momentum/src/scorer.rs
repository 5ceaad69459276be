//! Composite momentum score built from weighted multi-period returns.

use ronda_traits::{Result, RondaError, TimeSeriesTable, Transform};
use ronda_window::{Lag, RowFilter};
use serde::{Deserialize, Serialize};

use crate::returns::period_returns;

/// A lookback period and its weight in the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodWeight {
    /// Lookback in rows (nominally months)
    pub period: usize,

    /// Weight applied to the period return
    pub weight: f64,
}

impl PeriodWeight {
    /// Create a period/weight pair.
    #[must_use]
    pub const fn new(period: usize, weight: f64) -> Self {
        Self { period, weight }
    }
}

/// Configuration for the momentum scorer.
///
/// The default reproduces the 1/3/6/12 scheme:
/// `(12·MOM_1 + 4·MOM_3 + 2·MOM_6 + 1·MOM_12) × 0.25`. The weights do not
/// sum to one; the score is a scaled weighted sum, not an average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MomentumConfig {
    /// Ordered lookback periods with their weights
    pub periods: Vec<PeriodWeight>,

    /// Multiplier applied to the weighted sum (default: 0.25)
    pub scale: f64,
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            periods: vec![
                PeriodWeight::new(1, 12.0),
                PeriodWeight::new(3, 4.0),
                PeriodWeight::new(6, 2.0),
                PeriodWeight::new(12, 1.0),
            ],
            scale: 0.25,
        }
    }
}

impl MomentumConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidConfig`] if there are no periods, a period
    /// is zero or repeated, or a weight or the scale is not finite.
    pub fn validate(&self) -> Result<()> {
        if self.periods.is_empty() {
            return Err(RondaError::InvalidConfig(
                "momentum needs at least one period".to_string(),
            ));
        }
        if !self.scale.is_finite() {
            return Err(RondaError::InvalidConfig(format!(
                "momentum scale must be finite, got {}",
                self.scale
            )));
        }
        for (i, pw) in self.periods.iter().enumerate() {
            if pw.period == 0 {
                return Err(RondaError::InvalidConfig(
                    "momentum periods must be at least 1".to_string(),
                ));
            }
            if !pw.weight.is_finite() {
                return Err(RondaError::InvalidConfig(format!(
                    "weight for period {} must be finite, got {}",
                    pw.period, pw.weight
                )));
            }
            if self.periods[..i].iter().any(|p| p.period == pw.period) {
                return Err(RondaError::InvalidConfig(format!(
                    "period {} listed twice",
                    pw.period
                )));
            }
        }
        Ok(())
    }

    /// Longest configured period.
    #[must_use]
    pub fn max_period(&self) -> usize {
        self.periods.iter().map(|p| p.period).max().unwrap_or(0)
    }
}

/// Multi-period momentum scorer.
///
/// For every asset column `A` and configured period `p`:
///
/// 1. `LAG_p = Lag(p)(A)`
/// 2. `MOM_p = A / LAG_p - 1`, undefined wherever either side is missing
/// 3. `SCORE_A = scale × Σ weight_p · MOM_p`, undefined if any `MOM_p` is
///
/// The per-asset scores share the input's time index and are trimmed with a
/// [`RowFilter`] to the rows where every asset has a score.
///
/// Evaluation failures (a zero lagged price, a non-finite result) are
/// returned as [`RondaError::EvaluationFailure`]; no partial table is produced.
///
/// # Example
///
/// ```
/// use ronda_momentum::MomentumScorer;
/// use ronda_traits::{Date, TimeSeriesTable};
///
/// let times: Vec<Date> = (0..16)
///     .map(|m| Date::from_ymd_opt(2020 + m / 12, (m % 12) as u32 + 1, 1).unwrap())
///     .collect();
/// let prices: Vec<f64> = (0..16).map(|t| 2f64.powi(t)).collect();
/// let table = TimeSeriesTable::from_columns(times, vec![("SPY", prices)]).unwrap();
///
/// let scores = MomentumScorer::default().score(&table).unwrap();
/// assert_eq!(scores.len(), 4);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MomentumScorer {
    config: MomentumConfig,
}

impl MomentumScorer {
    /// Create a scorer from a validated configuration.
    pub fn new(config: MomentumConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    #[must_use]
    pub const fn config(&self) -> &MomentumConfig {
        &self.config
    }

    /// Longest configured period.
    #[must_use]
    pub fn max_period(&self) -> usize {
        self.config.max_period()
    }

    /// Name of the period-return column for `asset` and `period`.
    #[must_use]
    pub fn return_column(asset: &str, period: usize) -> String {
        format!("{asset}_MOM{period}")
    }

    /// Compose the score from one row of period returns, ordered like the
    /// configured periods.
    ///
    /// Returns `Ok(None)` if any return is undefined.
    pub fn composite(&self, asset: &str, returns: &[Option<f64>]) -> Result<Option<f64>> {
        if returns.len() != self.config.periods.len() {
            return Err(RondaError::evaluation(
                asset,
                0,
                format!(
                    "expected {} period returns, got {}",
                    self.config.periods.len(),
                    returns.len()
                ),
            ));
        }

        let mut total = 0.0;
        for (pw, value) in self.config.periods.iter().zip(returns) {
            let Some(value) = value else {
                return Ok(None);
            };
            total += pw.weight * value;
        }

        let score = total * self.config.scale;
        if !score.is_finite() {
            return Err(RondaError::evaluation(
                asset,
                0,
                format!("composite score is not finite ({score})"),
            ));
        }
        Ok(Some(score))
    }

    /// Compute the period-return table for every asset.
    ///
    /// Columns are `<asset>_MOM<p>`, grouped by asset in configured period
    /// order. Rows are not filtered.
    pub fn period_returns(&self, prices: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let lagged = self.lag_tables(prices)?;
        let mut columns = Vec::with_capacity(prices.width() * self.config.periods.len());
        for asset in prices.column_names() {
            let returns = self.asset_returns(prices, &asset, &lagged)?;
            for (pw, values) in self.config.periods.iter().zip(returns) {
                columns.push((Self::return_column(&asset, pw.period), values));
            }
        }
        TimeSeriesTable::from_nullable_columns(prices.times().to_vec(), columns)
    }

    /// Score every asset column of `prices`.
    ///
    /// A table without asset columns scores no rows.
    pub fn score(&self, prices: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let assets = prices.column_names();
        let assets: Vec<&str> = assets.iter().map(String::as_str).collect();
        self.score_assets(prices, &assets)
    }

    /// Score the named assets.
    ///
    /// An empty `assets` list yields an empty table.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::ColumnNotFound`] if an asset is absent and
    /// [`RondaError::EvaluationFailure`] if a return or score cannot be computed.
    #[tracing::instrument(
        level = "debug",
        name = "momentum_score",
        skip_all,
        fields(assets = assets.len(), rows = prices.len())
    )]
    pub fn score_assets(&self, prices: &TimeSeriesTable, assets: &[&str]) -> Result<TimeSeriesTable> {
        let prices = prices.select(assets)?;
        if assets.is_empty() {
            return Ok(prices.slice(0, 0));
        }
        if prices.len() <= self.max_period() {
            tracing::warn!(
                rows = prices.len(),
                max_period = self.max_period(),
                "price history shorter than the longest momentum period; no row will be scored"
            );
        }

        let lagged = self.lag_tables(&prices)?;
        let mut scores = Vec::with_capacity(assets.len());
        for asset in assets {
            let returns = self.asset_returns(&prices, asset, &lagged)?;
            let mut row = vec![None; returns.len()];
            let mut values = Vec::with_capacity(prices.len());
            for i in 0..prices.len() {
                for (slot, period) in row.iter_mut().zip(&returns) {
                    *slot = period[i];
                }
                values.push(self.composite(asset, &row)?);
            }
            scores.push((*asset, values));
        }

        let table = TimeSeriesTable::from_nullable_columns(prices.times().to_vec(), scores)?;
        let dense = RowFilter::any_missing().apply(&table)?;
        tracing::debug!(scored_rows = dense.len(), "momentum scores computed");
        Ok(dense)
    }

    /// One lagged copy of `prices` per configured period.
    fn lag_tables(&self, prices: &TimeSeriesTable) -> Result<Vec<TimeSeriesTable>> {
        self.config
            .periods
            .iter()
            .map(|pw| Lag::with_periods(pw.period).compute(prices))
            .collect()
    }

    /// Period returns for one asset, one vector per configured period.
    fn asset_returns(
        &self,
        prices: &TimeSeriesTable,
        asset: &str,
        lagged: &[TimeSeriesTable],
    ) -> Result<Vec<Vec<Option<f64>>>> {
        let current = prices.values(asset)?;
        self.config
            .periods
            .iter()
            .zip(lagged)
            .map(|(pw, table)| {
                let lag = table
                    .values(&Lag::column_name(asset, pw.period))
                    .map_err(|e| RondaError::evaluation(asset, pw.period, e.to_string()))?;
                period_returns(asset, pw.period, &current, &lag)
            })
            .collect()
    }
}

impl Transform for MomentumScorer {
    fn name(&self) -> &str {
        "momentum_score"
    }

    fn lookback(&self) -> usize {
        self.max_period()
    }

    fn apply(&self, table: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        self.score(table)
    }
}
