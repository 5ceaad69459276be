//! Configured pipeline of rolling average and momentum scorer.

use ronda_momentum::MomentumScorer;
use ronda_traits::{Result, TimeSeriesTable};
use ronda_window::RollingAverage;

use crate::config::EngineConfig;

/// Tables produced by [`Engine::run`].
#[derive(Debug, Clone)]
pub struct EngineOutput {
    /// Assets next to their rolling means, or `None` when the history is
    /// shorter than the rolling lookback
    pub smoothed: Option<TimeSeriesTable>,

    /// Momentum score per asset on the rows where every asset has a score
    pub scores: TimeSeriesTable,
}

/// Rolling average and momentum scorer built from one [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct Engine {
    rolling: RollingAverage,
    momentum: MomentumScorer,
}

impl Engine {
    /// Build an engine, validating the configuration.
    pub fn new(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rolling: RollingAverage::new(config.rolling.clone()),
            momentum: MomentumScorer::new(config.momentum.clone())?,
        })
    }

    /// Get the rolling average.
    #[must_use]
    pub const fn rolling(&self) -> &RollingAverage {
        &self.rolling
    }

    /// Get the momentum scorer.
    #[must_use]
    pub const fn momentum(&self) -> &MomentumScorer {
        &self.momentum
    }

    /// Smooth every asset of `prices`.
    pub fn smooth(&self, prices: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        self.rolling.compute(prices)
    }

    /// Score every asset of `prices`.
    pub fn score(&self, prices: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        self.momentum.score(prices)
    }

    /// Smooth and score `prices`.
    ///
    /// Smoothing is skipped, not failed, when there are fewer rows than the
    /// rolling lookback. Scoring errors are returned as-is.
    #[tracing::instrument(
        level = "info",
        name = "engine_run",
        skip_all,
        fields(rows = prices.len(), assets = prices.width())
    )]
    pub fn run(&self, prices: &TimeSeriesTable) -> Result<EngineOutput> {
        let smoothed = if prices.len() >= self.rolling.lookback() {
            Some(self.smooth(prices)?)
        } else {
            tracing::warn!(
                rows = prices.len(),
                lookback = self.rolling.lookback(),
                "history shorter than the rolling lookback; smoothing skipped"
            );
            None
        };
        let scores = self.score(prices)?;
        tracing::info!(
            smoothed_rows = smoothed.as_ref().map_or(0, TimeSeriesTable::len),
            scored_rows = scores.len(),
            "engine run complete"
        );
        Ok(EngineOutput { smoothed, scores })
    }
}
