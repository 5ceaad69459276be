#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! ## Crate Organization
//!
//! - [`traits`]: the table type, its builder, the [`Transform`] trait and errors
//! - [`window`]: rolling average, lag operator and row filter
//! - [`momentum`]: period returns and the composite momentum scorer
//! - [`config`](crate::config), [`logging`], [`registry`]: configuration loading, tracing
//!   setup and transform lookup by name
//!
//! ## Data Flow
//!
//! 1. Prices arrive as a [`TimeSeriesTable`] (or a polars `DataFrame` with a
//!    date column, via [`TimeSeriesTable::from_dataframe`])
//! 2. [`RollingAverage`] pairs each asset with its trailing mean
//! 3. [`MomentumScorer`] lags each asset, builds period returns and combines
//!    them, then drops rows where any asset is unscored
//! 4. [`Engine`] runs both from one [`EngineConfig`]

/// The version of the ronda crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod engine;
pub mod logging;
pub mod registry;

// ============================================================================
// Core Types
// ============================================================================

/// Core types: [`TimeSeriesTable`], [`TableBuilder`], [`Transform`], [`RondaError`].
pub mod traits {
    pub use ronda_traits::*;
}

pub use ronda_traits::{
    Date, Result, RondaError, Row, TableBuilder, TimeSeriesTable, Transform, defined, is_missing,
};

// ============================================================================
// Windowed Transforms
// ============================================================================

/// Rolling average, lag operator and row filter.
///
/// # Example
///
/// ```
/// use ronda::window::{Lag, RowFilter};
/// use ronda::{Date, TimeSeriesTable};
///
/// let times: Vec<Date> = (1..=3).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
/// let prices = TimeSeriesTable::from_columns(times, vec![("SPY", vec![1.0, 2.0, 3.0])]).unwrap();
///
/// let lagged = Lag::with_periods(1).compute(&prices).unwrap();
/// let dense = RowFilter::any_missing().apply(&lagged).unwrap();
/// assert_eq!(dense.values("SPY_LAG1").unwrap(), vec![Some(1.0), Some(2.0)]);
/// ```
pub mod window {
    pub use ronda_window::*;
}

pub use ronda_window::{
    Lag, LagConfig, RollingAverage, RollingAverageConfig, RowFilter, RowPredicate,
};

// ============================================================================
// Momentum
// ============================================================================

/// Period returns and the composite momentum scorer.
pub mod momentum {
    pub use ronda_momentum::*;
}

pub use ronda_momentum::{MomentumConfig, MomentumScorer, PeriodWeight};

pub use crate::config::{EngineConfig, LoggingConfig};
pub use crate::engine::{Engine, EngineOutput};
pub use crate::logging::init_tracing;
pub use crate::registry::{TransformInfo, available_transforms, create_transform, get_transform_info};
