//! Windowed transforms over ronda time-series tables.
//!
//! This crate provides the building blocks the momentum scorer is made of:
//! - [`RollingAverage`]: trailing simple moving average with warm-up trimming
//! - [`Lag`]: period shift for period-over-period comparison
//! - [`RowFilter`]: removal of rows with missing data
//!
//! # Example
//!
//! ```
//! use ronda_traits::{Date, TimeSeriesTable, Transform};
//! use ronda_window::{Lag, RollingAverage, RowFilter};
//!
//! let times: Vec<Date> = (1..=5).map(|d| Date::from_ymd_opt(2024, 1, d).unwrap()).collect();
//! let prices =
//!     TimeSeriesTable::from_columns(times, vec![("SPY", vec![1.0, 2.0, 3.0, 4.0, 5.0])]).unwrap();
//!
//! let smoothed = RollingAverage::with_lookback(3).apply(&prices).unwrap();
//! let lagged = Lag::with_periods(1).apply(&prices).unwrap();
//! let dense = RowFilter::default().apply(&lagged).unwrap();
//!
//! assert_eq!(smoothed.len(), 3);
//! assert_eq!(dense.len(), 4);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod filter;
mod lag;
mod sma;

pub use filter::{RowFilter, RowPredicate, RowPredicateFn};
pub use lag::{Lag, LagConfig};
pub use sma::{DEFAULT_SMA_SUFFIX, RollingAverage, RollingAverageConfig};
