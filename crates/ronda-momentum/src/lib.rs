//! Multi-period momentum scoring.
//!
//! The scorer lags each asset by every configured period, turns the lags into
//! simple returns and combines them into one weighted score per asset and row:
//!
//! ```text
//! SCORE = (12·MOM_1 + 4·MOM_3 + 2·MOM_6 + 1·MOM_12) × 0.25
//! ```
//!
//! Only rows where every asset has a score are kept.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod returns;
mod scorer;

pub use returns::{period_return, period_returns};
pub use scorer::{MomentumConfig, MomentumScorer, PeriodWeight};
