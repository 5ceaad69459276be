//! Error types for the ronda engine.
//!
//! Every transform in the workspace reports failures through [`RondaError`].
//! Nothing is logged and skipped: a partially populated table is never returned
//! in place of an error.

use thiserror::Error;

/// The main error type for ronda operations.
#[derive(Debug, Error)]
pub enum RondaError {
    /// A lookback or shift is outside the range the table supports.
    #[error("Invalid lookback {lookback} for a table of {rows} rows")]
    InvalidLookback {
        /// The requested lookback in periods.
        lookback: usize,
        /// Number of rows in the table the lookback was applied to.
        rows: usize,
    },

    /// A referenced asset or date column is absent.
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A period return or composite score could not be computed.
    ///
    /// `period` is `0` when the failure happened while composing the score
    /// rather than in a single period return.
    #[error("Evaluation failed for asset '{asset}' (period {period}): {reason}")]
    EvaluationFailure {
        /// The asset column being evaluated.
        asset: String,
        /// The lookback period being evaluated.
        period: usize,
        /// What went wrong.
        reason: String,
    },

    /// Error due to invalid or malformed table data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Error in a configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error when a transform name is not registered.
    #[error("Transform not found: {0}")]
    TransformNotFound(String),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl RondaError {
    /// Build an [`RondaError::EvaluationFailure`].
    pub fn evaluation(asset: impl Into<String>, period: usize, reason: impl Into<String>) -> Self {
        Self::EvaluationFailure {
            asset: asset.into(),
            period,
            reason: reason.into(),
        }
    }
}

impl From<String> for RondaError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for RondaError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for ronda operations.
pub type Result<T> = std::result::Result<T, RondaError>;
