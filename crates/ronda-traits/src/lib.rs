#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/ronda/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the ronda rolling-window and momentum engine.

/// The version of the ronda-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod builder;
pub mod error;
pub mod table;
pub mod transform;
pub mod types;

// Re-exports
pub use builder::TableBuilder;
pub use error::{Result, RondaError};
pub use table::{Row, Rows, TimeSeriesTable};
pub use transform::Transform;
pub use types::{DATE_COLUMN, Date, defined, is_missing};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
