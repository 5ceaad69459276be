//! Transform registry for discovering and constructing transforms by name.

use ronda_momentum::MomentumScorer;
use ronda_traits::{Result, RondaError, Transform};
use ronda_window::{Lag, RollingAverage, RowFilter};
use serde::Serialize;

use crate::config::EngineConfig;

/// Metadata about a transform.
#[derive(Debug, Clone, Serialize)]
pub struct TransformInfo {
    /// Canonical name, as returned by [`Transform::name`]
    pub name: &'static str,

    /// Alternative names accepted by [`create_transform`]
    pub aliases: &'static [&'static str],

    /// Human-readable description
    pub description: &'static str,

    /// Lookback under the default configuration
    pub typical_lookback: usize,
}

/// Get information about all available transforms.
#[must_use]
pub fn available_transforms() -> Vec<TransformInfo> {
    vec![
        TransformInfo {
            name: "rolling_average",
            aliases: &["sma"],
            description: "Trailing simple moving average with warm-up rows trimmed",
            typical_lookback: 10,
        },
        TransformInfo {
            name: "lag",
            aliases: &[],
            description: "Shift every column back by a fixed number of periods",
            typical_lookback: 1,
        },
        TransformInfo {
            name: "momentum_score",
            aliases: &["momentum"],
            description: "Weighted 1/3/6/12-period return composite per asset",
            typical_lookback: 12,
        },
        TransformInfo {
            name: "row_filter",
            aliases: &["dropna"],
            description: "Remove rows holding any missing value",
            typical_lookback: 0,
        },
    ]
}

/// Get information about a transform by name or alias.
#[must_use]
pub fn get_transform_info(name: &str) -> Option<TransformInfo> {
    available_transforms()
        .into_iter()
        .find(|info| info.name == name || info.aliases.contains(&name))
}

/// Construct a transform by name or alias from `config`.
///
/// # Errors
///
/// Returns [`RondaError::TransformNotFound`] for an unknown name and
/// [`RondaError::InvalidConfig`] if the momentum configuration is invalid.
pub fn create_transform(name: &str, config: &EngineConfig) -> Result<Box<dyn Transform>> {
    let info = get_transform_info(name)
        .ok_or_else(|| RondaError::TransformNotFound(name.to_string()))?;
    let transform: Box<dyn Transform> = match info.name {
        "rolling_average" => Box::new(RollingAverage::new(config.rolling.clone())),
        "lag" => Box::new(Lag::new(config.lag.clone())),
        "momentum_score" => Box::new(MomentumScorer::new(config.momentum.clone())?),
        "row_filter" => Box::new(RowFilter::any_missing()),
        other => return Err(RondaError::TransformNotFound(other.to_string())),
    };
    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_transforms() {
        let names: Vec<_> = available_transforms().iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["rolling_average", "lag", "momentum_score", "row_filter"]);
    }

    #[test]
    fn test_get_transform_info_by_alias() {
        assert_eq!(get_transform_info("sma").unwrap().name, "rolling_average");
        assert_eq!(get_transform_info("dropna").unwrap().name, "row_filter");
        assert!(get_transform_info("ema").is_none());
    }

    #[test]
    fn test_created_names_match_registry() {
        let config = EngineConfig::default();
        for info in available_transforms() {
            let transform = create_transform(info.name, &config).unwrap();
            assert_eq!(transform.name(), info.name);
            assert_eq!(transform.lookback(), info.typical_lookback);
        }
    }

    #[test]
    fn test_create_uses_config() {
        let mut config = EngineConfig::default();
        config.rolling.lookback = 3;
        config.lag.periods = 6;

        assert_eq!(create_transform("sma", &config).unwrap().lookback(), 3);
        assert_eq!(create_transform("lag", &config).unwrap().lookback(), 6);
    }

    #[test]
    fn test_create_unknown() {
        let result = create_transform("ema", &EngineConfig::default());
        assert!(matches!(result, Err(RondaError::TransformNotFound(ref n)) if n == "ema"));
    }
}
