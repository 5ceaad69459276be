//! Engine configuration.
//!
//! Every section has defaults, so an empty file is a valid configuration.
//! Files are TOML; environment variables of the form `RONDA__SECTION__KEY`
//! override file values (for example `RONDA__ROLLING__LOOKBACK=12`).

use std::path::Path;

use ::config::{Config, Environment, File, FileFormat};
use ronda_momentum::MomentumConfig;
use ronda_traits::{Result, RondaError};
use ronda_window::{LagConfig, RollingAverageConfig};
use serde::{Deserialize, Serialize};

/// Prefix of environment overrides.
pub const ENV_PREFIX: &str = "RONDA";

/// `RONDA__SECTION__KEY` variables, values parsed as numbers or booleans
/// where possible.
fn env_overrides() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directives used when `RUST_LOG` is unset (default: `info`)
    pub filter: String,

    /// Include the event target in log lines (default: false)
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            with_target: false,
        }
    }
}

/// Root configuration for the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rolling average settings
    pub rolling: RollingAverageConfig,

    /// Lag operator settings
    pub lag: LagConfig,

    /// Momentum scorer settings
    pub momentum: MomentumConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl EngineConfig {
    /// Load a TOML file and apply environment overrides.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_file_with_env(path.as_ref(), env_overrides())
    }

    fn from_file_with_env(path: &Path, env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(env)
            .build()
            .map_err(|e| {
                RondaError::InvalidConfig(format!("failed to load {}: {e}", path.display()))
            })?;
        Self::from_settings(settings)
    }

    /// Parse a TOML document. Environment overrides are not applied.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .map_err(|e| RondaError::InvalidConfig(e.to_string()))?;
        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self> {
        let config: Self = settings
            .try_deserialize()
            .map_err(|e| RondaError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`RondaError::InvalidConfig`] for a zero rolling lookback, an
    /// empty suffix, a zero lag, or an invalid momentum configuration.
    pub fn validate(&self) -> Result<()> {
        if self.rolling.lookback == 0 {
            return Err(RondaError::InvalidConfig(
                "rolling.lookback must be at least 1".to_string(),
            ));
        }
        if self.rolling.suffix.is_empty() {
            return Err(RondaError::InvalidConfig(
                "rolling.suffix must not be empty".to_string(),
            ));
        }
        if self.lag.periods == 0 {
            return Err(RondaError::InvalidConfig(
                "lag.periods must be at least 1".to_string(),
            ));
        }
        self.momentum.validate()
    }
}
