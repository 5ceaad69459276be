//! Tracing subscriber setup.

use ronda_traits::{Result, RondaError};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::LoggingConfig;

/// Build the filter: `RUST_LOG` when set, the configured directives otherwise.
pub fn build_filter(config: &LoggingConfig) -> Result<EnvFilter> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    select_filter(env.as_deref(), config)
}

/// Valid `env` directives win; unset or unparseable ones fall back to the
/// configured filter.
fn select_filter(env: Option<&str>, config: &LoggingConfig) -> Result<EnvFilter> {
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .map_or_else(|| parse_filter(&config.filter), Ok)
}

fn parse_filter(directives: &str) -> Result<EnvFilter> {
    EnvFilter::try_new(directives).map_err(|e| {
        RondaError::InvalidConfig(format!("invalid logging filter '{directives}': {e}"))
    })
}

/// Install a formatting subscriber as the global default.
///
/// Library code only emits events; binaries call this once at startup.
///
/// # Errors
///
/// Returns [`RondaError::InvalidConfig`] for unparseable filter directives and
/// [`RondaError::Other`] if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(build_filter(config)?)
        .with_target(config.with_target)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| RondaError::Other(format!("failed to install tracing subscriber: {e}")))
}
