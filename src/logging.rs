//! Logging setup for hosts embedding the filesystem.

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ConfigError;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "MDBFS_LOG";

/// Parse a filter directive such as `info` or `mdbfs=debug`.
pub fn filter(directive: &str) -> Result<EnvFilter, ConfigError> {
    EnvFilter::try_new(directive).map_err(|err| ConfigError::LogFilter {
        directive: directive.to_string(),
        reason: err.to_string(),
    })
}

/// Install a global stderr subscriber.
///
/// `MDBFS_LOG` takes precedence over the configured level; either one
/// failing to parse is an error. Returns `Ok(false)` if a subscriber was
/// already installed, which leaves the existing one in place.
pub fn init(config: &LoggingConfig) -> Result<bool, ConfigError> {
    let directive = std::env::var(LOG_ENV).unwrap_or_else(|_| config.level.clone());
    let filter = filter(&directive)?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    Ok(match config.format {
        LogFormat::Text => builder.try_init().is_ok(),
        LogFormat::Json => builder.json().try_init().is_ok(),
    })
}
