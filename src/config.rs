//! Filesystem configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backends::memory::{MAX_SYMLINK_TARGET, RemovePolicy};
use crate::error::ConfigError;
use crate::logging;

/// Default bound on the length of a file's content.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1 << 30;

/// How reads and writes treat the request offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoMode {
    /// Writes replace the whole content and reads return all of it; the
    /// offset is validated and otherwise ignored.
    #[default]
    WholeContent,
    /// Writes splice at the offset and reads return the requested range.
    Positional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `mdbfs=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FsConfig {
    pub remove_policy: RemovePolicy,
    pub io_mode: IoMode,
    pub max_symlink_target: usize,
    /// Writes that would grow a file past this many bytes fail with `FileTooLarge`.
    pub max_file_size: u64,
    pub logging: LoggingConfig,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            remove_policy: RemovePolicy::default(),
            io_mode: IoMode::default(),
            max_symlink_target: MAX_SYMLINK_TARGET,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            logging: LoggingConfig::default(),
        }
    }
}

impl FsConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        logging::filter(&config.logging.level)?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn with_remove_policy(mut self, policy: RemovePolicy) -> Self {
        self.remove_policy = policy;
        self
    }

    pub fn with_io_mode(mut self, mode: IoMode) -> Self {
        self.io_mode = mode;
        self
    }

    pub fn with_max_file_size(mut self, max: u64) -> Self {
        self.max_file_size = max;
        self
    }
}
