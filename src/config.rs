//! Compiler configuration
//!
//! Loaded from a JSON file; every key is optional and falls back to its
//! default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{Logger, Severity};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {reason}")]
    Io { path: String, reason: String },

    #[error("Malformed config: {0}")]
    Malformed(String),

    #[error("Invalid config value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io { .. } => "CONFIG_IO",
            ConfigError::Malformed(_) => "CONFIG_MALFORMED",
            ConfigError::InvalidValue { .. } => "CONFIG_INVALID_VALUE",
        }
    }
}

/// Limits and logging for query compilation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Maximum nesting depth of `$and`/`$or` groups (default: 32)
    #[serde(default = "default_max_filter_depth")]
    pub max_filter_depth: usize,

    /// Maximum number of members in a list operand (default: 1000)
    #[serde(default = "default_max_list_operand_len")]
    pub max_list_operand_len: usize,

    /// Minimum severity of emitted log lines (default: warn)
    #[serde(default = "default_log_level")]
    pub log_level: Severity,
}

fn default_max_filter_depth() -> usize {
    32
}

fn default_max_list_operand_len() -> usize {
    1000
}

fn default_log_level() -> Severity {
    Severity::Warn
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            max_filter_depth: default_max_filter_depth(),
            max_list_operand_len: default_max_list_operand_len(),
            log_level: default_log_level(),
        }
    }
}

impl CompilerConfig {
    /// Loads and validates a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig =
            serde_json::from_str(content).map_err(|e| ConfigError::Malformed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_filter_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_filter_depth",
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_list_operand_len == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_list_operand_len",
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }

    /// Logger honoring `log_level`
    pub fn logger(&self) -> Logger {
        Logger::new(self.log_level)
    }
}
