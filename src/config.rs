//! Engine configuration
//!
//! JSON file, every field optional:
//!
//! ```json
//! {
//!   "generic_failure_reason": "validation failed",
//!   "field_checks_on_delete": true,
//!   "error_domain": "modelguard.validation",
//!   "log_level": "info"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),
}

/// Validation engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Reason used when a hook reports failure without an error
    #[serde(default = "default_generic_failure_reason")]
    pub generic_failure_reason: String,

    /// Whether delete validation runs the field validators
    #[serde(default = "default_field_checks_on_delete")]
    pub field_checks_on_delete: bool,

    /// Domain of the standard error kinds
    #[serde(default = "default_error_domain")]
    pub error_domain: String,

    /// Minimum log severity: debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_generic_failure_reason() -> String {
    "validation failed".to_string()
}
fn default_field_checks_on_delete() -> bool {
    true
}
fn default_error_domain() -> String {
    "modelguard.validation".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generic_failure_reason: default_generic_failure_reason(),
            field_checks_on_delete: default_field_checks_on_delete(),
            error_domain: default_error_domain(),
            log_level: default_log_level(),
        }
    }
}

impl EngineConfig {
    /// Loads and checks a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: EngineConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.log_severity()?;

        log_event_with_fields(
            Severity::Debug,
            Event::ConfigLoaded,
            &[("path", &path.display().to_string())],
        );
        Ok(config)
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> Result<Severity, ConfigError> {
        Severity::parse(&self.log_level)
            .ok_or_else(|| ConfigError::UnknownLogLevel(self.log_level.clone()))
    }

    /// Applies `log_level` to the process-wide logger
    pub fn apply_logging(&self) -> Result<(), ConfigError> {
        Logger::set_min_severity(self.log_severity()?);
        Ok(())
    }
}
