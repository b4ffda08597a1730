//! CLI-specific error types
//!
//! All CLI errors are fatal: printed to stderr, exit code 1.

use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::model::ModelError;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("MG_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("MG_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Model(e) => e.code().code(),
            Self::Config(_) => "MG_CLI_CONFIG_ERROR",
            Self::Io(_) | Self::Json(_) => "MG_CLI_IO_ERROR",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
