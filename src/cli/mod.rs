//! CLI module for modelguard
//!
//! Provides command-line interface for:
//! - inspect: print lineages and planned entry points of a model file

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{describe_model, inspect, run, run_command};
pub use errors::{CliError, CliResult};
