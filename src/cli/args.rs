//! CLI argument definitions using clap
//!
//! Commands:
//! - modelguard inspect --model <path> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// modelguard - inheritance-aware object validation
#[derive(Parser, Debug)]
#[command(name = "modelguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print lineages and planned validation entry points for a model
    Inspect {
        /// Path to the model file
        #[arg(long)]
        model: PathBuf,

        /// Path to an engine configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
