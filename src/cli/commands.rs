//! CLI command implementations

use std::io::{self, Write};
use std::path::Path;

use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::model::{ManagedType, ModelLoader, ModelRegistry};
use crate::validation::{plan_entries, EntryPoint};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Main CLI entry point
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Inspect { model, config } => {
            let report = inspect(&model, config.as_deref())?;
            write_json(&report)
        }
    }
}

/// Loads a model and describes what installation would register per type.
///
/// Nothing is installed; the entry tables are planned exactly as the
/// installer would build them, collisions included.
pub fn inspect(model_path: &Path, config_path: Option<&Path>) -> CliResult<Value> {
    let config = match config_path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    config.apply_logging()?;

    let registry = ModelLoader::load_file(model_path)?;
    Ok(describe_model(&registry))
}

/// JSON description of every type, in declaration order
pub fn describe_model(registry: &ModelRegistry) -> Value {
    let types: Vec<Value> = registry.types().map(describe_type).collect();
    json!({ "types": types })
}

fn describe_type(managed_type: &ManagedType) -> Value {
    let plan = plan_entries(managed_type);

    let entries: Vec<Value> = plan
        .entries
        .entries()
        .iter()
        .map(|(name, entry)| match entry {
            EntryPoint::Field(field) => json!({ "name": name, "field": field }),
            EntryPoint::Operation(op) => json!({ "name": name, "operation": op.as_str() }),
        })
        .collect();

    let managed: Vec<&str> = managed_type
        .managed_fields()
        .map(|f| f.name.as_str())
        .collect();

    json!({
        "name": managed_type.name(),
        "parent": managed_type.parent(),
        "lineage": managed_type.lineage(),
        "managed_fields": managed,
        "entries": entries,
        "collisions": plan.failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
    })
}

fn write_json(value: &Value) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    stdout.flush()?;
    Ok(())
}
