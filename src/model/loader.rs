//! Model loader
//!
//! Reads a JSON model file into a `ModelRegistry`:
//!
//! ```json
//! { "types": [ { "name": "Person", "fields": [ { "name": "age", "kind": "managed" } ] } ] }
//! ```

use std::fs;
use std::path::Path;

use super::errors::{ModelError, ModelResult};
use super::registry::ModelRegistry;
use super::types::{ModelDocument, TypeDef};
use crate::observability::{log_event_with_fields, Event, Severity};

/// Loads and saves model files.
pub struct ModelLoader;

impl ModelLoader {
    /// Loads a model file and resolves it.
    pub fn load_file(path: &Path) -> ModelResult<ModelRegistry> {
        let content = fs::read_to_string(path).map_err(|e| {
            ModelError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
        })?;

        let registry = Self::load_str(&content).map_err(|e| match e.code() {
            super::errors::ModelErrorCode::MgModelMalformed => ModelError::malformed(
                path.display().to_string(),
                e.message().to_string(),
            ),
            _ => e,
        })?;

        let count = registry.len().to_string();
        log_event_with_fields(
            Severity::Info,
            Event::ModelLoaded,
            &[("path", &path.display().to_string()), ("types", &count)],
        );

        Ok(registry)
    }

    /// Parses model JSON from a string.
    pub fn load_str(content: &str) -> ModelResult<ModelRegistry> {
        let document: ModelDocument = serde_json::from_str(content)
            .map_err(|e| ModelError::malformed("<inline>", format!("Invalid JSON: {}", e)))?;
        ModelRegistry::from_types(document.types)
    }

    /// Writes type declarations as a pretty-printed model file.
    pub fn save_file(path: &Path, types: &[TypeDef]) -> ModelResult<()> {
        let document = ModelDocument {
            types: types.to_vec(),
        };
        let content = serde_json::to_string_pretty(&document).map_err(|e| {
            ModelError::malformed(
                path.display().to_string(),
                format!("Failed to serialize model: {}", e),
            )
        })?;

        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() && !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    ModelError::malformed(
                        dir.display().to_string(),
                        format!("Failed to create directory: {}", e),
                    )
                })?;
            }
        }

        fs::write(path, content).map_err(|e| {
            ModelError::malformed(path.display().to_string(), format!("Failed to write file: {}", e))
        })
    }
}
