//! Validation engine
//!
//! Entry points the persistence layer calls. Every entry point first
//! touches the object's type, so installation happens-before dispatch.

use std::sync::Arc;

use serde_json::Value;

use super::catalog::{ErrorCatalog, ReportedError};
use super::errors::{AggregateError, ElementaryError};
use super::field::FieldValidator;
use super::hierarchy::HierarchyValidator;
use super::hooks::{HookCatalog, ManagedObject};
use super::installer::HookInstaller;
use super::operation::Operation;
use crate::config::EngineConfig;
use crate::model::ModelRegistry;
use crate::observability::{log_event_with_fields, Event, Severity};

/// Process-wide validation engine.
///
/// Share one instance (e.g. behind `Arc`) across contexts; the model and
/// hooks are read-only and the installation registry is synchronized.
#[derive(Debug)]
pub struct ValidationEngine {
    model: Arc<ModelRegistry>,
    hooks: HookCatalog,
    config: EngineConfig,
    installer: HookInstaller,
    catalog: ErrorCatalog,
}

impl ValidationEngine {
    /// Creates an engine with the default configuration
    pub fn new(model: Arc<ModelRegistry>, hooks: HookCatalog) -> Self {
        Self::with_config(model, hooks, EngineConfig::default())
    }

    pub fn with_config(model: Arc<ModelRegistry>, hooks: HookCatalog, config: EngineConfig) -> Self {
        let catalog = ErrorCatalog::with_standard_kinds(&config.error_domain);
        Self {
            installer: HookInstaller::new(Arc::clone(&model)),
            model,
            hooks,
            config,
            catalog,
        }
    }

    pub fn model(&self) -> &ModelRegistry {
        &self.model
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn installer(&self) -> &HookInstaller {
        &self.installer
    }

    /// Error kinds used for reporting; extra kinds may be registered
    pub fn catalog(&self) -> &ErrorCatalog {
        &self.catalog
    }

    /// First-touch hook for a type; see [`HookInstaller::ensure_installed`]
    pub fn ensure_installed(&self, type_name: &str) -> bool {
        self.installer.ensure_installed(type_name)
    }

    /// Per-field entry point.
    ///
    /// Dispatches to the Field Validator when some level of the lineage has
    /// an installed entry for `field`; passes otherwise.
    pub fn validate_value(
        &self,
        object: &dyn ManagedObject,
        field: &str,
        candidate: &Value,
    ) -> Result<(), ElementaryError> {
        let type_name = object.type_name();
        self.installer.ensure_installed(type_name);

        let installed = self
            .model
            .lineage(type_name)
            .iter()
            .filter_map(|level| self.installer.entries(level))
            .any(|entries| entries.has_field(field));
        if !installed {
            return Ok(());
        }

        FieldValidator::new(&self.model, &self.hooks, &self.config.generic_failure_reason)
            .validate_field(object, field, candidate)
    }

    /// Per-operation entry point.
    ///
    /// Uses the operation entry of the nearest lineage level that has one;
    /// with none, only the base step runs.
    pub fn validate(&self, object: &dyn ManagedObject, operation: Operation) -> Result<(), AggregateError> {
        let type_name = object.type_name();
        self.installer.ensure_installed(type_name);

        let hierarchy = HierarchyValidator::new(&self.model, &self.hooks, &self.installer, &self.config);
        let dispatched = self
            .model
            .lineage(type_name)
            .iter()
            .rev()
            .filter_map(|level| self.installer.entries(level))
            .any(|entries| entries.has_operation(operation));

        let result = if dispatched {
            hierarchy.validate_hierarchy(object, operation)
        } else {
            hierarchy.validate_base(object, operation)
        };

        if let Err(ref error) = result {
            log_event_with_fields(
                Severity::Debug,
                Event::ValidationFailed,
                &[
                    ("type", type_name),
                    ("operation", operation.as_str()),
                    ("errors", &error.len().to_string()),
                ],
            );
        }
        result
    }

    pub fn validate_for_insert(&self, object: &dyn ManagedObject) -> Result<(), AggregateError> {
        self.validate(object, Operation::Insert)
    }

    pub fn validate_for_update(&self, object: &dyn ManagedObject) -> Result<(), AggregateError> {
        self.validate(object, Operation::Update)
    }

    pub fn validate_for_delete(&self, object: &dyn ManagedObject) -> Result<(), AggregateError> {
        self.validate(object, Operation::Delete)
    }

    /// Reports a validation failure through the error catalog
    pub fn report(&self, error: &AggregateError) -> ReportedError {
        self.catalog.report(error)
    }
}
