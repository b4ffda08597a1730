//! Validation entry-point installation
//!
//! Each type gets a table of entry points the first time it is touched:
//! one per declared managed field, plus one per operation when at least one
//! field entry was registered. Tables are built outside the registry lock
//! and inserted only if absent, so racing first touches install once and
//! only the winner logs.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};

use super::errors::RegistrationError;
use super::operation::Operation;
use crate::model::{ManagedType, ModelRegistry};
use crate::observability::{log_event_with_fields, Event, Severity};

/// What an entry point dispatches to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryPoint {
    /// Field Validator for the named field
    Field(String),
    /// Hierarchy Validator for an operation
    Operation(Operation),
}

/// Entry points registered on one type, in registration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeEntries {
    type_name: String,
    entries: Vec<(String, EntryPoint)>,
}

impl TypeEntries {
    fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            entries: Vec::new(),
        }
    }

    fn register(&mut self, name: String, entry: EntryPoint) -> Result<(), RegistrationError> {
        if self.entries.iter().any(|(existing, _)| *existing == name) {
            return Err(RegistrationError::NameCollision {
                type_name: self.type_name.clone(),
                entry: name,
            });
        }
        self.entries.push((name, entry));
        Ok(())
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// (entry name, target) pairs
    pub fn entries(&self) -> &[(String, EntryPoint)] {
        &self.entries
    }

    pub fn entry_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Fields with an installed Field Validator, in declaration order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().filter_map(|(_, entry)| match entry {
            EntryPoint::Field(field) => Some(field.as_str()),
            EntryPoint::Operation(_) => None,
        })
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields().any(|f| f == field)
    }

    pub fn has_operation(&self, operation: Operation) -> bool {
        self.entries
            .iter()
            .any(|(_, entry)| *entry == EntryPoint::Operation(operation))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Entry table for a type plus the registrations that failed
#[derive(Debug, Clone)]
pub struct InstallPlan {
    pub entries: TypeEntries,
    pub failures: Vec<RegistrationError>,
}

/// Conventional entry-point name for a field: `validate` + capitalized name
pub fn field_entry_name(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => format!("validate{}{}", first.to_uppercase(), chars.as_str()),
        None => "validate".to_string(),
    }
}

/// Computes the entry table for a type without touching any registry.
pub fn plan_entries(managed_type: &ManagedType) -> InstallPlan {
    let mut entries = TypeEntries::new(managed_type.name());
    let mut failures = Vec::new();
    let mut field_entries = 0usize;

    for field in managed_type.managed_fields() {
        let name = field_entry_name(&field.name);
        match entries.register(name, EntryPoint::Field(field.name.clone())) {
            Ok(()) => field_entries += 1,
            Err(e) => failures.push(e),
        }
    }

    if field_entries > 0 {
        for op in Operation::ALL {
            if let Err(e) = entries.register(op.entry_name().to_string(), EntryPoint::Operation(op)) {
                failures.push(e);
            }
        }
    }

    InstallPlan { entries, failures }
}

/// Process-wide registry of installed entry tables
#[derive(Debug)]
pub struct HookInstaller {
    model: Arc<ModelRegistry>,
    installed: Mutex<HashMap<String, Arc<TypeEntries>>>,
    /// Undeclared types already reported
    unknown: Mutex<HashSet<String>>,
}

impl HookInstaller {
    pub fn new(model: Arc<ModelRegistry>) -> Self {
        Self {
            model,
            installed: Mutex::new(HashMap::new()),
            unknown: Mutex::new(HashSet::new()),
        }
    }

    /// Installs the type and, first, every ancestor.
    ///
    /// Returns true if this call installed `type_name` itself; false if it
    /// was already installed or is not in the model (logged once).
    pub fn ensure_installed(&self, type_name: &str) -> bool {
        let Some(managed_type) = self.model.get(type_name) else {
            self.report_unknown(type_name);
            return false;
        };

        let mut installed_self = false;
        for level in managed_type.lineage() {
            if let Some(level_type) = self.model.get(level) {
                installed_self = self.install_one(level_type);
            }
        }
        installed_self
    }

    fn install_one(&self, managed_type: &ManagedType) -> bool {
        if self.is_installed(managed_type.name()) {
            return false;
        }

        let plan = plan_entries(managed_type);

        let won = {
            let mut installed = self.lock();
            if installed.contains_key(managed_type.name()) {
                false
            } else {
                installed.insert(
                    managed_type.name().to_string(),
                    Arc::new(plan.entries.clone()),
                );
                true
            }
        };

        if won {
            Self::log_plan(&plan);
        }
        won
    }

    fn report_unknown(&self, type_name: &str) {
        let first = self
            .unknown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(type_name.to_string());
        if !first {
            return;
        }

        let err = RegistrationError::UnknownType(type_name.to_string());
        log_event_with_fields(
            Severity::Error,
            Event::EntryRegistrationFailed,
            &[("type", type_name), ("error", &err.to_string())],
        );
    }

    fn log_plan(plan: &InstallPlan) {
        let type_name = plan.entries.type_name();
        for failure in &plan.failures {
            log_event_with_fields(
                Severity::Error,
                Event::EntryRegistrationFailed,
                &[("type", type_name), ("error", &failure.to_string())],
            );
        }

        if plan.entries.is_empty() {
            log_event_with_fields(Severity::Debug, Event::HooksSkipped, &[("type", type_name)]);
        } else {
            let names: Vec<_> = plan.entries.entry_names().collect();
            log_event_with_fields(
                Severity::Info,
                Event::HooksInstalled,
                &[("type", type_name), ("entries", &names.join(","))],
            );
        }
    }

    /// Returns true once the type has been visited, even if nothing was registered
    pub fn is_installed(&self, type_name: &str) -> bool {
        self.lock().contains_key(type_name)
    }

    /// Entry table of an installed type
    pub fn entries(&self, type_name: &str) -> Option<Arc<TypeEntries>> {
        self.lock().get(type_name).cloned()
    }

    /// Names of installed types, sorted
    pub fn installed_types(&self) -> Vec<String> {
        let mut names: Vec<_> = self.lock().keys().cloned().collect();
        names.sort();
        names
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Arc<TypeEntries>>> {
        self.installed.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
