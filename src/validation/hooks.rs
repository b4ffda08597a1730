//! User-supplied validation hooks
//!
//! A type opts into validation by registering a [`ValidationHooks`]
//! implementation for its name in a [`HookCatalog`]. A hierarchy level
//! "declares" a check when its implementation returns `Some` outcome for
//! it; returning `None` means the level has no such check.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::errors::ElementaryError;
use super::operation::OperationCategory;
use crate::observability::{log_event_with_fields, Event, Severity};

/// An object the engine can validate
pub trait ManagedObject {
    /// Concrete type name, as declared in the model
    fn type_name(&self) -> &str;

    /// Current value of a field; `None` when unset
    fn value(&self, field: &str) -> Option<&Value>;
}

/// Result of one hook invocation: pass/fail plus an optional error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookOutcome {
    passed: bool,
    error: Option<ElementaryError>,
}

impl HookOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            error: None,
        }
    }

    pub fn fail(error: ElementaryError) -> Self {
        Self {
            passed: false,
            error: Some(error),
        }
    }

    /// Failure without an explanation; the engine synthesizes a generic error
    pub fn fail_without_error() -> Self {
        Self {
            passed: false,
            error: None,
        }
    }

    /// Pass that still carries an error. A hook contract violation: the
    /// engine logs it and discards the error.
    pub fn pass_with_error(error: ElementaryError) -> Self {
        Self {
            passed: true,
            error: Some(error),
        }
    }

    /// Shorthand for a boolean check with a reason on failure
    pub fn check(ok: bool, error: impl FnOnce() -> ElementaryError) -> Self {
        if ok {
            Self::pass()
        } else {
            Self::fail(error())
        }
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn error(&self) -> Option<&ElementaryError> {
        self.error.as_ref()
    }

    /// Resolves the outcome into the engine's result shape, logging
    /// contract violations.
    pub(crate) fn settle(
        self,
        type_name: &str,
        hook: &str,
        synthesize: impl FnOnce() -> ElementaryError,
    ) -> Result<(), ElementaryError> {
        match (self.passed, self.error) {
            (true, None) => Ok(()),
            (true, Some(discarded)) => {
                log_event_with_fields(
                    Severity::Warn,
                    Event::HookContractViolation,
                    &[
                        ("type", type_name),
                        ("hook", hook),
                        ("discarded", discarded.reason()),
                    ],
                );
                Ok(())
            }
            (false, Some(error)) => Err(error),
            (false, None) => {
                log_event_with_fields(
                    Severity::Warn,
                    Event::HookFailedWithoutError,
                    &[("type", type_name), ("hook", hook)],
                );
                Err(synthesize())
            }
        }
    }
}

/// Checks a type contributes to validation.
pub trait ValidationHooks: Send + Sync {
    /// Check a candidate value for `field`. `None` when this type has no
    /// check for the field.
    fn check_field(
        &self,
        _object: &dyn ManagedObject,
        _field: &str,
        _candidate: &Value,
    ) -> Option<HookOutcome> {
        None
    }

    /// Object-level consistency check for this hierarchy level. `None` when
    /// the level declares no check for `category`.
    fn check_consistency(
        &self,
        _object: &dyn ManagedObject,
        _category: OperationCategory,
    ) -> Option<HookOutcome> {
        None
    }
}

type FieldCheck = dyn Fn(&Value) -> HookOutcome + Send + Sync;
type ConsistencyCheck = dyn Fn(&dyn ManagedObject) -> HookOutcome + Send + Sync;

/// Closure-backed [`ValidationHooks`]
#[derive(Default)]
pub struct HookSet {
    fields: HashMap<String, Box<FieldCheck>>,
    consistency: HashMap<OperationCategory, Box<ConsistencyCheck>>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a check for one field's candidate value
    pub fn on_field<F>(mut self, field: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> HookOutcome + Send + Sync + 'static,
    {
        self.fields.insert(field.into(), Box::new(check));
        self
    }

    /// Adds a consistency check for a category
    pub fn on_consistency<F>(mut self, category: OperationCategory, check: F) -> Self
    where
        F: Fn(&dyn ManagedObject) -> HookOutcome + Send + Sync + 'static,
    {
        self.consistency.insert(category, Box::new(check));
        self
    }

    /// Consistency check for insert and update
    pub fn on_write<F>(self, check: F) -> Self
    where
        F: Fn(&dyn ManagedObject) -> HookOutcome + Send + Sync + 'static,
    {
        self.on_consistency(OperationCategory::Write, check)
    }

    /// Consistency check for delete
    pub fn on_delete<F>(self, check: F) -> Self
    where
        F: Fn(&dyn ManagedObject) -> HookOutcome + Send + Sync + 'static,
    {
        self.on_consistency(OperationCategory::Delete, check)
    }
}

impl fmt::Debug for HookSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<_> = self.fields.keys().collect();
        fields.sort();
        f.debug_struct("HookSet")
            .field("fields", &fields)
            .field("consistency", &self.consistency.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ValidationHooks for HookSet {
    fn check_field(
        &self,
        _object: &dyn ManagedObject,
        field: &str,
        candidate: &Value,
    ) -> Option<HookOutcome> {
        self.fields.get(field).map(|check| check(candidate))
    }

    fn check_consistency(
        &self,
        object: &dyn ManagedObject,
        category: OperationCategory,
    ) -> Option<HookOutcome> {
        self.consistency.get(&category).map(|check| check(object))
    }
}

/// Hooks per type name
#[derive(Clone, Default)]
pub struct HookCatalog {
    by_type: HashMap<String, Arc<dyn ValidationHooks>>,
}

impl HookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers hooks for a type, replacing earlier ones
    pub fn register(&mut self, type_name: impl Into<String>, hooks: impl ValidationHooks + 'static) {
        self.by_type.insert(type_name.into(), Arc::new(hooks));
    }

    /// Builder form of [`HookCatalog::register`]
    pub fn with(mut self, type_name: impl Into<String>, hooks: impl ValidationHooks + 'static) -> Self {
        self.register(type_name, hooks);
        self
    }

    /// Hooks declared by exactly this type (not inherited)
    pub fn get(&self, type_name: &str) -> Option<&dyn ValidationHooks> {
        self.by_type.get(type_name).map(|h| h.as_ref())
    }
}

impl fmt::Debug for HookCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.by_type.keys().collect();
        types.sort();
        f.debug_struct("HookCatalog").field("types", &types).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Logger;
    use serde_json::json;

    struct Blank;

    impl ManagedObject for Blank {
        fn type_name(&self) -> &str {
            "Blank"
        }

        fn value(&self, _field: &str) -> Option<&Value> {
            None
        }
    }

    #[test]
    fn test_settle_pass() {
        assert!(HookOutcome::pass().settle("T", "h", || unreachable!()).is_ok());
    }

    #[test]
    fn test_settle_pass_with_error_discards_and_warns() {
        let (result, lines) = Logger::capture(|| {
            HookOutcome::pass_with_error(ElementaryError::field("name", "ignored"))
                .settle("Person", "name", || unreachable!())
        });

        assert!(result.is_ok());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("HOOK_CONTRACT_VIOLATION"));
        assert!(lines[0].contains("WARN"));
    }

    #[test]
    fn test_settle_fail_without_error_synthesizes() {
        let (result, lines) = Logger::capture(|| {
            HookOutcome::fail_without_error()
                .settle("Person", "name", || ElementaryError::field("name", "generic"))
        });

        assert_eq!(result.unwrap_err().reason(), "generic");
        assert!(lines[0].contains("HOOK_FAILED_WITHOUT_ERROR"));
    }

    #[test]
    fn test_hook_set_field_lookup() {
        let hooks = HookSet::new().on_field("name", |v| {
            HookOutcome::check(v.as_str().map_or(false, |s| !s.is_empty()), || {
                ElementaryError::field("name", "empty")
            })
        });

        assert!(hooks.check_field(&Blank, "age", &json!(3)).is_none());
        assert!(hooks.check_field(&Blank, "name", &json!("Ada")).unwrap().passed());
        assert!(!hooks.check_field(&Blank, "name", &json!("")).unwrap().passed());
    }

    #[test]
    fn test_hook_set_consistency_by_category() {
        let hooks = HookSet::new().on_write(|_| HookOutcome::fail_without_error());

        assert!(hooks.check_consistency(&Blank, OperationCategory::Write).is_some());
        assert!(hooks.check_consistency(&Blank, OperationCategory::Delete).is_none());
    }

    #[test]
    fn test_catalog_lookup_is_exact() {
        let catalog = HookCatalog::new().with("Person", HookSet::new());
        assert!(catalog.get("Person").is_some());
        assert!(catalog.get("Employee").is_none());
    }
}
