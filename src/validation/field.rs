//! Field Validator
//!
//! Validates one candidate value by delegating to the most-derived field
//! check found along the object's lineage.

use serde_json::Value;

use super::errors::ElementaryError;
use super::hooks::{HookCatalog, ManagedObject};
use crate::model::ModelRegistry;

/// Validates single field values against user-supplied checks
pub struct FieldValidator<'a> {
    model: &'a ModelRegistry,
    hooks: &'a HookCatalog,
    generic_reason: &'a str,
}

impl<'a> FieldValidator<'a> {
    pub fn new(model: &'a ModelRegistry, hooks: &'a HookCatalog, generic_reason: &'a str) -> Self {
        Self {
            model,
            hooks,
            generic_reason,
        }
    }

    /// Validates `candidate` for `field` on `object`.
    ///
    /// Passes when no level of the lineage checks this field. Errors
    /// without a field name are tagged with `field`.
    pub fn validate_field(
        &self,
        object: &dyn ManagedObject,
        field: &str,
        candidate: &Value,
    ) -> Result<(), ElementaryError> {
        let lineage = self.model.lineage(object.type_name());

        for level in lineage.iter().rev() {
            let Some(hooks) = self.hooks.get(level) else {
                continue;
            };
            if let Some(outcome) = hooks.check_field(object, field, candidate) {
                return outcome
                    .settle(level, field, || {
                        ElementaryError::field(field, self.generic_reason)
                    })
                    .map_err(|e| e.or_field(field));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ManagedField, TypeDef};
    use crate::observability::Logger;
    use crate::validation::hooks::{HookOutcome, HookSet};
    use serde_json::json;

    struct Obj(&'static str);

    impl ManagedObject for Obj {
        fn type_name(&self) -> &str {
            self.0
        }

        fn value(&self, _field: &str) -> Option<&Value> {
            None
        }
    }

    fn model() -> ModelRegistry {
        ModelRegistry::from_types(vec![
            TypeDef::root("Person").with_field(ManagedField::managed("name")),
            TypeDef::extends("Employee", "Person"),
        ])
        .unwrap()
    }

    fn non_empty(v: &Value) -> HookOutcome {
        HookOutcome::check(v.as_str().map_or(false, |s| !s.is_empty()), || {
            ElementaryError::field("name", "must not be empty")
        })
    }

    #[test]
    fn test_no_hook_passes() {
        let model = model();
        let hooks = HookCatalog::new();
        let validator = FieldValidator::new(&model, &hooks, "generic");

        assert!(validator.validate_field(&Obj("Person"), "name", &json!("")).is_ok());
    }

    #[test]
    fn test_hook_rejects() {
        let model = model();
        let hooks = HookCatalog::new().with("Person", HookSet::new().on_field("name", non_empty));
        let validator = FieldValidator::new(&model, &hooks, "generic");

        let err = validator
            .validate_field(&Obj("Person"), "name", &json!(""))
            .unwrap_err();
        assert_eq!(err.field_name(), Some("name"));
        assert_eq!(err.reason(), "must not be empty");
        assert!(validator.validate_field(&Obj("Person"), "name", &json!("Ada")).is_ok());
    }

    #[test]
    fn test_inherited_hook_applies_to_subtype() {
        let model = model();
        let hooks = HookCatalog::new().with("Person", HookSet::new().on_field("name", non_empty));
        let validator = FieldValidator::new(&model, &hooks, "generic");

        assert!(validator
            .validate_field(&Obj("Employee"), "name", &json!(""))
            .is_err());
    }

    #[test]
    fn test_most_derived_hook_wins() {
        let model = model();
        let hooks = HookCatalog::new()
            .with("Person", HookSet::new().on_field("name", non_empty))
            .with(
                "Employee",
                HookSet::new().on_field("name", |_| HookOutcome::pass()),
            );
        let validator = FieldValidator::new(&model, &hooks, "generic");

        assert!(validator.validate_field(&Obj("Employee"), "name", &json!("")).is_ok());
        assert!(validator.validate_field(&Obj("Person"), "name", &json!("")).is_err());
    }

    #[test]
    fn test_fail_without_error_synthesizes_generic() {
        let model = model();
        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new().on_field("name", |_| HookOutcome::fail_without_error()),
        );
        let validator = FieldValidator::new(&model, &hooks, "rejected by check");

        let (result, lines) =
            Logger::capture(|| validator.validate_field(&Obj("Person"), "name", &json!("x")));
        let err = result.unwrap_err();
        assert_eq!(err.reason(), "rejected by check");
        assert_eq!(err.field_name(), Some("name"));
        assert!(lines.iter().any(|l| l.contains("HOOK_FAILED_WITHOUT_ERROR")));
    }

    #[test]
    fn test_pass_with_error_is_pass() {
        let model = model();
        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new().on_field("name", |_| {
                HookOutcome::pass_with_error(ElementaryError::field("name", "noise"))
            }),
        );
        let validator = FieldValidator::new(&model, &hooks, "generic");

        let (result, lines) =
            Logger::capture(|| validator.validate_field(&Obj("Person"), "name", &json!("x")));
        assert!(result.is_ok());
        assert!(lines.iter().any(|l| l.contains("HOOK_CONTRACT_VIOLATION")));
    }

    #[test]
    fn test_error_without_field_is_tagged() {
        let model = model();
        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new().on_field("name", |_| {
                HookOutcome::fail(ElementaryError::consistency("odd"))
            }),
        );
        let validator = FieldValidator::new(&model, &hooks, "generic");

        let err = validator
            .validate_field(&Obj("Person"), "name", &json!("x"))
            .unwrap_err();
        assert_eq!(err.field_name(), Some("name"));
    }
}
