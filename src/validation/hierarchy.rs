//! Hierarchy Validator
//!
//! Levels, in order:
//! 1. the framework base step, which runs every installed Field Validator
//!    along the lineage
//! 2. each declared type, root-most first, concrete type last, invoking
//!    its consistency check for the operation's category once
//!
//! Failures are combined in that order.

use serde_json::Value;

use super::aggregate::combine;
use super::errors::{AggregateError, ElementaryError};
use super::field::FieldValidator;
use super::hooks::{HookCatalog, ManagedObject};
use super::installer::HookInstaller;
use super::operation::Operation;
use crate::config::EngineConfig;
use crate::model::ModelRegistry;

static NULL_VALUE: Value = Value::Null;

/// Walks an object's lineage collecting every applicable failure
pub struct HierarchyValidator<'a> {
    model: &'a ModelRegistry,
    hooks: &'a HookCatalog,
    installer: &'a HookInstaller,
    config: &'a EngineConfig,
}

impl<'a> HierarchyValidator<'a> {
    pub fn new(
        model: &'a ModelRegistry,
        hooks: &'a HookCatalog,
        installer: &'a HookInstaller,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            model,
            hooks,
            installer,
            config,
        }
    }

    /// Full walk: base step, then every lineage level's consistency check.
    pub fn validate_hierarchy(
        &self,
        object: &dyn ManagedObject,
        operation: Operation,
    ) -> Result<(), AggregateError> {
        let lineage = self.model.lineage(object.type_name());
        let category = operation.category();
        let hook = format!("consistency:{}", category.as_str());

        let mut collected = self.base_step(object, operation, lineage);

        for level in lineage {
            let Some(hooks) = self.hooks.get(level) else {
                continue;
            };
            let Some(outcome) = hooks.check_consistency(object, category) else {
                continue;
            };

            let result = outcome
                .settle(level, &hook, || {
                    ElementaryError::consistency(&self.config.generic_failure_reason)
                })
                .map_err(|e| e.or_level(level));
            collected = combine(result.err(), collected);
        }

        into_result(collected)
    }

    /// Base step alone, used when no level carries an operation entry.
    pub fn validate_base(
        &self,
        object: &dyn ManagedObject,
        operation: Operation,
    ) -> Result<(), AggregateError> {
        let lineage = self.model.lineage(object.type_name());
        into_result(self.base_step(object, operation, lineage))
    }

    fn base_step(
        &self,
        object: &dyn ManagedObject,
        operation: Operation,
        lineage: &[String],
    ) -> Option<AggregateError> {
        if operation == Operation::Delete && !self.config.field_checks_on_delete {
            return None;
        }

        let fields =
            FieldValidator::new(self.model, self.hooks, &self.config.generic_failure_reason);
        let mut collected = None;

        for level in lineage {
            let Some(entries) = self.installer.entries(level) else {
                continue;
            };
            for field in entries.fields() {
                let candidate = object.value(field).unwrap_or(&NULL_VALUE);
                let result = fields.validate_field(object, field, candidate);
                collected = combine(result.err(), collected);
            }
        }

        collected
    }
}

fn into_result(collected: Option<AggregateError>) -> Result<(), AggregateError> {
    match collected {
        None => Ok(()),
        Some(error) => Err(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ManagedField, TypeDef};
    use crate::validation::hooks::{HookOutcome, HookSet};
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    struct Obj {
        type_name: &'static str,
        values: HashMap<&'static str, Value>,
    }

    impl ManagedObject for Obj {
        fn type_name(&self) -> &str {
            self.type_name
        }

        fn value(&self, field: &str) -> Option<&Value> {
            self.values.get(field)
        }
    }

    fn model() -> Arc<ModelRegistry> {
        Arc::new(
            ModelRegistry::from_types(vec![
                TypeDef::root("Person")
                    .with_field(ManagedField::managed("name"))
                    .with_field(ManagedField::managed("age")),
                TypeDef::extends("Employee", "Person"),
                TypeDef::extends("Manager", "Employee").with_field(ManagedField::managed("reports")),
            ])
            .unwrap(),
        )
    }

    fn recording(log: &Arc<Mutex<Vec<String>>>, level: &'static str) -> HookSet {
        let log = Arc::clone(log);
        HookSet::new().on_write(move |_| {
            log.lock().unwrap().push(level.to_string());
            HookOutcome::pass()
        })
    }

    #[test]
    fn test_levels_visited_root_first_once() {
        let model = model();
        let installer = HookInstaller::new(Arc::clone(&model));
        installer.ensure_installed("Manager");
        let config = EngineConfig::default();

        let visits = Arc::new(Mutex::new(Vec::new()));
        let hooks = HookCatalog::new()
            .with("Person", recording(&visits, "Person"))
            .with("Employee", recording(&visits, "Employee"))
            .with("Manager", recording(&visits, "Manager"));

        let validator = HierarchyValidator::new(&model, &hooks, &installer, &config);
        let obj = Obj {
            type_name: "Manager",
            values: HashMap::new(),
        };

        assert!(validator.validate_hierarchy(&obj, Operation::Update).is_ok());
        assert_eq!(*visits.lock().unwrap(), vec!["Person", "Employee", "Manager"]);
    }

    #[test]
    fn test_base_step_covers_inherited_fields() {
        let model = model();
        let installer = HookInstaller::new(Arc::clone(&model));
        installer.ensure_installed("Manager");
        let config = EngineConfig::default();

        let hooks = HookCatalog::new()
            .with(
                "Person",
                HookSet::new().on_field("name", |v| {
                    HookOutcome::check(!v.is_null(), || ElementaryError::field("name", "required"))
                }),
            )
            .with(
                "Manager",
                HookSet::new().on_field("reports", |v| {
                    HookOutcome::check(v.as_i64().unwrap_or(0) > 0, || {
                        ElementaryError::field("reports", "needs reports")
                    })
                }),
            );

        let validator = HierarchyValidator::new(&model, &hooks, &installer, &config);
        let obj = Obj {
            type_name: "Manager",
            values: HashMap::from([("reports", json!(0))]),
        };

        let err = validator.validate_hierarchy(&obj, Operation::Insert).unwrap_err();
        let fields: Vec<_> = err.errors().iter().map(|e| e.field_name().unwrap()).collect();
        assert_eq!(fields, vec!["name", "reports"]);
    }

    #[test]
    fn test_consistency_failure_tagged_with_level() {
        let model = model();
        let installer = HookInstaller::new(Arc::clone(&model));
        installer.ensure_installed("Employee");
        let config = EngineConfig::default();

        let hooks = HookCatalog::new().with(
            "Employee",
            HookSet::new().on_delete(|_| HookOutcome::fail(ElementaryError::consistency("locked"))),
        );
        let validator = HierarchyValidator::new(&model, &hooks, &installer, &config);
        let obj = Obj {
            type_name: "Employee",
            values: HashMap::new(),
        };

        let err = validator.validate_hierarchy(&obj, Operation::Delete).unwrap_err();
        assert_eq!(err.as_single().unwrap().level(), Some("Employee"));
        assert!(validator.validate_hierarchy(&obj, Operation::Insert).is_ok());
    }

    #[test]
    fn test_delete_skips_fields_when_configured() {
        let model = model();
        let installer = HookInstaller::new(Arc::clone(&model));
        installer.ensure_installed("Person");
        let config = EngineConfig {
            field_checks_on_delete: false,
            ..EngineConfig::default()
        };

        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new().on_field("name", |_| HookOutcome::fail_without_error()),
        );
        let validator = HierarchyValidator::new(&model, &hooks, &installer, &config);
        let obj = Obj {
            type_name: "Person",
            values: HashMap::new(),
        };

        assert!(validator.validate_hierarchy(&obj, Operation::Delete).is_ok());
        assert!(validator.validate_base(&obj, Operation::Update).is_err());
    }
}
