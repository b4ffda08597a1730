//! Inheritance-aware validation
//!
//! # Flow
//!
//! 1. First touch of a type installs its entry points (ancestors first)
//! 2. The persistence layer calls `validate` for insert, update or delete
//! 3. The base step runs every installed Field Validator along the lineage
//! 4. Each lineage level's consistency check runs once, root-most first
//! 5. Failures are combined into one `AggregateError`
//!
//! Hook contract violations and registration failures are logged, never
//! returned.

mod aggregate;
mod catalog;
mod engine;
mod errors;
mod field;
mod hierarchy;
mod hooks;
mod installer;
mod operation;

pub use aggregate::{absorb, combine};
pub use catalog::{
    ErrorCatalog, ErrorKind, ReportedError, CONSISTENCY_KIND, FIELD_VALIDATION_KIND,
    MULTIPLE_ERRORS_KIND,
};
pub use engine::ValidationEngine;
pub use errors::{AggregateError, ElementaryError, RegistrationError, ValidationErrorCode};
pub use field::FieldValidator;
pub use hierarchy::HierarchyValidator;
pub use hooks::{HookCatalog, HookOutcome, HookSet, ManagedObject, ValidationHooks};
pub use installer::{field_entry_name, plan_entries, EntryPoint, HookInstaller, InstallPlan, TypeEntries};
pub use operation::{Operation, OperationCategory};
