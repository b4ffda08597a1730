//! Named error kinds
//!
//! Maps error identifiers to (domain, code, description) so validation
//! results can be reported uniformly. Kinds are registered once at startup
//! and read many times afterwards.

use std::collections::{BTreeMap, HashMap};
use std::sync::{PoisonError, RwLock};

use serde::Serialize;

use super::errors::{AggregateError, ElementaryError, ValidationErrorCode};

/// Identifier of the single-field failure kind
pub const FIELD_VALIDATION_KIND: &str = "validation.field";
/// Identifier of the consistency failure kind
pub const CONSISTENCY_KIND: &str = "validation.consistency";
/// Identifier of the multiple-errors kind
pub const MULTIPLE_ERRORS_KIND: &str = "validation.multiple";

/// A registered error kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorKind {
    pub id: String,
    pub domain: String,
    pub code: i64,
    pub description: String,
}

/// An error built from a registered kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedError {
    pub id: String,
    pub domain: String,
    pub code: i64,
    pub description: String,
    pub info: BTreeMap<String, String>,
    /// Underlying failures, in collection order
    #[serde(serialize_with = "serialize_details")]
    pub details: Vec<ElementaryError>,
}

#[allow(clippy::ptr_arg)]
fn serialize_details<S: serde::Serializer>(
    details: &Vec<ElementaryError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(details.iter().map(|e| e.to_string()))
}

/// Registry of error kinds
#[derive(Debug, Default)]
pub struct ErrorCatalog {
    kinds: RwLock<HashMap<String, ErrorKind>>,
}

impl ErrorCatalog {
    /// Creates an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog holding the engine's standard kinds under `domain`
    pub fn with_standard_kinds(domain: &str) -> Self {
        let catalog = Self::new();
        catalog.register(FIELD_VALIDATION_KIND, domain, 1550, "A field value failed validation");
        catalog.register(CONSISTENCY_KIND, domain, 1551, "An object failed a consistency check");
        catalog.register(MULTIPLE_ERRORS_KIND, domain, 1560, "Multiple validation errors occurred");
        catalog
    }

    /// Registers a kind. Returns false, leaving the first registration in
    /// place, if `id` is already taken.
    pub fn register(&self, id: &str, domain: &str, code: i64, description: &str) -> bool {
        let mut kinds = self.kinds.write().unwrap_or_else(PoisonError::into_inner);
        if kinds.contains_key(id) {
            return false;
        }
        kinds.insert(
            id.to_string(),
            ErrorKind {
                id: id.to_string(),
                domain: domain.to_string(),
                code,
                description: description.to_string(),
            },
        );
        true
    }

    /// Looks up a kind
    pub fn kind(&self, id: &str) -> Option<ErrorKind> {
        self.kinds
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Builds an error of a registered kind
    pub fn build(&self, id: &str, info: BTreeMap<String, String>) -> Option<ReportedError> {
        self.kind(id).map(|kind| ReportedError {
            id: kind.id,
            domain: kind.domain,
            code: kind.code,
            description: kind.description,
            info,
            details: Vec::new(),
        })
    }

    /// Reports a validation result through its kind.
    ///
    /// Unregistered kinds are reported with code 0 and the validation code
    /// as description.
    pub fn report(&self, error: &AggregateError) -> ReportedError {
        let (id, info) = match error {
            AggregateError::Single(e) => (kind_id(e.code()), single_info(e)),
            AggregateError::Multiple(list) => {
                let mut info = BTreeMap::new();
                info.insert("count".to_string(), list.len().to_string());
                (MULTIPLE_ERRORS_KIND, info)
            }
        };

        let mut reported = self.build(id, info.clone()).unwrap_or_else(|| ReportedError {
            id: id.to_string(),
            domain: String::new(),
            code: 0,
            description: error.code().code().to_string(),
            info,
            details: Vec::new(),
        });
        reported.details = error.errors().to_vec();
        reported
    }
}

fn kind_id(code: ValidationErrorCode) -> &'static str {
    match code {
        ValidationErrorCode::MgFieldValidationFailed => FIELD_VALIDATION_KIND,
        ValidationErrorCode::MgConsistencyCheckFailed => CONSISTENCY_KIND,
        ValidationErrorCode::MgMultipleValidationErrors => MULTIPLE_ERRORS_KIND,
    }
}

fn single_info(error: &ElementaryError) -> BTreeMap<String, String> {
    let mut info = BTreeMap::new();
    info.insert("reason".to_string(), error.reason().to_string());
    if let Some(field) = error.field_name() {
        info.insert("field".to_string(), field.to_string());
    }
    if let Some(level) = error.level() {
        info.insert("level".to_string(), level.to_string());
    }
    info
}
