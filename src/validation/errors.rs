//! Validation error types
//!
//! Error codes:
//! - MG_FIELD_VALIDATION_FAILED
//! - MG_CONSISTENCY_CHECK_FAILED
//! - MG_MULTIPLE_VALIDATION_ERRORS
//!
//! `RegistrationError` is internal to installation: logged, never returned
//! from a validation entry point.

use std::fmt;

use thiserror::Error;

/// Validation error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorCode {
    /// A field's candidate value was rejected by its check
    MgFieldValidationFailed,
    /// A hierarchy level's consistency check rejected the object
    MgConsistencyCheckFailed,
    /// Two or more failures combined
    MgMultipleValidationErrors,
}

impl ValidationErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::MgFieldValidationFailed => "MG_FIELD_VALIDATION_FAILED",
            ValidationErrorCode::MgConsistencyCheckFailed => "MG_CONSISTENCY_CHECK_FAILED",
            ValidationErrorCode::MgMultipleValidationErrors => "MG_MULTIPLE_VALIDATION_ERRORS",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One validation failure.
///
/// Built by hooks through [`ElementaryError::field`] or
/// [`ElementaryError::consistency`]; the engine fills in the field name or
/// hierarchy level when the hook leaves them blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementaryError {
    code: ValidationErrorCode,
    field: Option<String>,
    level: Option<String>,
    reason: String,
}

impl ElementaryError {
    /// A rejected field value
    pub fn field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::MgFieldValidationFailed,
            field: Some(field.into()),
            level: None,
            reason: reason.into(),
        }
    }

    /// A rejected object-level consistency check
    pub fn consistency(reason: impl Into<String>) -> Self {
        Self {
            code: ValidationErrorCode::MgConsistencyCheckFailed,
            field: None,
            level: None,
            reason: reason.into(),
        }
    }

    /// Associates a field, keeping one already set
    pub fn or_field(mut self, field: &str) -> Self {
        if self.field.is_none() {
            self.field = Some(field.to_string());
        }
        self
    }

    /// Associates the hierarchy level that produced the error, keeping one already set
    pub fn or_level(mut self, level: &str) -> Self {
        if self.level.is_none() {
            self.level = Some(level.to_string());
        }
        self
    }

    pub fn code(&self) -> ValidationErrorCode {
        self.code
    }

    pub fn field_name(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Type name of the hierarchy level, for consistency failures
    pub fn level(&self) -> Option<&str> {
        self.level.as_deref()
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn is_field_error(&self) -> bool {
        self.code == ValidationErrorCode::MgFieldValidationFailed
    }

    pub fn is_consistency_error(&self) -> bool {
        self.code == ValidationErrorCode::MgConsistencyCheckFailed
    }
}

impl fmt::Display for ElementaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)?;
        if let Some(ref level) = self.level {
            write!(f, " [{}]", level)?;
        }
        if let Some(ref field) = self.field {
            write!(f, " field '{}'", field)?;
        }
        write!(f, ": {}", self.reason)
    }
}

impl std::error::Error for ElementaryError {}

/// One or more validation failures.
///
/// Append-only: once `Multiple`, an aggregate is never demoted to `Single`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateError {
    Single(ElementaryError),
    Multiple(Vec<ElementaryError>),
}

impl AggregateError {
    /// Elementary errors in collection order
    pub fn errors(&self) -> &[ElementaryError] {
        match self {
            AggregateError::Single(e) => std::slice::from_ref(e),
            AggregateError::Multiple(list) => list,
        }
    }

    pub fn into_errors(self) -> Vec<ElementaryError> {
        match self {
            AggregateError::Single(e) => vec![e],
            AggregateError::Multiple(list) => list,
        }
    }

    pub fn len(&self) -> usize {
        self.errors().len()
    }

    /// Never true; an aggregate holds at least one error once built by `combine`
    pub fn is_empty(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, AggregateError::Multiple(_))
    }

    /// Code of the single error, or the multiple-errors code
    pub fn code(&self) -> ValidationErrorCode {
        match self {
            AggregateError::Single(e) => e.code(),
            AggregateError::Multiple(_) => ValidationErrorCode::MgMultipleValidationErrors,
        }
    }

    /// Returns the single error when not `Multiple`
    pub fn as_single(&self) -> Option<&ElementaryError> {
        match self {
            AggregateError::Single(e) => Some(e),
            AggregateError::Multiple(_) => None,
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateError::Single(e) => write!(f, "{}", e),
            AggregateError::Multiple(list) => {
                write!(f, "{}: {} errors", self.code(), list.len())?;
                for e in list {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for AggregateError {}

impl From<ElementaryError> for AggregateError {
    fn from(error: ElementaryError) -> Self {
        AggregateError::Single(error)
    }
}

/// Failure to register a validation entry point during installation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("entry point '{entry}' already registered on type '{type_name}'")]
    NameCollision { type_name: String, entry: String },

    #[error("type '{0}' is not declared in the model")]
    UnknownType(String),
}
