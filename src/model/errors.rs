//! Model error types
//!
//! Error codes:
//! - MG_MODEL_MALFORMED
//! - MG_MODEL_DUPLICATE_TYPE
//! - MG_MODEL_DUPLICATE_FIELD
//! - MG_MODEL_UNKNOWN_PARENT
//! - MG_MODEL_CYCLE
//! - MG_MODEL_UNKNOWN_TYPE

use std::fmt;

/// Model-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelErrorCode {
    /// Model file unreadable or not valid JSON
    MgModelMalformed,
    /// Two types share a name
    MgModelDuplicateType,
    /// A type declares the same field twice
    MgModelDuplicateField,
    /// A type names a parent that is not declared
    MgModelUnknownParent,
    /// Inheritance chain loops back on itself
    MgModelCycle,
    /// Lookup of a type that is not in the model
    MgModelUnknownType,
}

impl ModelErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            ModelErrorCode::MgModelMalformed => "MG_MODEL_MALFORMED",
            ModelErrorCode::MgModelDuplicateType => "MG_MODEL_DUPLICATE_TYPE",
            ModelErrorCode::MgModelDuplicateField => "MG_MODEL_DUPLICATE_FIELD",
            ModelErrorCode::MgModelUnknownParent => "MG_MODEL_UNKNOWN_PARENT",
            ModelErrorCode::MgModelCycle => "MG_MODEL_CYCLE",
            ModelErrorCode::MgModelUnknownType => "MG_MODEL_UNKNOWN_TYPE",
        }
    }
}

impl fmt::Display for ModelErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Model error with context
#[derive(Debug, Clone)]
pub struct ModelError {
    code: ModelErrorCode,
    message: String,
    type_name: Option<String>,
}

impl ModelError {
    /// Malformed or unreadable model source
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: ModelErrorCode::MgModelMalformed,
            message: format!("Malformed model '{}': {}", source.into(), reason.into()),
            type_name: None,
        }
    }

    /// Duplicate type declaration
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelDuplicateType,
            message: format!("Type '{}' declared more than once", name),
            type_name: Some(name),
        }
    }

    /// Duplicate field within one type
    pub fn duplicate_field(type_name: impl Into<String>, field: &str) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelDuplicateField,
            message: format!("Type '{}' declares field '{}' more than once", name, field),
            type_name: Some(name),
        }
    }

    /// Field already declared by an ancestor
    pub fn redeclared_field(type_name: impl Into<String>, field: &str, ancestor: &str) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelDuplicateField,
            message: format!(
                "Type '{}' redeclares field '{}' inherited from '{}'",
                name, field, ancestor
            ),
            type_name: Some(name),
        }
    }

    /// Parent type not declared
    pub fn unknown_parent(type_name: impl Into<String>, parent: &str) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelUnknownParent,
            message: format!("Type '{}' extends undeclared type '{}'", name, parent),
            type_name: Some(name),
        }
    }

    /// Inheritance cycle
    pub fn cycle(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelCycle,
            message: format!("Inheritance cycle through type '{}'", name),
            type_name: Some(name),
        }
    }

    /// Unknown type lookup
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let name = type_name.into();
        Self {
            code: ModelErrorCode::MgModelUnknownType,
            message: format!("Type '{}' not found in model", name),
            type_name: Some(name),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> ModelErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending type if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for ModelError {}

/// Result type for model operations
pub type ModelResult<T> = Result<T, ModelError>;
