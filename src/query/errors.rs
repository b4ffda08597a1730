//! Query and store errors

use thiserror::Error;

use super::context::ContextId;
use crate::validation::AggregateError;

/// Errors reported by a persistence store
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("unknown context: {0}")]
    UnknownContext(ContextId),

    #[error("unknown type: {0}")]
    UnknownType(String),

    #[error("object not found: {0}")]
    ObjectNotFound(String),

    #[error("fetch rejected: {0}")]
    FetchRejected(String),

    #[error("commit rejected by validation: {0}")]
    ValidationFailed(AggregateError),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by the query façade
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    #[error("fetch of '{type_name}' failed: {reason}")]
    FetchFailed { type_name: String, reason: String },

    #[error("insert of '{type_name}' failed: {reason}")]
    InsertFailed { type_name: String, reason: String },
}

impl QueryError {
    /// The store's reason
    pub fn reason(&self) -> &str {
        match self {
            QueryError::FetchFailed { reason, .. } | QueryError::InsertFailed { reason, .. } => {
                reason
            }
        }
    }
}

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_reason() {
        let err = QueryError::FetchFailed {
            type_name: "Person".into(),
            reason: "disk on fire".into(),
        };
        assert_eq!(err.reason(), "disk on fire");
        assert!(err.to_string().contains("Person"));
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::UnknownType("Ghost".into());
        assert_eq!(err.to_string(), "unknown type: Ghost");
    }
}
