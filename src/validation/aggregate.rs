//! Error aggregation
//!
//! Pure functions; every call returns a fresh aggregate and callers rebind
//! their accumulator to the result.

use super::errors::{AggregateError, ElementaryError};

/// Combines one new failure into an existing aggregate.
///
/// - no new error: `existing` unchanged
/// - no existing aggregate: `Single(new)`
/// - `Single(e1)`: `Multiple([e1, new])`
/// - `Multiple(list)`: `Multiple(list + [new])`
pub fn combine(
    new: Option<ElementaryError>,
    existing: Option<AggregateError>,
) -> Option<AggregateError> {
    let Some(new) = new else {
        return existing;
    };

    Some(match existing {
        None => AggregateError::Single(new),
        Some(AggregateError::Single(first)) => AggregateError::Multiple(vec![first, new]),
        Some(AggregateError::Multiple(mut list)) => {
            list.push(new);
            AggregateError::Multiple(list)
        }
    })
}

/// Folds every error of `other` into `existing`, in order.
pub fn absorb(existing: Option<AggregateError>, other: Option<AggregateError>) -> Option<AggregateError> {
    match other {
        None => existing,
        Some(other) => other
            .into_errors()
            .into_iter()
            .fold(existing, |acc, e| combine(Some(e), acc)),
    }
}
