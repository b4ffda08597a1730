//! Predicate filtering
//!
//! No type coercion. Missing and null fields never match.

use std::cmp::Ordering;

use serde_json::{Map, Value};

use crate::query::{FilterOp, Predicate};

/// Evaluates predicates against record values
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if values match all predicates (AND semantics)
    pub fn matches(values: &Map<String, Value>, predicates: &[Predicate]) -> bool {
        predicates
            .iter()
            .all(|pred| Self::matches_predicate(values, pred))
    }

    fn matches_predicate(values: &Map<String, Value>, predicate: &Predicate) -> bool {
        let actual = match values.get(&predicate.field) {
            Some(v) if !v.is_null() => v,
            _ => return false,
        };

        match &predicate.op {
            FilterOp::Eq(expected) => actual == expected,
            FilterOp::Gte(bound) => Self::compare(actual, bound).is_some_and(Ordering::is_ge),
            FilterOp::Gt(bound) => Self::compare(actual, bound).is_some_and(Ordering::is_gt),
            FilterOp::Lte(bound) => Self::compare(actual, bound).is_some_and(Ordering::is_le),
            FilterOp::Lt(bound) => Self::compare(actual, bound).is_some_and(Ordering::is_lt),
        }
    }

    /// Orders numbers against numbers and strings against strings
    fn compare(actual: &Value, bound: &Value) -> Option<Ordering> {
        match (actual, bound) {
            (Value::Number(a), Value::Number(b)) => {
                if let (Some(ai), Some(bi)) = (a.as_i64(), b.as_i64()) {
                    return Some(ai.cmp(&bi));
                }
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}
