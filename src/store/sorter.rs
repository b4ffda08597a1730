//! Record sorting
//!
//! Stable, multi-key. Missing fields sort first; across JSON types the
//! order is null < bool < number < string < array < object.

use std::cmp::Ordering;

use serde_json::Value;

use super::record::Record;
use crate::query::{SortDirection, SortSpec};

/// Sorts records by a list of sort keys
pub struct RecordSorter;

impl RecordSorter {
    pub fn sort(records: &mut [Record], specs: &[SortSpec]) {
        if specs.is_empty() {
            return;
        }
        records.sort_by(|a, b| {
            specs
                .iter()
                .map(|spec| {
                    let ordering = Self::compare_values(a.get(&spec.field), b.get(&spec.field));
                    match spec.direction {
                        SortDirection::Asc => ordering,
                        SortDirection::Desc => ordering.reverse(),
                    }
                })
                .find(|o| *o != Ordering::Equal)
                .unwrap_or(Ordering::Equal)
        });
    }

    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                match (a_val, b_val) {
                    (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
                    (Value::Number(x), Value::Number(y)) => {
                        if let (Some(xi), Some(yi)) = (x.as_i64(), y.as_i64()) {
                            return xi.cmp(&yi);
                        }
                        if let (Some(xu), Some(yu)) = (x.as_u64(), y.as_u64()) {
                            return xu.cmp(&yu);
                        }
                        let x = x.as_f64().unwrap_or(0.0);
                        let y = y.as_f64().unwrap_or(0.0);
                        x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(x), Value::String(y)) => x.cmp(y),
                    _ => type_order(a_val).cmp(&type_order(b_val)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(name: &str, age: i64) -> Record {
        Record::new("Person")
            .with("name", json!(name))
            .with("age", json!(age))
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("name").and_then(Value::as_str).unwrap())
            .collect()
    }

    #[test]
    fn test_sort_ascending_and_descending() {
        let mut records = vec![person("c", 30), person("a", 20), person("b", 25)];

        RecordSorter::sort(&mut records, &[SortSpec::asc("age")]);
        assert_eq!(names(&records), vec!["a", "b", "c"]);

        RecordSorter::sort(&mut records, &[SortSpec::desc("age")]);
        assert_eq!(names(&records), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_secondary_key() {
        let mut records = vec![person("b", 30), person("a", 30), person("c", 20)];
        RecordSorter::sort(&mut records, &[SortSpec::desc("age"), SortSpec::asc("name")]);
        assert_eq!(names(&records), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_missing_field_sorts_first() {
        let mut records = vec![person("a", 1), Record::new("Person").with("name", json!("z"))];
        RecordSorter::sort(&mut records, &[SortSpec::asc("age")]);
        assert_eq!(names(&records), vec!["z", "a"]);
    }

    #[test]
    fn test_large_integers_keep_order() {
        let big = 9_007_199_254_740_993_i64;
        let mut records = vec![
            Record::new("Person").with("name", json!("b")).with("age", json!(big)),
            Record::new("Person").with("name", json!("a")).with("age", json!(big - 1)),
        ];
        RecordSorter::sort(&mut records, &[SortSpec::asc("age")]);
        assert_eq!(names(&records), vec!["a", "b"]);
    }

    #[test]
    fn test_sort_stable() {
        let mut records = vec![person("x", 5), person("y", 5), person("z", 5)];
        RecordSorter::sort(&mut records, &[SortSpec::asc("age")]);
        assert_eq!(names(&records), vec!["x", "y", "z"]);
    }
}
