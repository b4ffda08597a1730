//! Stored objects

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::validation::ManagedObject;

/// Identity of a stored object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One object: identity, concrete type and field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: ObjectId,
    pub type_name: String,
    pub values: Map<String, Value>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            id: ObjectId::new(),
            type_name: type_name.into(),
            values: Map::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn set(&mut self, field: impl Into<String>, value: Value) {
        self.values.insert(field.into(), value);
    }

    /// Builder form of [`Record::set`]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set(field, value);
        self
    }
}

impl ManagedObject for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_values() {
        let record = Record::new("Person").with("name", json!("Ada"));
        assert_eq!(record.get("name"), Some(&json!("Ada")));
        assert_eq!(ManagedObject::value(&record, "age"), None);
        assert_eq!(ManagedObject::type_name(&record), "Person");
    }
}
