//! Model type definitions
//!
//! A model is a set of named types forming single-rooted inheritance
//! chains. Each type declares its own fields; inherited fields are reached
//! through the lineage.

use serde::{Deserialize, Serialize};

/// Storage kind of a declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Stored and managed by the persistence layer; gets a validation entry
    Managed,
    /// Computed or transient; never validated by the engine
    Plain,
}

/// A field declared by exactly one type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedField {
    pub name: String,
    pub kind: FieldKind,
}

impl ManagedField {
    /// Create a framework-managed field
    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Managed,
        }
    }

    /// Create a plain (computed) field
    pub fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Plain,
        }
    }

    /// Returns true if the persistence layer manages this field
    pub fn is_managed(&self) -> bool {
        self.kind == FieldKind::Managed
    }
}

/// Type declaration as written in a model file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDef {
    /// Unique type name
    pub name: String,
    /// Immediate ancestor; `None` for a root type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Fields declared by this type only
    #[serde(default)]
    pub fields: Vec<ManagedField>,
}

impl TypeDef {
    /// Create a root type
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Create a type extending `parent`
    pub fn extends(name: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: Some(parent.into()),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Builder: add a field
    pub fn with_field(mut self, field: ManagedField) -> Self {
        self.fields.push(field);
        self
    }
}

/// Serialized model file layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub types: Vec<TypeDef>,
}

/// A resolved type: declaration plus materialized lineage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedType {
    name: String,
    parent: Option<String>,
    fields: Vec<ManagedField>,
    /// Root-most declared type first, this type last
    lineage: Vec<String>,
}

impl ManagedType {
    pub(crate) fn new(def: TypeDef, lineage: Vec<String>) -> Self {
        Self {
            name: def.name,
            parent: def.parent,
            fields: def.fields,
            lineage,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Immediate ancestor
    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    /// Fields declared by this type (not inherited)
    pub fn declared_fields(&self) -> &[ManagedField] {
        &self.fields
    }

    /// Declared fields filtered to the managed kind
    pub fn managed_fields(&self) -> impl Iterator<Item = &ManagedField> {
        self.fields.iter().filter(|f| f.is_managed())
    }

    /// Lineage from the root-most type down to this type, inclusive
    pub fn lineage(&self) -> &[String] {
        &self.lineage
    }

    /// Returns true if this type has no declared ancestor
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
