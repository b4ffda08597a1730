//! In-memory model registry
//!
//! Built once from type declarations; read-only afterwards and safe to
//! share across threads without locking.

use std::collections::{HashMap, HashSet};

use super::errors::{ModelError, ModelResult};
use super::types::{ManagedField, ManagedType, TypeDef};

/// Resolved model: every type with its lineage materialized.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    types: HashMap<String, ManagedType>,
    /// Declaration order, for deterministic iteration
    order: Vec<String>,
}

impl ModelRegistry {
    /// Builds a registry from type declarations.
    ///
    /// # Errors
    ///
    /// - empty or duplicate type names
    /// - duplicate field names within one type
    /// - parents that are not declared
    /// - inheritance cycles
    /// - fields redeclared by a descendant of the declaring type
    pub fn from_types(defs: Vec<TypeDef>) -> ModelResult<Self> {
        let mut by_name: HashMap<String, TypeDef> = HashMap::with_capacity(defs.len());
        let mut order = Vec::with_capacity(defs.len());

        for def in defs {
            if def.name.is_empty() {
                return Err(ModelError::malformed("<types>", "type with empty name"));
            }
            let mut seen = HashSet::new();
            for field in &def.fields {
                if !seen.insert(field.name.as_str()) {
                    return Err(ModelError::duplicate_field(&def.name, &field.name));
                }
            }
            if by_name.contains_key(&def.name) {
                return Err(ModelError::duplicate_type(def.name));
            }
            order.push(def.name.clone());
            by_name.insert(def.name.clone(), def);
        }

        let mut lineages = HashMap::with_capacity(order.len());
        for name in &order {
            let lineage = resolve_lineage(name, &by_name)?;
            check_inherited_fields(name, &lineage, &by_name)?;
            lineages.insert(name.clone(), lineage);
        }

        let types = by_name
            .into_iter()
            .map(|(name, def)| {
                let lineage = lineages.remove(&name).unwrap_or_default();
                (name, ManagedType::new(def, lineage))
            })
            .collect();

        Ok(Self { types, order })
    }

    /// Gets a type by name
    pub fn get(&self, type_name: &str) -> Option<&ManagedType> {
        self.types.get(type_name)
    }

    /// Gets a type by name or fails with `MG_MODEL_UNKNOWN_TYPE`
    pub fn require(&self, type_name: &str) -> ModelResult<&ManagedType> {
        self.get(type_name)
            .ok_or_else(|| ModelError::unknown_type(type_name))
    }

    /// Returns true if the type is declared
    pub fn contains(&self, type_name: &str) -> bool {
        self.types.contains_key(type_name)
    }

    /// Fields declared by the type itself, in declaration order
    pub fn declared_fields(&self, type_name: &str) -> &[ManagedField] {
        self.get(type_name)
            .map(ManagedType::declared_fields)
            .unwrap_or(&[])
    }

    /// Lineage root-most first; empty for unknown types
    pub fn lineage(&self, type_name: &str) -> &[String] {
        self.get(type_name).map(ManagedType::lineage).unwrap_or(&[])
    }

    /// Returns true if `type_name` is `ancestor` or one of its descendants
    pub fn is_kind_of(&self, type_name: &str, ancestor: &str) -> bool {
        self.lineage(type_name).iter().any(|t| t == ancestor)
    }

    /// All types in declaration order
    pub fn types(&self) -> impl Iterator<Item = &ManagedType> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// Number of declared types
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if no types are declared
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Walks parent links up to a root and returns the chain root-first.
fn resolve_lineage(name: &str, by_name: &HashMap<String, TypeDef>) -> ModelResult<Vec<String>> {
    let mut chain = vec![name.to_string()];
    let mut visited: HashSet<&str> = HashSet::from([name]);
    let mut current = &by_name[name];

    while let Some(parent) = current.parent.as_deref() {
        let parent_def = by_name
            .get(parent)
            .ok_or_else(|| ModelError::unknown_parent(&current.name, parent))?;
        if !visited.insert(parent) {
            return Err(ModelError::cycle(name));
        }
        chain.push(parent.to_string());
        current = parent_def;
    }

    chain.reverse();
    Ok(chain)
}

/// A field belongs to exactly one level of a lineage.
fn check_inherited_fields(
    name: &str,
    lineage: &[String],
    by_name: &HashMap<String, TypeDef>,
) -> ModelResult<()> {
    let Some((_, ancestors)) = lineage.split_last() else {
        return Ok(());
    };
    let own = &by_name[name].fields;

    for ancestor in ancestors {
        let Some(ancestor_def) = by_name.get(ancestor) else {
            continue;
        };
        if let Some(field) = ancestor_def
            .fields
            .iter()
            .find(|f| own.iter().any(|o| o.name == f.name))
        {
            return Err(ModelError::redeclared_field(name, &field.name, ancestor));
        }
    }
    Ok(())
}
