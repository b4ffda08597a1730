//! modelguard - inheritance-aware validation for persisted object models
//!
//! Types form single-inheritance hierarchies. Each level may declare field
//! checks and whole-object consistency checks; the engine runs all of them
//! along the lineage and reports every failure at once.

pub mod cli;
pub mod config;
pub mod model;
pub mod observability;
pub mod query;
pub mod store;
pub mod validation;
