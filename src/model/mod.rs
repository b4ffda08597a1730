//! Model metadata for modelguard
//!
//! Types, their declared fields and their lineage. Loaded once and
//! read-only for the rest of the process.

mod errors;
mod loader;
mod registry;
mod types;

pub use errors::{ModelError, ModelErrorCode, ModelResult};
pub use loader::ModelLoader;
pub use registry::ModelRegistry;
pub use types::{FieldKind, ManagedField, ManagedType, ModelDocument, TypeDef};
