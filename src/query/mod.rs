//! Query façade for modelguard
//!
//! Thin insert/fetch helpers over a persistence collaborator. Predicate
//! evaluation and sorting belong to the store.

mod context;
mod errors;
mod facade;
mod predicate;

pub use context::ContextId;
pub use errors::{QueryError, QueryResult, StoreError, StoreResult};
pub use facade::{PersistenceStore, QueryFacade};
pub use predicate::{FilterOp, Predicate, SortDirection, SortSpec};
