//! Reference persistence store
//!
//! An in-memory [`PersistenceStore`](crate::query::PersistenceStore) with
//! contexts, pending changes and validated commits.

mod filters;
mod memory;
mod record;
mod sorter;

pub use filters::PredicateFilter;
pub use memory::MemoryStore;
pub use record::{ObjectId, Record};
pub use sorter::RecordSorter;
