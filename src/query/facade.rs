//! Query façade
//!
//! Insert and fetch helpers over any [`PersistenceStore`], with the
//! context defaulting to the store's default context.

use super::context::ContextId;
use super::errors::{QueryError, QueryResult, StoreResult};
use super::predicate::{Predicate, SortSpec};
use crate::observability::{log_event_with_fields, Event, Severity};

/// The persistence collaborator the façade drives
pub trait PersistenceStore {
    type Object;

    /// Context used when the caller names none
    fn default_context(&self) -> ContextId;

    /// Inserts a new, empty object of `type_name`
    fn insert_new(&self, type_name: &str, context: ContextId) -> StoreResult<Self::Object>;

    /// Objects of `type_name` (and its subtypes) matching every predicate,
    /// ordered by the sort keys
    fn fetch(
        &self,
        type_name: &str,
        predicates: &[Predicate],
        sort: &[SortSpec],
        context: ContextId,
    ) -> StoreResult<Vec<Self::Object>>;
}

/// Convenience operations bound to one store
pub struct QueryFacade<'s, S: PersistenceStore> {
    store: &'s S,
}

impl<'s, S: PersistenceStore> QueryFacade<'s, S> {
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Inserts a new object of `type_name`
    pub fn insert(&self, type_name: &str, context: Option<ContextId>) -> QueryResult<S::Object> {
        let context = context.unwrap_or_else(|| self.store.default_context());
        self.store
            .insert_new(type_name, context)
            .map_err(|e| QueryError::InsertFailed {
                type_name: type_name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Fetches matching objects; all or nothing, failures logged
    pub fn fetch(
        &self,
        type_name: &str,
        predicates: &[Predicate],
        sort: &[SortSpec],
        context: Option<ContextId>,
    ) -> QueryResult<Vec<S::Object>> {
        let context = context.unwrap_or_else(|| self.store.default_context());
        self.store
            .fetch(type_name, predicates, sort, context)
            .map_err(|e| {
                let reason = e.to_string();
                log_event_with_fields(
                    Severity::Error,
                    Event::FetchFailed,
                    &[("type", type_name), ("reason", &reason)],
                );
                QueryError::FetchFailed {
                    type_name: type_name.to_string(),
                    reason,
                }
            })
    }

    /// Every object of `type_name`, in store order
    pub fn fetch_all(&self, type_name: &str, context: Option<ContextId>) -> QueryResult<Vec<S::Object>> {
        self.fetch(type_name, &[], &[], context)
    }

    /// First object in sort order, if any
    pub fn fetch_first(
        &self,
        type_name: &str,
        predicates: &[Predicate],
        sort: &[SortSpec],
        context: Option<ContextId>,
    ) -> QueryResult<Option<S::Object>> {
        Ok(self.fetch(type_name, predicates, sort, context)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::Logger;
    use crate::query::errors::StoreError;
    use std::cell::RefCell;

    /// Store that records the context it was handed
    struct StubStore {
        default: ContextId,
        seen: RefCell<Vec<ContextId>>,
        fail: bool,
    }

    impl PersistenceStore for StubStore {
        type Object = u32;

        fn default_context(&self) -> ContextId {
            self.default
        }

        fn insert_new(&self, type_name: &str, context: ContextId) -> StoreResult<u32> {
            self.seen.borrow_mut().push(context);
            if type_name == "Ghost" {
                return Err(StoreError::UnknownType(type_name.into()));
            }
            Ok(1)
        }

        fn fetch(
            &self,
            _type_name: &str,
            _predicates: &[Predicate],
            _sort: &[SortSpec],
            context: ContextId,
        ) -> StoreResult<Vec<u32>> {
            self.seen.borrow_mut().push(context);
            if self.fail {
                return Err(StoreError::FetchRejected("store offline".into()));
            }
            Ok(vec![3, 1, 2])
        }
    }

    fn stub(fail: bool) -> StubStore {
        StubStore {
            default: ContextId::new(),
            seen: RefCell::new(Vec::new()),
            fail,
        }
    }

    #[test]
    fn test_default_context_used_when_omitted() {
        let store = stub(false);
        let facade = QueryFacade::new(&store);
        let explicit = ContextId::new();

        facade.insert("Person", None).unwrap();
        facade.fetch_all("Person", Some(explicit)).unwrap();

        assert_eq!(*store.seen.borrow(), vec![store.default, explicit]);
    }

    #[test]
    fn test_fetch_failure_is_all_or_nothing_and_logged() {
        let store = stub(true);
        let facade = QueryFacade::new(&store);

        let (result, lines) = Logger::capture(|| facade.fetch("Person", &[], &[], None));
        let err = result.unwrap_err();
        assert!(err.reason().contains("store offline"));
        assert!(lines.iter().any(|l| l.contains("FETCH_FAILED")));
    }

    #[test]
    fn test_insert_failure() {
        let store = stub(false);
        let facade = QueryFacade::new(&store);

        assert!(matches!(
            facade.insert("Ghost", None),
            Err(QueryError::InsertFailed { .. })
        ));
    }

    #[test]
    fn test_fetch_first() {
        let store = stub(false);
        let facade = QueryFacade::new(&store);
        assert_eq!(facade.fetch_first("Person", &[], &[], None).unwrap(), Some(3));
    }
}
