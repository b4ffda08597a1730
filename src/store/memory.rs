//! In-memory persistence store
//!
//! Contexts hold records and pending changes. `commit` validates every
//! pending insert, update and delete through a `ValidationEngine` and
//! applies all of them or none.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use super::filters::PredicateFilter;
use super::record::{ObjectId, Record};
use super::sorter::RecordSorter;
use crate::model::ModelRegistry;
use crate::observability::{log_event_with_fields, Event, Severity};
use crate::query::{ContextId, PersistenceStore, Predicate, SortSpec, StoreError, StoreResult};
use crate::validation::{absorb, Operation, ValidationEngine};

#[derive(Debug, Default)]
struct ContextState {
    /// Insertion order
    records: Vec<Record>,
    inserted: Vec<ObjectId>,
    updated: Vec<ObjectId>,
    deleted: Vec<ObjectId>,
}

impl ContextState {
    fn live(&self, id: ObjectId) -> Option<&Record> {
        if self.deleted.contains(&id) {
            return None;
        }
        self.records.iter().find(|r| r.id == id)
    }

    fn pending(&self) -> Vec<(Record, Operation)> {
        let lookup = |id: &ObjectId| self.records.iter().find(|r| r.id == *id).cloned();
        let mut pending = Vec::new();
        for (ids, op) in [
            (&self.inserted, Operation::Insert),
            (&self.updated, Operation::Update),
            (&self.deleted, Operation::Delete),
        ] {
            pending.extend(ids.iter().filter_map(lookup).map(|r| (r, op)));
        }
        pending
    }
}

#[derive(Debug, Default)]
struct StoreState {
    contexts: HashMap<ContextId, ContextState>,
    fail_next_fetch: Option<String>,
}

/// Reference implementation of [`PersistenceStore`]
#[derive(Debug)]
pub struct MemoryStore {
    model: Arc<ModelRegistry>,
    default_context: ContextId,
    state: Mutex<StoreState>,
}

impl MemoryStore {
    /// Creates a store with one default context
    pub fn new(model: Arc<ModelRegistry>) -> Self {
        let default_context = ContextId::new();
        let mut state = StoreState::default();
        state.contexts.insert(default_context, ContextState::default());
        Self {
            model,
            default_context,
            state: Mutex::new(state),
        }
    }

    /// Opens another, empty context
    pub fn new_context(&self) -> ContextId {
        let id = ContextId::new();
        self.lock().contexts.insert(id, ContextState::default());
        id
    }

    /// Sets a field value, marking the object updated unless it is a
    /// pending insert
    pub fn set_value(
        &self,
        context: ContextId,
        id: ObjectId,
        field: &str,
        value: Value,
    ) -> StoreResult<()> {
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        if ctx.deleted.contains(&id) {
            return Err(StoreError::ObjectNotFound(id.to_string()));
        }
        let record = ctx
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::ObjectNotFound(id.to_string()))?;
        record.set(field, value);

        if !ctx.inserted.contains(&id) && !ctx.updated.contains(&id) {
            ctx.updated.push(id);
        }
        Ok(())
    }

    /// Marks an object for deletion. A pending insert is simply dropped.
    pub fn delete(&self, context: ContextId, id: ObjectId) -> StoreResult<()> {
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        if ctx.live(id).is_none() {
            return Err(StoreError::ObjectNotFound(id.to_string()));
        }

        ctx.updated.retain(|u| *u != id);
        if let Some(pos) = ctx.inserted.iter().position(|i| *i == id) {
            ctx.inserted.remove(pos);
            ctx.records.retain(|r| r.id != id);
        } else {
            ctx.deleted.push(id);
        }
        Ok(())
    }

    /// Current state of a live object
    pub fn get(&self, context: ContextId, id: ObjectId) -> StoreResult<Record> {
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        ctx.live(id)
            .cloned()
            .ok_or_else(|| StoreError::ObjectNotFound(id.to_string()))
    }

    /// Returns true if the context has uncommitted changes
    pub fn has_changes(&self, context: ContextId) -> StoreResult<bool> {
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        Ok(!(ctx.inserted.is_empty() && ctx.updated.is_empty() && ctx.deleted.is_empty()))
    }

    /// Makes the next fetch fail with `reason`
    pub fn fail_next_fetch(&self, reason: impl Into<String>) {
        self.lock().fail_next_fetch = Some(reason.into());
    }

    /// Validates and applies every pending change of the context.
    ///
    /// On any validation failure nothing is applied and all failures are
    /// returned combined. Changes made while hooks run are left pending for
    /// the next commit.
    pub fn commit(&self, context: ContextId, engine: &ValidationEngine) -> StoreResult<()> {
        let pending = {
            let mut state = self.lock();
            Self::context_mut(&mut state, context)?.pending()
        };

        // Hooks run without the store lock held
        let failures = pending.iter().fold(None, |acc, (record, op)| {
            absorb(acc, engine.validate(record, *op).err())
        });

        if let Some(errors) = failures {
            log_event_with_fields(
                Severity::Warn,
                Event::CommitRejected,
                &[
                    ("context", &context.to_string()),
                    ("errors", &errors.len().to_string()),
                ],
            );
            return Err(StoreError::ValidationFailed(errors));
        }

        // Only what was validated is applied; changes made meanwhile stay pending
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        for (snapshot, op) in &pending {
            let id = snapshot.id;
            match op {
                Operation::Delete => {
                    if let Some(pos) = ctx.deleted.iter().position(|d| *d == id) {
                        ctx.deleted.remove(pos);
                        ctx.records.retain(|r| r.id != id);
                    }
                }
                Operation::Insert | Operation::Update => {
                    if !ctx.records.iter().any(|r| r == snapshot) {
                        continue;
                    }
                    let list = if *op == Operation::Insert {
                        &mut ctx.inserted
                    } else {
                        &mut ctx.updated
                    };
                    list.retain(|i| *i != id);
                }
            }
        }

        log_event_with_fields(
            Severity::Info,
            Event::CommitApplied,
            &[
                ("context", &context.to_string()),
                ("changes", &pending.len().to_string()),
            ],
        );
        Ok(())
    }

    fn context_mut(state: &mut StoreState, context: ContextId) -> StoreResult<&mut ContextState> {
        state
            .contexts
            .get_mut(&context)
            .ok_or(StoreError::UnknownContext(context))
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PersistenceStore for MemoryStore {
    type Object = Record;

    fn default_context(&self) -> ContextId {
        self.default_context
    }

    fn insert_new(&self, type_name: &str, context: ContextId) -> StoreResult<Record> {
        if !self.model.contains(type_name) {
            return Err(StoreError::UnknownType(type_name.to_string()));
        }

        let record = Record::new(type_name);
        let mut state = self.lock();
        let ctx = Self::context_mut(&mut state, context)?;
        ctx.inserted.push(record.id);
        ctx.records.push(record.clone());

        log_event_with_fields(
            Severity::Debug,
            Event::ObjectInserted,
            &[("type", type_name), ("id", &record.id.to_string())],
        );
        Ok(record)
    }

    fn fetch(
        &self,
        type_name: &str,
        predicates: &[Predicate],
        sort: &[SortSpec],
        context: ContextId,
    ) -> StoreResult<Vec<Record>> {
        let mut state = self.lock();
        if let Some(reason) = state.fail_next_fetch.take() {
            return Err(StoreError::FetchRejected(reason));
        }
        if !self.model.contains(type_name) {
            return Err(StoreError::UnknownType(type_name.to_string()));
        }

        let ctx = Self::context_mut(&mut state, context)?;
        let mut results: Vec<Record> = ctx
            .records
            .iter()
            .filter(|r| !ctx.deleted.contains(&r.id))
            .filter(|r| self.model.is_kind_of(&r.type_name, type_name))
            .filter(|r| PredicateFilter::matches(&r.values, predicates))
            .cloned()
            .collect();

        RecordSorter::sort(&mut results, sort);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ManagedField, TypeDef};
    use crate::validation::{ElementaryError, HookCatalog, HookOutcome, HookSet};
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn model() -> Arc<ModelRegistry> {
        Arc::new(
            ModelRegistry::from_types(vec![
                TypeDef::root("Person")
                    .with_field(ManagedField::managed("name"))
                    .with_field(ManagedField::managed("age")),
                TypeDef::extends("Employee", "Person"),
                TypeDef::root("Tag"),
            ])
            .unwrap(),
        )
    }

    fn engine(model: &Arc<ModelRegistry>) -> ValidationEngine {
        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new().on_field("name", |v| {
                HookOutcome::check(v.as_str().is_some_and(|s| !s.is_empty()), || {
                    ElementaryError::field("name", "must not be empty")
                })
            }),
        );
        ValidationEngine::new(Arc::clone(model), hooks)
    }

    #[test]
    fn test_insert_unknown_type() {
        let store = MemoryStore::new(model());
        let ctx = store.default_context();
        assert!(matches!(
            store.insert_new("Ghost", ctx),
            Err(StoreError::UnknownType(_))
        ));
    }

    #[test]
    fn test_fetch_includes_subtypes_and_pending_inserts() {
        let store = MemoryStore::new(model());
        let ctx = store.default_context();

        store.insert_new("Person", ctx).unwrap();
        store.insert_new("Employee", ctx).unwrap();
        store.insert_new("Tag", ctx).unwrap();

        assert_eq!(store.fetch("Person", &[], &[], ctx).unwrap().len(), 2);
        assert_eq!(store.fetch("Employee", &[], &[], ctx).unwrap().len(), 1);
    }

    #[test]
    fn test_contexts_are_isolated() {
        let store = MemoryStore::new(model());
        let other = store.new_context();

        store.insert_new("Person", store.default_context()).unwrap();
        assert!(store.fetch("Person", &[], &[], other).unwrap().is_empty());
        assert!(matches!(
            store.fetch("Person", &[], &[], ContextId::new()),
            Err(StoreError::UnknownContext(_))
        ));
    }

    #[test]
    fn test_fail_next_fetch_is_one_shot() {
        let store = MemoryStore::new(model());
        let ctx = store.default_context();

        store.fail_next_fetch("disk unavailable");
        assert!(matches!(
            store.fetch("Person", &[], &[], ctx),
            Err(StoreError::FetchRejected(reason)) if reason == "disk unavailable"
        ));
        assert!(store.fetch("Person", &[], &[], ctx).is_ok());
    }

    #[test]
    fn test_commit_rejects_and_keeps_changes() {
        let model = model();
        let engine = engine(&model);
        let store = MemoryStore::new(Arc::clone(&model));
        let ctx = store.default_context();

        store.insert_new("Person", ctx).unwrap();
        let result = store.commit(ctx, &engine);

        assert!(matches!(result, Err(StoreError::ValidationFailed(_))));
        assert!(store.has_changes(ctx).unwrap());
    }

    #[test]
    fn test_commit_applies_all() {
        let model = model();
        let engine = engine(&model);
        let store = MemoryStore::new(Arc::clone(&model));
        let ctx = store.default_context();

        let ada = store.insert_new("Person", ctx).unwrap();
        store.set_value(ctx, ada.id, "name", json!("Ada")).unwrap();
        store.commit(ctx, &engine).unwrap();
        assert!(!store.has_changes(ctx).unwrap());

        store.set_value(ctx, ada.id, "age", json!(36)).unwrap();
        store.delete(ctx, ada.id).unwrap();
        assert!(store.get(ctx, ada.id).is_err());
        store.commit(ctx, &engine).unwrap();

        assert!(store.fetch("Person", &[], &[], ctx).unwrap().is_empty());
    }

    #[test]
    fn test_changes_during_commit_stay_pending() {
        let model = model();
        let store = Arc::new(MemoryStore::new(Arc::clone(&model)));
        let ctx = store.default_context();
        let ada = store.insert_new("Person", ctx).unwrap();
        store.set_value(ctx, ada.id, "name", json!("Ada")).unwrap();

        let meddled = Arc::new(AtomicBool::new(false));
        let hooks = HookCatalog::new().with(
            "Person",
            HookSet::new()
                .on_field("name", |v| {
                    HookOutcome::check(v.as_str().is_some_and(|s| !s.is_empty()), || {
                        ElementaryError::field("name", "must not be empty")
                    })
                })
                .on_write({
                    let store = Arc::clone(&store);
                    let meddled = Arc::clone(&meddled);
                    move |_| {
                        if !meddled.swap(true, Ordering::SeqCst) {
                            store.set_value(ctx, ada.id, "name", json!("")).unwrap();
                            store.insert_new("Person", ctx).unwrap();
                        }
                        HookOutcome::pass()
                    }
                }),
        );
        let engine = ValidationEngine::new(Arc::clone(&model), hooks);

        store.commit(ctx, &engine).unwrap();
        assert!(store.has_changes(ctx).unwrap());

        match store.commit(ctx, &engine).unwrap_err() {
            StoreError::ValidationFailed(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_delete_pending_insert_drops_it() {
        let store = MemoryStore::new(model());
        let ctx = store.default_context();

        let record = store.insert_new("Person", ctx).unwrap();
        store.delete(ctx, record.id).unwrap();

        assert!(!store.has_changes(ctx).unwrap());
        assert!(store.fetch("Person", &[], &[], ctx).unwrap().is_empty());
    }

    #[test]
    fn test_update_after_commit_is_tracked() {
        let model = model();
        let engine = engine(&model);
        let store = MemoryStore::new(Arc::clone(&model));
        let ctx = store.default_context();

        let rec = store.insert_new("Person", ctx).unwrap();
        store.set_value(ctx, rec.id, "name", json!("Ada")).unwrap();
        store.commit(ctx, &engine).unwrap();

        store.set_value(ctx, rec.id, "name", json!("")).unwrap();
        let err = store.commit(ctx, &engine).unwrap_err();
        match err {
            StoreError::ValidationFailed(errors) => {
                assert_eq!(errors.errors()[0].field_name(), Some("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
