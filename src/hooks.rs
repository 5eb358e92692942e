//! Spec enforcement and lifecycle hooks
//!
//! [`HookStore`] is the write-protection stage of the pipeline. On Update it
//! grafts only the caller-supplied spec onto the authoritative stored
//! object, so a client can never change status except through a registered
//! [`Hook`]. Hooks are keyed by `(kind, action)` and may mutate the object,
//! veto the operation, or perform cascading writes through the store handle
//! they receive.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::identity::ObjectIdentity;
use crate::model::SchemaHolder;
use crate::object::{Object, ObjectList};
use crate::options::{CreateOption, ListOption, UpdateOption};
use crate::store::Store;

/// Lifecycle action a hook reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

/// Reaction to a store operation on one kind
///
/// `obj` is the object the operation is about to write (the merged object
/// for updates, the stored object for deletes). The `store` handle is the
/// stage's inner store, so cascading writes are stamped and persisted but do
/// not re-enter the hook stage. Returning an error aborts the operation
/// with storage untouched.
#[async_trait]
pub trait Hook: Send + Sync {
    async fn call(&self, obj: &mut Object, store: &dyn Store) -> Result<()>;
}

/// Registry of hooks, at most one per `(kind, action)` pair
///
/// Duplicate registration fails here, at setup time, never at call time.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<(String, Action), Arc<dyn Hook>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: impl Into<String>,
        action: Action,
        hook: Arc<dyn Hook>,
    ) -> Result<()> {
        let key = (kind.into().to_lowercase(), action);
        if self.hooks.contains_key(&key) {
            return Err(StoreError::DuplicateHook {
                kind: key.0,
                action: action.to_string(),
            });
        }
        self.hooks.insert(key, hook);
        Ok(())
    }

    fn get(&self, kind: &str, action: Action) -> Option<Arc<dyn Hook>> {
        self.hooks.get(&(kind.to_lowercase(), action)).cloned()
    }
}

/// Write-protection and hook-dispatch decorator around any [`Store`]
pub struct HookStore {
    schema: Arc<dyn SchemaHolder>,
    inner: Arc<dyn Store>,
    registry: HookRegistry,
}

impl HookStore {
    pub fn new(schema: Arc<dyn SchemaHolder>, inner: Arc<dyn Store>, registry: HookRegistry) -> Self {
        Self {
            schema,
            inner,
            registry,
        }
    }

    async fn run_hook(&self, action: Action, obj: &mut Object) -> Result<()> {
        let kind = obj.kind().to_string();
        if let Some(hook) = self.registry.get(&kind, action) {
            debug!(%kind, %action, "running hook");
            hook.call(obj, self.inner.as_ref()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Store for HookStore {
    async fn get(&self, identity: &ObjectIdentity) -> Result<Object> {
        self.inner.get(identity).await
    }

    async fn list(&self, identity: &ObjectIdentity, opts: &[ListOption]) -> Result<ObjectList> {
        self.inner.list(identity, opts).await
    }

    async fn create(&self, mut obj: Object, opts: &[CreateOption]) -> Result<Object> {
        if obj.is_nil() {
            return Err(StoreError::NilObject);
        }
        debug!(pkey = %obj.primary_key(), "hooks create");

        let Some(prototype) = self.schema.object_for_kind(obj.kind()) else {
            return Err(StoreError::unknown_kind(obj.kind()));
        };
        // Wire-deserialized objects lose the declared key path; restore it
        // from the schema prototype.
        if obj.primary_key_path().is_none() {
            if let Some(path) = prototype.primary_key_path() {
                obj.set_primary_key_path(path);
            }
        }

        self.run_hook(Action::Create, &mut obj).await?;
        self.inner.create(obj, opts).await
    }

    async fn update(
        &self,
        identity: &ObjectIdentity,
        obj: Object,
        opts: &[UpdateOption],
    ) -> Result<Object> {
        if obj.is_nil() {
            return Err(StoreError::NilObject);
        }
        debug!(identity = %identity.path(), "hooks update");

        let mut merged = self.inner.get(identity).await?;
        if !merged.kind().eq_ignore_ascii_case(obj.kind()) {
            return Err(StoreError::KindMismatch {
                expected: merged.kind().to_string(),
                actual: obj.kind().to_string(),
            });
        }

        // Graft only the caller's spec; status and metadata stay authoritative.
        merged.spec = obj.spec;

        self.run_hook(Action::Update, &mut merged).await?;
        self.inner.update(identity, merged, opts).await
    }

    async fn delete(&self, identity: &ObjectIdentity) -> Result<()> {
        debug!(identity = %identity.path(), "hooks delete");

        let mut existing = self.inner.get(identity).await?;
        self.run_hook(Action::Delete, &mut existing).await?;
        self.inner.delete(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    #[async_trait]
    impl Hook for Nop {
        async fn call(&self, _obj: &mut Object, _store: &dyn Store) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_registry_rejects_duplicate_pair() {
        let mut registry = HookRegistry::new();
        registry
            .register("World", Action::Create, Arc::new(Nop))
            .unwrap();

        let err = registry
            .register("world", Action::Create, Arc::new(Nop))
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateHook { .. }));
    }

    #[test]
    fn test_registry_allows_same_kind_other_action() {
        let mut registry = HookRegistry::new();
        registry
            .register("World", Action::Create, Arc::new(Nop))
            .unwrap();
        registry
            .register("World", Action::Delete, Arc::new(Nop))
            .unwrap();

        assert!(registry.get("World", Action::Delete).is_some());
        assert!(registry.get("World", Action::Update).is_none());
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Create.to_string(), "create");
        assert_eq!(Action::Update.to_string(), "update");
        assert_eq!(Action::Delete.to_string(), "delete");
    }
}
