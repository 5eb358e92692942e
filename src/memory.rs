//! Canonical in-memory backend
//!
//! Reference implementation of the [`Store`] contract: two indexes (identity
//! path and lowercased-kind/primary-key) behind one lock, defining the exact
//! semantics every other backend must reproduce. The per-kind index is
//! ordered so unordered listings come back in primary-key order, which keeps
//! repeated calls deterministic for a given store state.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::identity::ObjectIdentity;
use crate::object::{Object, ObjectList};
use crate::options::{CreateOption, ListOption, ListSettings, UpdateOption, WriteSettings};
use crate::query;
use crate::store::Store;

#[derive(Default)]
struct Indexes {
    by_identity: HashMap<String, Object>,
    by_key: HashMap<String, BTreeMap<String, Object>>,
}

impl Indexes {
    fn lookup(&self, identity: &ObjectIdentity) -> Option<Object> {
        if let Some(obj) = self.by_identity.get(&identity.path()) {
            return Some(obj.clone());
        }

        let key = identity.key();
        if key.is_empty() {
            return None;
        }
        self.by_key
            .get(&identity.kind())
            .and_then(|kinds| kinds.get(&key))
            .cloned()
    }

    fn unlink(&mut self, obj: &Object) {
        self.by_identity.remove(&obj.identity().path());
        if let Some(kinds) = self.by_key.get_mut(&obj.kind().to_lowercase()) {
            kinds.remove(&obj.primary_key());
        }
    }

    fn link(&mut self, obj: &Object) {
        self.by_identity.insert(obj.identity().path(), obj.clone());
        self.by_key
            .entry(obj.kind().to_lowercase())
            .or_default()
            .insert(obj.primary_key(), obj.clone());
    }
}

/// In-memory [`Store`] backing the pipeline's reference semantics
///
/// Check-then-mutate sequences run under a single mutex, so the duplicate
/// primary-key and existing-object-required invariants hold under concurrent
/// callers. Nothing is held across an await point.
pub struct MemoryStore {
    indexes: Mutex<Indexes>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            indexes: Mutex::new(Indexes::default()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get(&self, identity: &ObjectIdentity) -> Result<Object> {
        debug!(identity = %identity.path(), "memory get");

        self.indexes
            .lock()
            .lookup(identity)
            .ok_or_else(|| StoreError::no_such_object(identity.path()))
    }

    async fn list(&self, identity: &ObjectIdentity, opts: &[ListOption]) -> Result<ObjectList> {
        let settings = ListSettings::resolve(opts)?;
        debug!(kind = %identity.kind(), "memory list");

        if !identity.key().is_empty() {
            return Err(StoreError::InvalidPath(identity.path()));
        }

        let snapshot: ObjectList = {
            let indexes = self.indexes.lock();
            indexes
                .by_key
                .get(&identity.kind())
                .map(|kinds| kinds.values().cloned().collect())
                .unwrap_or_default()
        };

        query::apply(snapshot, &settings)
    }

    async fn create(&self, obj: Object, opts: &[CreateOption]) -> Result<Object> {
        WriteSettings::from_create(opts)?;
        if obj.is_nil() {
            return Err(StoreError::NilObject);
        }
        debug!(pkey = %obj.primary_key(), "memory create");

        let kind = obj.kind().to_lowercase();
        let pkey = obj.primary_key();

        let mut indexes = self.indexes.lock();
        if indexes
            .by_key
            .get(&kind)
            .is_some_and(|kinds| kinds.contains_key(&pkey))
        {
            return Err(StoreError::object_exists(format!("{kind}/{pkey}")));
        }

        indexes.link(&obj);
        Ok(obj)
    }

    async fn update(
        &self,
        identity: &ObjectIdentity,
        obj: Object,
        opts: &[UpdateOption],
    ) -> Result<Object> {
        WriteSettings::from_update(opts)?;
        if obj.is_nil() {
            return Err(StoreError::NilObject);
        }
        debug!(identity = %identity.path(), "memory update");

        let mut indexes = self.indexes.lock();
        let existing = indexes
            .lookup(identity)
            .ok_or_else(|| StoreError::no_such_object(identity.path()))?;

        // The primary key may have changed as part of this update.
        indexes.unlink(&existing);
        indexes.link(&obj);
        Ok(obj)
    }

    async fn delete(&self, identity: &ObjectIdentity) -> Result<()> {
        debug!(identity = %identity.path(), "memory delete");

        let mut indexes = self.indexes.lock();
        let existing = indexes
            .lookup(identity)
            .ok_or_else(|| StoreError::no_such_object(identity.path()))?;

        indexes.unlink(&existing);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn world(name: &str) -> Object {
        let mut obj = Object::new("World").with_primary_key_path("spec.name");
        obj.spec = json!({ "name": name });
        obj
    }

    #[tokio::test]
    async fn test_create_links_both_forms() {
        let store = MemoryStore::new();
        let created = store.create(world("abc"), &[]).await.unwrap();

        let by_key = store.get(&ObjectIdentity::of("World", "abc")).await.unwrap();
        assert_eq!(by_key.primary_key(), "abc");

        let by_id = store.get(created.identity()).await.unwrap();
        assert_eq!(by_id.primary_key(), "abc");
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_primary_key() {
        let store = MemoryStore::new();
        store.create(world("abc"), &[]).await.unwrap();

        let err = store.create(world("abc"), &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::ObjectExists(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_nil_object() {
        let store = MemoryStore::new();
        let err = store.create(Object::new(""), &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::NilObject));
    }

    #[tokio::test]
    async fn test_update_rekeys_on_rename() {
        let store = MemoryStore::new();
        let created = store.create(world("abc"), &[]).await.unwrap();

        let mut renamed = created.clone();
        renamed.spec = json!({ "name": "def" });
        store
            .update(&ObjectIdentity::of("World", "abc"), renamed, &[])
            .await
            .unwrap();

        assert!(store.get(&ObjectIdentity::of("World", "abc")).await.is_err());
        let fetched = store.get(&ObjectIdentity::of("World", "def")).await.unwrap();
        assert_eq!(fetched.identity(), created.identity());
    }

    #[tokio::test]
    async fn test_update_missing_object_fails() {
        let store = MemoryStore::new();
        let err = store
            .update(&ObjectIdentity::of("World", "ghost"), world("ghost"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NoSuchObject(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_both_forms() {
        let store = MemoryStore::new();
        let created = store.create(world("abc"), &[]).await.unwrap();

        store
            .delete(&ObjectIdentity::of("World", "abc"))
            .await
            .unwrap();
        assert!(store.get(created.identity()).await.is_err());
        assert!(store.get(&ObjectIdentity::of("World", "abc")).await.is_err());
    }

    #[tokio::test]
    async fn test_list_rejects_specific_identity() {
        let store = MemoryStore::new();
        store.create(world("abc"), &[]).await.unwrap();

        let err = store
            .list(&ObjectIdentity::of("World", "abc"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidPath(_)));
    }

    #[tokio::test]
    async fn test_list_unknown_kind_is_empty() {
        let store = MemoryStore::new();
        let listed = store
            .list(&ObjectIdentity::of("Nothing", ""), &[])
            .await
            .unwrap();
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_returned_objects_are_clones() {
        let store = MemoryStore::new();
        store.create(world("abc"), &[]).await.unwrap();

        let mut fetched = store.get(&ObjectIdentity::of("World", "abc")).await.unwrap();
        fetched.spec["name"] = json!("mutated");

        let again = store.get(&ObjectIdentity::of("World", "abc")).await.unwrap();
        assert_eq!(again.spec["name"], "abc");
    }
}
