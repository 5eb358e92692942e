//! Identity and timestamp stage
//!
//! Decorator that assigns a fresh identity and creation timestamp on Create
//! and an update timestamp on Update, then delegates. Backends behind this
//! stage never need an identity-generation policy of their own.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, StoreError};
use crate::identity::ObjectIdentity;
use crate::object::{Object, ObjectList};
use crate::options::{CreateOption, ListOption, UpdateOption};
use crate::store::Store;

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Stamping decorator around any [`Store`]
pub struct StampStore {
    inner: Arc<dyn Store>,
}

impl StampStore {
    pub fn new(inner: Arc<dyn Store>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl Store for StampStore {
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
        debug!(pkey = %obj.primary_key(), "stamp create");

        obj.metadata.identity = ObjectIdentity::random();
        obj.metadata.created = timestamp();

        self.inner.create(obj, opts).await
    }

    async fn update(
        &self,
        identity: &ObjectIdentity,
        mut obj: Object,
        opts: &[UpdateOption],
    ) -> Result<Object> {
        if obj.is_nil() {
            return Err(StoreError::NilObject);
        }
        debug!(identity = %identity.path(), "stamp update");

        obj.metadata.updated = timestamp();

        self.inner.update(identity, obj, opts).await
    }

    async fn delete(&self, identity: &ObjectIdentity) -> Result<()> {
        self.inner.delete(identity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;
    use serde_json::json;

    fn world(name: &str) -> Object {
        let mut obj = Object::new("World").with_primary_key_path("spec.name");
        obj.spec = json!({ "name": name });
        obj
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_created() {
        let store = StampStore::new(Arc::new(MemoryStore::new()));

        let before = world("abc");
        let created = store.create(before.clone(), &[]).await.unwrap();

        assert_ne!(created.identity(), before.identity());
        assert!(!created.metadata.created.is_empty());
        assert!(created.metadata.updated.is_empty());
        chrono::DateTime::parse_from_rfc3339(&created.metadata.created).unwrap();
    }

    #[tokio::test]
    async fn test_update_stamps_updated_only() {
        let store = StampStore::new(Arc::new(MemoryStore::new()));
        let created = store.create(world("abc"), &[]).await.unwrap();

        let mut changed = created.clone();
        changed.spec["description"] = json!("def");
        let updated = store
            .update(&ObjectIdentity::of("World", "abc"), changed, &[])
            .await
            .unwrap();

        assert_eq!(updated.metadata.created, created.metadata.created);
        assert!(!updated.metadata.updated.is_empty());

        let created_at = chrono::DateTime::parse_from_rfc3339(&updated.metadata.created).unwrap();
        let updated_at = chrono::DateTime::parse_from_rfc3339(&updated.metadata.updated).unwrap();
        assert!(updated_at >= created_at);
    }

    #[tokio::test]
    async fn test_nil_objects_rejected_before_delegation() {
        let store = StampStore::new(Arc::new(MemoryStore::new()));
        assert!(matches!(
            store.create(Object::new(""), &[]).await.unwrap_err(),
            StoreError::NilObject
        ));
        assert!(matches!(
            store
                .update(&ObjectIdentity::of("World", "abc"), Object::new(""), &[])
                .await
                .unwrap_err(),
            StoreError::NilObject
        ));
    }
}
