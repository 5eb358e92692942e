//! Read-through TTL cache stage
//!
//! [`CachedStore`] wraps an authoritative [`Store`] with an internal
//! [`MemoryStore`] used purely as cache storage, plus a policy table of
//! `(expiration, last-modified)` per identity path. Writes always go to the
//! authoritative store and mirror the written value into the cache; Get
//! serves from the cache while the entry is fresh. List always passes
//! through — the cache does not serve listings. A cache miss is never an
//! error, it just forces a read-through.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::Result;
use crate::identity::ObjectIdentity;
use crate::memory::MemoryStore;
use crate::object::{Object, ObjectList};
use crate::options::{CreateOption, ListOption, UpdateOption, WriteSettings};
use crate::store::Store;

#[derive(Debug, Clone, Copy)]
struct Policy {
    expiration: Duration,
    modified: Instant,
}

impl Policy {
    // A zero expiration is recorded but never fresh: such entries are
    // immediately stale and every Get reads through.
    fn is_fresh(&self) -> bool {
        !self.expiration.is_zero() && self.modified.elapsed() < self.expiration
    }
}

/// Caching decorator around any [`Store`]
pub struct CachedStore {
    inner: Arc<dyn Store>,
    cache: MemoryStore,
    default_expiration: Duration,
    policies: Mutex<HashMap<String, Policy>>,
}

impl CachedStore {
    /// Wrap `inner` with a cache whose entries default to `default_expiration`
    pub fn new(inner: Arc<dyn Store>, default_expiration: Duration) -> Self {
        Self {
            inner,
            cache: MemoryStore::new(),
            default_expiration,
            policies: Mutex::new(HashMap::new()),
        }
    }

    fn record(&self, path: String, expiration: Duration) {
        self.policies.lock().insert(
            path,
            Policy {
                expiration,
                modified: Instant::now(),
            },
        );
    }

    /// Mirror a written value into the cache store. Failures only degrade
    /// freshness, never the operation that triggered them.
    async fn mirror(&self, obj: &Object) {
        let identity = obj.identity().clone();
        let result = if self.cache.get(&identity).await.is_ok() {
            self.cache.update(&identity, obj.clone(), &[]).await
        } else {
            self.cache.create(obj.clone(), &[]).await
        };
        if let Err(err) = result {
            trace!(%err, identity = %identity.path(), "cache mirror failed");
        }
    }
}

#[async_trait]
impl Store for CachedStore {
    async fn get(&self, identity: &ObjectIdentity) -> Result<Object> {
        let path = identity.path();

        let fresh = self
            .policies
            .lock()
            .get(&path)
            .is_some_and(Policy::is_fresh);

        if fresh {
            if let Ok(cached) = self.cache.get(identity).await {
                debug!(identity = %path, "cache hit");
                return Ok(cached);
            }
        }

        let fetched = self.inner.get(identity).await?;
        debug!(identity = %path, "cache refresh");
        self.mirror(&fetched).await;

        // Keep the entry's expiration, reset its clock.
        let expiration = self
            .policies
            .lock()
            .get(&path)
            .map(|policy| policy.expiration)
            .unwrap_or(self.default_expiration);
        self.record(path, expiration);

        Ok(fetched)
    }

    /// Always passes through: the cache does not serve List. Known
    /// limitation of this stage — no eviction or consistency policy exists
    /// for cached listings.
    async fn list(&self, identity: &ObjectIdentity, opts: &[ListOption]) -> Result<ObjectList> {
        self.inner.list(identity, opts).await
    }

    async fn create(&self, obj: Object, opts: &[CreateOption]) -> Result<Object> {
        let settings = WriteSettings::from_create(opts)?;

        let written = self.inner.create(obj, opts).await?;
        debug!(pkey = %written.primary_key(), "cache create");

        self.mirror(&written).await;
        self.record(
            written.identity().path(),
            settings.expiration.unwrap_or(self.default_expiration),
        );

        Ok(written)
    }

    async fn update(
        &self,
        identity: &ObjectIdentity,
        obj: Object,
        opts: &[UpdateOption],
    ) -> Result<Object> {
        let settings = WriteSettings::from_update(opts)?;

        let written = self.inner.update(identity, obj, opts).await?;
        debug!(identity = %identity.path(), "cache update");

        self.mirror(&written).await;
        let expiration = settings.expiration.unwrap_or(self.default_expiration);
        self.record(written.identity().path(), expiration);
        // Track the queried form too, so natural-key reads see the policy.
        if identity.path() != written.identity().path() {
            self.record(identity.path(), expiration);
        }

        Ok(written)
    }

    async fn delete(&self, identity: &ObjectIdentity) -> Result<()> {
        debug!(identity = %identity.path(), "cache delete");

        // Resolve the canonical path before the cache entry disappears.
        let canonical = self
            .cache
            .get(identity)
            .await
            .ok()
            .map(|obj| obj.identity().path());

        if let Err(err) = self.cache.delete(identity).await {
            trace!(%err, "cache delete miss");
        }

        // Bookkeeping is dropped regardless of whether the cache held a copy.
        {
            let mut policies = self.policies.lock();
            policies.remove(&identity.path());
            if let Some(path) = canonical {
                policies.remove(&path);
            }
        }

        self.inner.delete(identity).await
    }
}
