//! # lamina-store
//!
//! A schema-driven, layered object store.
//!
//! One CRUD+List contract — [`Store`] — implemented identically by
//! interchangeable backends and composed through decorator stages, each of
//! which wraps another `Store` and adds one cross-cutting behavior:
//!
//! - [`MemoryStore`] — the canonical in-memory backend defining reference
//!   semantics for Create/Update/Delete/Get/List
//! - [`StampStore`] — assigns identities and creation/update timestamps
//! - [`HookStore`] — enforces the spec/status write boundary and dispatches
//!   per-kind lifecycle hooks that may mutate, veto, or cascade
//! - [`CachedStore`] — read-through TTL cache with per-call expiration
//!   overrides
//!
//! Objects carry `metadata` (kind, identity, timestamps), a user-owned
//! `spec` and a system-owned `status`, and are addressable both by their
//! store-assigned identity (`id/<opaque>`) and by natural key
//! (`<kind>/<primary-key>`). Listings support property and key filtering,
//! ordering and pagination with identical observable semantics on every
//! backend.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use lamina_store::{
//!     HookRegistry, HookStore, KindDefinition, ListOption, MemoryStore, Model, ObjectIdentity,
//!     SchemaHolder, StampStore, Store,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Declare the schema the (external) code generator would produce.
//!     let model = Arc::new(
//!         Model::builder()
//!             .kind(KindDefinition::new("Article").primary_key("spec.slug"))
//!             .build(),
//!     );
//!
//!     // Stack the pipeline: hooks -> stamping -> backend.
//!     let backend = Arc::new(MemoryStore::new());
//!     let stamped = Arc::new(StampStore::new(backend));
//!     let store = HookStore::new(model.clone(), stamped, HookRegistry::new());
//!
//!     let mut article = model.object_for_kind("Article").unwrap();
//!     article.spec = serde_json::json!({ "slug": "hello", "title": "Hello" });
//!
//!     let created = store.create(article, &[]).await?;
//!
//!     // Both addressing forms resolve to the same record.
//!     let by_key = store.get(&ObjectIdentity::of("Article", "hello")).await?;
//!     assert_eq!(by_key.primary_key(), created.primary_key());
//!
//!     let all = store
//!         .list(
//!             &ObjectIdentity::of("Article", ""),
//!             &[ListOption::order_by("spec.slug")],
//!         )
//!         .await?;
//!     assert_eq!(all.len(), 1);
//!
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod hooks;
pub mod identity;
pub mod memory;
pub mod model;
pub mod object;
pub mod options;
pub mod query;
pub mod stamp;
pub mod store;

// Re-export main types for convenience
pub use cache::CachedStore;
pub use error::{Result, StoreError};
pub use hooks::{Action, Hook, HookRegistry, HookStore};
pub use identity::ObjectIdentity;
pub use memory::MemoryStore;
pub use model::{KindDefinition, Model, ModelBuilder, SchemaHolder};
pub use object::{Meta, Object, ObjectList};
pub use options::{
    CreateOption, ListOption, ListSettings, PropFilter, UpdateOption, WriteSettings,
};
pub use stamp::StampStore;
pub use store::Store;
