//! The Store contract
//!
//! Every backend and every pipeline stage implements [`Store`]. Stages hold
//! an inner `Arc<dyn Store>` and call the next stage's same method after
//! applying their own contract, so stacks compose at runtime:
//!
//! ```text
//! caller -> HookStore -> StampStore -> CachedStore -> backend
//! ```
//!
//! All methods return deep clones; no implementation may hand out a value
//! whose mutation by the caller corrupts internal state. Cancellation is the
//! caller's: dropping the returned future abandons the operation.

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::ObjectIdentity;
use crate::object::{Object, ObjectList};
use crate::options::{CreateOption, ListOption, UpdateOption};

/// Uniform CRUD+List contract over interchangeable backends
#[async_trait]
pub trait Store: Send + Sync {
    /// Resolve an identity (either addressing form) to its object
    async fn get(&self, identity: &ObjectIdentity) -> Result<Object>;

    /// List a kind prefix, running the results through the query engine
    async fn list(&self, identity: &ObjectIdentity, opts: &[ListOption]) -> Result<ObjectList>;

    /// Store a new object; fails when the kind/primary-key pair exists
    async fn create(&self, obj: Object, opts: &[CreateOption]) -> Result<Object>;

    /// Replace an existing object; fails when the identity does not resolve
    async fn update(
        &self,
        identity: &ObjectIdentity,
        obj: Object,
        opts: &[UpdateOption],
    ) -> Result<Object>;

    /// Remove an object; fails when the identity does not resolve
    async fn delete(&self, identity: &ObjectIdentity) -> Result<()>;
}
