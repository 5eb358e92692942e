//! Object identity and addressing
//!
//! Every stored object is reachable through two addressing forms:
//!
//! - `id/<opaque-id>` — lookup by the store-assigned identity
//! - `<kind>/<primary-key>` — lookup by natural key within a kind
//!
//! [`ObjectIdentity::path`] normalizes either form into a canonical string
//! that backends can use directly as an index key.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identity of a stored object
///
/// Holds either a bare opaque id or a `<kind>/<key>` natural path.
/// Comparison and hashing use the raw string; use [`ObjectIdentity::path`]
/// for the canonical lookup form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectIdentity(String);

impl ObjectIdentity {
    /// Wrap an existing identity string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh opaque identity
    ///
    /// Derived from a UUID v4 with separators stripped and truncated to 20
    /// characters, so it can never collide with a `<kind>/<key>` path.
    pub fn random() -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string();
        Self(id[5..25].to_string())
    }

    /// Build the natural-key form for a kind
    ///
    /// An empty key yields the `<kind>/` prefix used to list a whole kind.
    pub fn of(kind: &str, key: &str) -> Self {
        Self(format!("{}/{}", kind.to_lowercase(), key))
    }

    /// Canonical lookup form: `<kind>/<key>` with the kind lower-cased, or
    /// `id/<opaque-id>` for bare identities. Idempotent.
    pub fn path(&self) -> String {
        match self.0.find('/') {
            Some(pos) if pos > 0 => {
                let (kind, rest) = self.0.split_at(pos);
                format!("{}/{}", kind.to_lowercase(), &rest[1..])
            }
            _ => format!("id/{}", self.0),
        }
    }

    /// First component of the canonical path (`id` for bare identities)
    pub fn kind(&self) -> String {
        let path = self.path();
        match path.split_once('/') {
            Some((kind, _)) => kind.to_string(),
            None => path,
        }
    }

    /// Second component of the canonical path, empty for kind prefixes
    pub fn key(&self) -> String {
        match self.path().split_once('/') {
            Some((_, key)) => key.to_string(),
            None => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ObjectIdentity {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ObjectIdentity {
    fn from(value: String) -> Self {
        Self(value)
    }
}
