//! Object and metadata types
//!
//! An [`Object`] is the unit of storage: bookkeeping [`Meta`], a user-owned
//! `spec` and a system-owned `status`, both held as dynamic JSON values.
//! The serialized form is `{"metadata": ..., "spec": ..., "status": ...}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::identity::ObjectIdentity;
use crate::query;

/// Bookkeeping fields carried by every object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    /// Declared type name, e.g. `"World"`
    #[serde(default)]
    pub kind: String,

    /// Store-assigned identity; set exactly once at Create time by the
    /// stamp stage and never reassigned by Update
    #[serde(default)]
    pub identity: ObjectIdentity,

    /// RFC 3339 creation timestamp, assigned at Create
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,

    /// RFC 3339 timestamp of the last Update; empty until the first one
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated: String,
}

impl Meta {
    /// Fresh metadata for a kind with a provisional random identity
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            identity: ObjectIdentity::random(),
            created: String::new(),
            updated: String::new(),
        }
    }
}

/// A schema-driven object: metadata plus dynamic spec and status payloads
///
/// `spec` belongs to the client and is freely mutable; `status` belongs to
/// the system and is only writable through registered hooks. Cloning is a
/// deep value copy — a clone never aliases the original's payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Object {
    #[serde(default)]
    pub metadata: Meta,

    /// User-owned portion
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub spec: Value,

    /// System-owned portion, never client-writable via Update
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub status: Value,

    // Declared primary-key path (e.g. "spec.name"), supplied by the schema
    // prototype rather than the wire format.
    #[serde(skip)]
    pkey_path: Option<String>,
}

impl Object {
    /// Empty object of a kind with null spec and status
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            metadata: Meta::new(kind),
            spec: Value::Null,
            status: Value::Null,
            pkey_path: None,
        }
    }

    /// Declare the dotted path of the primary-key field
    pub fn with_primary_key_path(mut self, path: impl Into<String>) -> Self {
        self.pkey_path = Some(path.into());
        self
    }

    pub fn set_primary_key_path(&mut self, path: impl Into<String>) {
        self.pkey_path = Some(path.into());
    }

    pub fn primary_key_path(&self) -> Option<&str> {
        self.pkey_path.as_deref()
    }

    pub fn kind(&self) -> &str {
        &self.metadata.kind
    }

    pub fn identity(&self) -> &ObjectIdentity {
        &self.metadata.identity
    }

    /// True for objects with no kind — the contract's "nil object"
    pub fn is_nil(&self) -> bool {
        self.metadata.kind.is_empty()
    }

    /// Natural key of the object within its kind
    ///
    /// The serialized value at the declared primary-key path when present
    /// and non-empty, otherwise the identity string.
    pub fn primary_key(&self) -> String {
        if let Some(path) = &self.pkey_path {
            if let Some(value) = query::field_as_string(self, path) {
                if !value.is_empty() {
                    return value;
                }
            }
        }
        self.metadata.identity.to_string()
    }

    /// Natural-form identity, `<kind>/<primary-key>`
    pub fn natural_identity(&self) -> ObjectIdentity {
        ObjectIdentity::of(self.kind(), &self.primary_key())
    }
}

pub type ObjectList = Vec<Object>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_object_is_not_nil() {
        let obj = Object::new("World");
        assert!(!obj.is_nil());
        assert_eq!(obj.kind(), "World");
        assert!(!obj.identity().is_empty());
    }

    #[test]
    fn test_empty_kind_is_nil() {
        assert!(Object::new("").is_nil());
    }

    #[test]
    fn test_primary_key_defaults_to_identity() {
        let obj = Object::new("World");
        assert_eq!(obj.primary_key(), obj.identity().to_string());
    }

    #[test]
    fn test_primary_key_from_declared_field() {
        let mut obj = Object::new("World").with_primary_key_path("spec.name");
        obj.spec = json!({ "name": "abc" });
        assert_eq!(obj.primary_key(), "abc");
        assert_eq!(obj.natural_identity().path(), "world/abc");
    }

    #[test]
    fn test_primary_key_falls_back_when_field_empty() {
        let mut obj = Object::new("World").with_primary_key_path("spec.name");
        obj.spec = json!({ "name": "" });
        assert_eq!(obj.primary_key(), obj.identity().to_string());
    }

    #[test]
    fn test_clone_does_not_alias() {
        let mut obj = Object::new("World");
        obj.spec = json!({ "name": "abc", "nested": { "counter": 1 } });

        let mut copy = obj.clone();
        copy.spec["name"] = json!("changed");
        copy.spec["nested"]["counter"] = json!(99);

        assert_eq!(obj.spec["name"], "abc");
        assert_eq!(obj.spec["nested"]["counter"], 1);
    }

    #[test]
    fn test_clone_serializes_identically() {
        let mut obj = Object::new("World").with_primary_key_path("spec.name");
        obj.spec = json!({ "name": "abc" });
        obj.status = json!({ "description": "ok" });

        let copy = obj.clone();
        assert_eq!(
            serde_json::to_string(&obj).unwrap(),
            serde_json::to_string(&copy).unwrap()
        );
    }

    #[test]
    fn test_serialized_shape() {
        let mut obj = Object::new("World");
        obj.spec = json!({ "name": "abc" });

        let value = serde_json::to_value(&obj).unwrap();
        assert_eq!(value["metadata"]["kind"], "World");
        assert_eq!(value["spec"]["name"], "abc");
        // null status and empty timestamps are omitted
        assert!(value.get("status").is_none());
        assert!(value["metadata"].get("created").is_none());
    }

    #[test]
    fn test_deserialization_tolerates_missing_sections() {
        let obj: Object = serde_json::from_str(r#"{"metadata":{"kind":"World"}}"#).unwrap();
        assert_eq!(obj.kind(), "World");
        assert!(obj.spec.is_null());
        assert!(obj.status.is_null());
        assert!(obj.primary_key_path().is_none());
    }
}
