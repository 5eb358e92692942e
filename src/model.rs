//! Declarative schema model
//!
//! [`SchemaHolder`] is the seam between the store pipeline and whatever
//! produces object types — typically a code generator working from a
//! declarative model. [`Model`] is the hand-writable equivalent: a registry
//! of [`KindDefinition`]s that can mint zero-value prototypes per kind.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::object::Object;

fn default_methods() -> Vec<String> {
    ["GET", "POST", "PUT", "DELETE"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Supplies object prototypes and permitted verbs per kind
pub trait SchemaHolder: Send + Sync {
    /// Zero-value prototype for a kind, or `None` when the kind is unknown
    fn object_for_kind(&self, kind: &str) -> Option<Object>;

    /// Permitted HTTP-style verbs per kind, consumed by serving layers
    fn object_methods(&self) -> HashMap<String, Vec<String>>;
}

/// Declared shape of one object kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KindDefinition {
    /// Canonical type name, e.g. `"World"`
    pub kind: String,

    /// Dotted path of the primary-key field (e.g. `"spec.name"`);
    /// objects fall back to their identity when absent
    #[serde(rename = "primaryKey", skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,

    /// Permitted verbs (default: GET, POST, PUT, DELETE)
    #[serde(default = "default_methods")]
    pub methods: Vec<String>,
}

impl KindDefinition {
    /// Create a definition with the default verb set and no declared key
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            primary_key: None,
            methods: default_methods(),
        }
    }

    /// Declare the primary-key field path
    pub fn primary_key(mut self, path: impl Into<String>) -> Self {
        self.primary_key = Some(path.into());
        self
    }

    /// Restrict the permitted verbs
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.methods = methods.into_iter().map(Into::into).collect();
        self
    }
}

/// Registry of kind definitions implementing [`SchemaHolder`]
#[derive(Debug, Clone, Default)]
pub struct Model {
    kinds: HashMap<String, KindDefinition>,
}

impl Model {
    pub fn builder() -> ModelBuilder {
        ModelBuilder::new()
    }

    /// Definition for a kind, case-insensitive
    pub fn kind(&self, kind: &str) -> Option<&KindDefinition> {
        self.kinds.get(&kind.to_lowercase())
    }
}

impl SchemaHolder for Model {
    fn object_for_kind(&self, kind: &str) -> Option<Object> {
        self.kinds.get(&kind.to_lowercase()).map(|def| {
            let mut obj = Object::new(def.kind.clone());
            if let Some(path) = &def.primary_key {
                obj.set_primary_key_path(path);
            }
            obj
        })
    }

    fn object_methods(&self) -> HashMap<String, Vec<String>> {
        self.kinds
            .values()
            .map(|def| (def.kind.clone(), def.methods.clone()))
            .collect()
    }
}

/// Builder for [`Model`]
#[derive(Debug, Default)]
pub struct ModelBuilder {
    kinds: HashMap<String, KindDefinition>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind definition; a later definition for the same kind
    /// replaces the earlier one
    pub fn kind(mut self, def: KindDefinition) -> Self {
        self.kinds.insert(def.kind.to_lowercase(), def);
        self
    }

    pub fn build(self) -> Model {
        Model { kinds: self.kinds }
    }
}
