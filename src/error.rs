//! Error types for store operations

use thiserror::Error;

/// Errors surfaced by backends, pipeline stages and the query engine
///
/// All variants are recoverable, caller-facing conditions. Hook errors are
/// carried verbatim in [`StoreError::Rejected`] and abort the triggering
/// operation without touching storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Create or Update received an object with no kind
    #[error("object is nil")]
    NilObject,

    /// Create collided with an existing object of the same kind and primary key
    #[error("object already exists: {0}")]
    ObjectExists(String),

    /// The identity does not resolve to a stored object
    #[error("object does not exist: {0}")]
    NoSuchObject(String),

    /// Property filter names a field absent from the listed objects
    #[error("invalid filter key: {0}")]
    InvalidFilter(String),

    /// List was called with a fully-qualified identity instead of a kind prefix
    #[error("cannot list specific identity: {0}")]
    InvalidPath(String),

    /// Verb not permitted for the kind, per the schema's method table
    #[error("method {method} not allowed for kind {kind}")]
    InvalidMethod { kind: String, method: String },

    /// The schema has no definition for this kind
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    /// Update supplied an object of a different kind than the stored one
    #[error("kind mismatch: expected {expected}, got {actual}")]
    KindMismatch { expected: String, actual: String },

    /// The same per-call option was supplied twice
    #[error("{0} option has already been set")]
    DuplicateOption(&'static str),

    /// A hook is already registered for this (kind, action) pair
    #[error("hook already registered for {kind} {action}")]
    DuplicateHook { kind: String, action: String },

    /// A hook vetoed the operation; carries the hook's message verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn object_exists(path: impl Into<String>) -> Self {
        Self::ObjectExists(path.into())
    }

    pub fn no_such_object(path: impl Into<String>) -> Self {
        Self::NoSuchObject(path.into())
    }

    pub fn unknown_kind(kind: impl Into<String>) -> Self {
        Self::UnknownKind(kind.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
