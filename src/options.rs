//! Per-call options for Store operations
//!
//! Options are passed as slices and resolved into settings before any work
//! happens. Each option may be set at most once per call; a duplicate is a
//! configuration error, not a silent override.

use std::collections::HashSet;
use std::time::Duration;

use crate::error::{Result, StoreError};

/// Exact-match filter over a dotted field path of the serialized object
#[derive(Debug, Clone, PartialEq)]
pub struct PropFilter {
    pub key: String,
    pub value: String,
}

/// Options recognized by List
#[derive(Debug, Clone)]
pub enum ListOption {
    /// Keep objects whose serialized field at `key` equals `value`
    PropFilter(PropFilter),
    /// Keep objects whose primary key is one of the given keys
    KeyFilter(Vec<String>),
    /// Sort by the serialized field at the dotted path
    OrderBy(String),
    /// Sort direction; `true` (the default) is ascending
    OrderIncremental(bool),
    /// Maximum page length; `0` means no limit
    PageSize(usize),
    /// Number of results to skip, relative to the filtered and ordered view
    PageOffset(usize),
}

impl ListOption {
    pub fn prop_filter(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::PropFilter(PropFilter {
            key: key.into(),
            value: value.into(),
        })
    }

    pub fn key_filter<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::KeyFilter(keys.into_iter().map(Into::into).collect())
    }

    pub fn order_by(path: impl Into<String>) -> Self {
        Self::OrderBy(path.into())
    }
}

/// Options recognized by Create
#[derive(Debug, Clone)]
pub enum CreateOption {
    /// Cache expiration override for this write; `0` means immediately stale
    Expire(Duration),
}

/// Options recognized by Update
#[derive(Debug, Clone)]
pub enum UpdateOption {
    /// Cache expiration override for this write; `0` means immediately stale
    Expire(Duration),
}

/// Resolved List settings
#[derive(Debug, Clone, Default)]
pub struct ListSettings {
    pub prop_filter: Option<PropFilter>,
    pub key_filter: Option<HashSet<String>>,
    pub order_by: Option<String>,
    pub order_incremental: Option<bool>,
    pub page_size: Option<usize>,
    pub page_offset: Option<usize>,
}

impl ListSettings {
    /// Fold a slice of options, rejecting duplicates
    pub fn resolve(opts: &[ListOption]) -> Result<Self> {
        let mut settings = Self::default();

        for opt in opts {
            match opt {
                ListOption::PropFilter(filter) => {
                    if settings.prop_filter.is_some() {
                        return Err(StoreError::DuplicateOption("prop filter"));
                    }
                    settings.prop_filter = Some(filter.clone());
                }
                ListOption::KeyFilter(keys) => {
                    if settings.key_filter.is_some() {
                        return Err(StoreError::DuplicateOption("key filter"));
                    }
                    settings.key_filter = Some(keys.iter().cloned().collect());
                }
                ListOption::OrderBy(path) => {
                    if settings.order_by.is_some() {
                        return Err(StoreError::DuplicateOption("order by"));
                    }
                    settings.order_by = Some(path.clone());
                }
                ListOption::OrderIncremental(asc) => {
                    if settings.order_incremental.is_some() {
                        return Err(StoreError::DuplicateOption("order incremental"));
                    }
                    settings.order_incremental = Some(*asc);
                }
                ListOption::PageSize(size) => {
                    if settings.page_size.is_some() {
                        return Err(StoreError::DuplicateOption("page size"));
                    }
                    settings.page_size = Some(*size);
                }
                ListOption::PageOffset(offset) => {
                    if settings.page_offset.is_some() {
                        return Err(StoreError::DuplicateOption("page offset"));
                    }
                    settings.page_offset = Some(*offset);
                }
            }
        }

        Ok(settings)
    }

    pub fn ascending(&self) -> bool {
        self.order_incremental.unwrap_or(true)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.unwrap_or(0)
    }

    pub fn page_offset(&self) -> usize {
        self.page_offset.unwrap_or(0)
    }
}

/// Resolved Create/Update settings
#[derive(Debug, Clone, Default)]
pub struct WriteSettings {
    pub expiration: Option<Duration>,
}

impl WriteSettings {
    pub fn from_create(opts: &[CreateOption]) -> Result<Self> {
        let mut settings = Self::default();
        for opt in opts {
            match opt {
                CreateOption::Expire(duration) => settings.set_expiration(*duration)?,
            }
        }
        Ok(settings)
    }

    pub fn from_update(opts: &[UpdateOption]) -> Result<Self> {
        let mut settings = Self::default();
        for opt in opts {
            match opt {
                UpdateOption::Expire(duration) => settings.set_expiration(*duration)?,
            }
        }
        Ok(settings)
    }

    fn set_expiration(&mut self, duration: Duration) -> Result<()> {
        if self.expiration.is_some() {
            return Err(StoreError::DuplicateOption("expire"));
        }
        self.expiration = Some(duration);
        Ok(())
    }
}
