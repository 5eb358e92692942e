//! Backend-agnostic query engine
//!
//! Pure functions over in-memory object lists, applied in a fixed order for
//! every List call: key-filter, property-filter, order, paginate. Filters
//! run first to shrink the set before sorting; pagination runs last so
//! offsets are relative to the final filtered and ordered view. Every
//! backend reproduces these semantics by delegating here.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::object::{Object, ObjectList};
use crate::options::{ListSettings, PropFilter};

/// Serialized string form of the field at a dotted path, `None` when absent
///
/// Strings render unquoted; any other value renders as its JSON text, so
/// ordering and filtering compare the same representation everywhere.
pub fn field_as_string(obj: &Object, path: &str) -> Option<String> {
    let root = serde_json::to_value(obj).ok()?;
    let mut current = &root;
    for segment in path.split('.') {
        current = current.get(segment)?;
    }
    Some(match current {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Run the full sequence over a candidate list
///
/// A property filter whose key is absent from the first candidate is an
/// `InvalidFilter` error — a malformed query, not an empty result.
pub fn apply(list: ObjectList, settings: &ListSettings) -> Result<ObjectList> {
    if let Some(filter) = &settings.prop_filter {
        if let Some(first) = list.first() {
            if field_as_string(first, &filter.key).is_none() {
                return Err(StoreError::InvalidFilter(filter.key.clone()));
            }
        }
    }

    let list = key_filter(list, settings.key_filter.as_ref());
    let list = prop_filter(list, settings.prop_filter.as_ref());
    let list = order(list, settings.order_by.as_deref(), settings.ascending());
    Ok(paginate(list, settings.page_offset(), settings.page_size()))
}

/// Keep objects whose primary key is in the filter set
pub fn key_filter(list: ObjectList, filter: Option<&HashSet<String>>) -> ObjectList {
    let Some(keys) = filter else {
        return list;
    };
    list.into_iter()
        .filter(|obj| keys.contains(&obj.primary_key()))
        .collect()
}

/// Keep objects whose serialized field equals the filter value
pub fn prop_filter(list: ObjectList, filter: Option<&PropFilter>) -> ObjectList {
    let Some(filter) = filter else {
        return list;
    };
    list.into_iter()
        .filter(|obj| field_as_string(obj, &filter.key).is_some_and(|v| v == filter.value))
        .collect()
}

/// Stable sort by the serialized field at `path`
pub fn order(mut list: ObjectList, path: Option<&str>, ascending: bool) -> ObjectList {
    let Some(path) = path else {
        return list;
    };
    if path.is_empty() {
        return list;
    }

    let mut keyed: Vec<(String, Object)> = list
        .drain(..)
        .map(|obj| {
            let key = field_as_string(&obj, path).unwrap_or_default();
            (key, obj)
        })
        .collect();

    keyed.sort_by(|a, b| {
        if ascending {
            a.0.cmp(&b.0)
        } else {
            b.0.cmp(&a.0)
        }
    });

    keyed.into_iter().map(|(_, obj)| obj).collect()
}

/// Window the list; `size == 0` means no limit, an out-of-range offset or a
/// zero-width window yields an empty list, never an error
pub fn paginate(list: ObjectList, offset: usize, size: usize) -> ObjectList {
    let len = list.len();
    let size = if size == 0 { len } else { size };

    let lo = offset.min(len);
    let hi = offset.saturating_add(size).min(len);
    if hi <= lo {
        return ObjectList::new();
    }

    list.into_iter().skip(lo).take(hi - lo).collect()
}
