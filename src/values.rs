//! The upstream value source.
//!
//! [`FormValues`] is the name to value object owned by the host. The form
//! reads it at construction, diffs against it on [`sync_values`], and writes
//! every user change back into it, so host and form stay bound both ways.
//!
//! [`sync_values`]: crate::FormControl::sync_values

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::value::FieldValue;

type ValueMap = Arc<RwLock<IndexMap<String, FieldValue>>>;

/// A shared, host-owned map of field values.
///
/// Clones share the same map. The form is the only writer during its own
/// operations; writes from the host are picked up by the next sync.
///
/// # Example
///
/// ```rust
/// use formcontrol::{FieldValue, FormValues};
///
/// let values = FormValues::from_iter([("email", FieldValue::text(""))]);
/// let host_view = values.clone();
///
/// values.set("email", FieldValue::text("a@b.com"));
/// assert_eq!(host_view.get("email"), Some(FieldValue::text("a@b.com")));
/// ```
#[derive(Default)]
pub struct FormValues {
    values: ValueMap,
}

impl FormValues {
    /// Creates an empty value source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a field's value.
    pub fn get(&self, name: &str) -> Option<FieldValue> {
        self.values.read().get(name).cloned()
    }

    /// Writes a field's value, adding the name if it is new.
    pub fn set(&self, name: impl Into<String>, value: FieldValue) {
        self.values.write().insert(name.into(), value);
    }

    /// Writes several values at once.
    pub fn extend<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        let mut values = self.values.write();
        for (name, value) in entries {
            values.insert(name.into(), value);
        }
    }

    /// Removes a field's value.
    pub fn remove(&self, name: &str) -> Option<FieldValue> {
        self.values.write().shift_remove(name)
    }

    /// Returns true if the name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.read().contains_key(name)
    }

    /// Returns a copy of every entry, in insertion order.
    pub fn snapshot(&self) -> IndexMap<String, FieldValue> {
        self.values.read().clone()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl Clone for FormValues {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
        }
    }
}

impl std::fmt::Debug for FormValues {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.values.read().iter()).finish()
    }
}

impl<S: Into<String>> FromIterator<(S, FieldValue)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (S, FieldValue)>>(iter: I) -> Self {
        let values = Self::new();
        values.extend(iter);
        values
    }
}
