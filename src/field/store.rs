//! Field state storage.

use indexmap::IndexMap;
use std::sync::Arc;

use super::{ClassNames, FieldPatch, FieldState};
use crate::value::FieldValue;

/// An ordered, immutable view of every field's state.
pub type FieldSnapshot = IndexMap<String, Arc<FieldState>>;

/// The mapping from field name to its live state.
///
/// Every mutation swaps in a whole new `Arc<FieldState>`; state objects are
/// never changed in place. A [`FieldSnapshot`] taken earlier therefore keeps
/// showing the state as it was.
///
/// # Example
///
/// ```rust
/// use formcontrol::{ClassNames, FieldPatch, FieldStateStore, FieldValue, Validity};
///
/// let classes = ClassNames::new("input", "valid", "invalid");
/// let mut store = FieldStateStore::new();
/// store.add_fields([("email", FieldValue::text(""))], &classes);
///
/// let before = store.snapshot();
/// store.set("email", FieldPatch::new().validity(Validity::Invalid));
///
/// assert_eq!(before["email"].validity, Validity::Unvalidated);
/// assert_eq!(store.get("email").unwrap().validity, Validity::Invalid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FieldStateStore {
    fields: IndexMap<String, Arc<FieldState>>,
}

impl FieldStateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state of a field.
    pub fn get(&self, name: &str) -> Option<Arc<FieldState>> {
        self.fields.get(name).cloned()
    }

    /// Returns the current value of a field.
    pub fn value(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).map(|state| state.value.clone())
    }

    /// Returns true if the field exists.
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Merges `patch` into an existing field's state.
    ///
    /// Parts not named by the patch keep their value. Returns false and does
    /// nothing if the field does not exist; use [`upsert`](Self::upsert) to
    /// create it.
    pub fn set(&mut self, name: &str, patch: FieldPatch) -> bool {
        match self.fields.get_mut(name) {
            Some(state) => {
                *state = Arc::new(state.patched(patch));
                true
            }
            None => false,
        }
    }

    /// Merges `patch` into the field's state, creating the field first if
    /// needed.
    ///
    /// A created field starts unvalidated with an empty value and the static
    /// class, exactly as if it had been added with
    /// [`add_fields`](Self::add_fields).
    pub fn upsert(&mut self, name: &str, patch: FieldPatch, class_names: &ClassNames) {
        if self.set(name, patch.clone()) {
            return;
        }
        let next = FieldState::new(FieldValue::default(), class_names).patched(patch);
        self.fields.insert(name.to_string(), Arc::new(next));
    }

    /// Introduces fields with the given initial values.
    ///
    /// Each entry is stamped with the static class and starts unvalidated. A
    /// name that already exists is replaced by the fresh entry.
    pub fn add_fields<I, S>(&mut self, entries: I, class_names: &ClassNames)
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        for (name, value) in entries {
            let name = name.into();
            tracing::debug!(field = %name, "field added");
            self.fields
                .insert(name, Arc::new(FieldState::new(value, class_names)));
        }
    }

    /// Deletes the named fields. Unknown names are ignored.
    pub fn remove_fields<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            if self.fields.shift_remove(name.as_ref()).is_some() {
                tracing::debug!(field = name.as_ref(), "field removed");
            }
        }
    }

    /// Returns the field names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Returns the name to value projection.
    pub fn values(&self) -> IndexMap<String, FieldValue> {
        self.fields
            .iter()
            .map(|(name, state)| (name.clone(), state.value.clone()))
            .collect()
    }

    /// Returns a view of every field's state.
    pub fn snapshot(&self) -> FieldSnapshot {
        self.fields.clone()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
