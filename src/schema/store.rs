//! Per-form schema storage.
//!
//! This module provides the [`SchemaStore`] type that maps field names to
//! their [`Schema`] and supports adding and removing entries at runtime.

use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use super::Schema;

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<IndexMap<String, Arc<Schema>>>>;

/// The mutable mapping from field name to validation schema.
///
/// Each form owns its own store; it is passed explicitly when the form is
/// built. The store is a shared handle: clones see the same entries, so the
/// host can keep a clone and add or remove schemas while the form is live.
/// Separate `SchemaStore::new()` calls never share entries.
///
/// Mutating the store never touches field state. A field whose schema is
/// removed keeps its last result until it is validated again.
///
/// # Example
///
/// ```rust
/// use formcontrol::{Schema, SchemaStore};
///
/// let store = SchemaStore::new();
/// store.add_schemas([
///     ("email", Schema::parse("required | isEmail", "empty | invalid").unwrap()),
///     ("sex", Schema::new().rule("required")),
/// ]);
///
/// assert!(store.contains("email"));
///
/// store.remove_schemas(["sex"]);
/// assert_eq!(store.names(), vec!["email"]);
/// ```
pub struct SchemaStore {
    schemas: SchemaMap,
}

impl SchemaStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(IndexMap::new())),
        }
    }

    /// Merges the given entries into the store.
    ///
    /// An entry whose name already exists replaces the old schema in place,
    /// keeping its position.
    pub fn add_schemas<I, S>(&self, entries: I)
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        let mut schemas = self.schemas.write();
        for (name, schema) in entries {
            let name = name.into();
            tracing::debug!(field = %name, rules = schema.len(), "schema added");
            schemas.insert(name, Arc::new(schema));
        }
    }

    /// Removes the named entries. Unknown names are ignored.
    pub fn remove_schemas<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut schemas = self.schemas.write();
        for name in names {
            if schemas.shift_remove(name.as_ref()).is_some() {
                tracing::debug!(field = name.as_ref(), "schema removed");
            }
        }
    }

    /// Retrieves the schema for a field.
    pub fn get(&self, name: &str) -> Option<Arc<Schema>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns true if the field has a schema.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Returns the field names that have a schema, in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.schemas.read().keys().cloned().collect()
    }

    /// Returns the number of schemas.
    pub fn len(&self) -> usize {
        self.schemas.read().len()
    }

    /// Returns true if the store holds no schemas.
    pub fn is_empty(&self) -> bool {
        self.schemas.read().is_empty()
    }

    /// Returns a copy of every entry, in insertion order.
    pub fn entries(&self) -> Vec<(String, Arc<Schema>)> {
        self.schemas
            .read()
            .iter()
            .map(|(name, schema)| (name.clone(), Arc::clone(schema)))
            .collect()
    }
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaStore {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
        }
    }
}

impl std::fmt::Debug for SchemaStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.schemas.read().iter().map(|(k, v)| (k, v.len())))
            .finish()
    }
}

impl<S: Into<String>> FromIterator<(S, Schema)> for SchemaStore {
    fn from_iter<I: IntoIterator<Item = (S, Schema)>>(iter: I) -> Self {
        let store = Self::new();
        store.add_schemas(iter);
        store
    }
}
