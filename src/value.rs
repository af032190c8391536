//! Field values.
//!
//! This module provides [`FieldValue`], the raw value held by a form field:
//! a single string for text, radio and select inputs, or an ordered set of
//! strings for checkbox groups and multi-selects.

use std::fmt::{self, Display};

use serde_json::Value;

/// The raw value of one form field.
///
/// Values are never coerced: whatever the input produced is stored verbatim.
///
/// # Example
///
/// ```rust
/// use formcontrol::FieldValue;
///
/// let hobbies = FieldValue::multi(["1"]).toggle("2");
/// assert_eq!(hobbies, FieldValue::multi(["1", "2"]));
///
/// // Toggling an existing item removes it again.
/// assert_eq!(hobbies.toggle("2"), FieldValue::multi(["1"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldValue {
    /// A scalar value (text, radio, select).
    Text(String),
    /// A set-like ordered sequence of selected items (checkbox group).
    Multi(Vec<String>),
}

impl FieldValue {
    /// Creates a scalar value.
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Creates a multi value from the given items, in order.
    pub fn multi<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::Multi(items.into_iter().map(Into::into).collect())
    }

    /// Returns the scalar text, or `None` for a multi value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Multi(_) => None,
        }
    }

    /// Returns the selected items, or `None` for a scalar value.
    pub fn as_items(&self) -> Option<&[String]> {
        match self {
            FieldValue::Text(_) => None,
            FieldValue::Multi(items) => Some(items),
        }
    }

    /// Returns true for an empty string or an empty selection.
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Multi(items) => items.is_empty(),
        }
    }

    /// Length used by length rules: characters for text, items for multi.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Text(s) => s.chars().count(),
            FieldValue::Multi(items) => items.len(),
        }
    }

    /// Returns true if `item` is part of this value.
    ///
    /// A scalar contains only itself.
    pub fn contains(&self, item: &str) -> bool {
        match self {
            FieldValue::Text(s) => s == item,
            FieldValue::Multi(items) => items.iter().any(|i| i == item),
        }
    }

    /// Returns a new multi value with `item` toggled.
    ///
    /// An item already present is removed; otherwise it is appended. A scalar
    /// value is first read as a set: empty text is the empty set, any other
    /// text is a one-element set.
    pub fn toggle(&self, item: &str) -> FieldValue {
        let mut items = match self {
            FieldValue::Multi(items) => items.clone(),
            FieldValue::Text(s) if s.is_empty() => Vec::new(),
            FieldValue::Text(s) => vec![s.clone()],
        };

        match items.iter().position(|i| i == item) {
            Some(index) => {
                items.remove(index);
            }
            None => items.push(item.to_string()),
        }
        FieldValue::Multi(items)
    }

    /// Converts this value to JSON: a string or an array of strings.
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(s) => Value::String(s.clone()),
            FieldValue::Multi(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Reads a value from JSON.
    ///
    /// Strings become text and arrays become multi values. Numbers and
    /// booleans keep their JSON rendering as text, null is empty text.
    /// Returns `None` for objects and for arrays holding objects or arrays.
    pub fn from_json(value: &Value) -> Option<FieldValue> {
        match value {
            Value::Null => Some(FieldValue::default()),
            Value::String(s) => Some(FieldValue::Text(s.clone())),
            Value::Bool(_) | Value::Number(_) => Some(FieldValue::Text(value.to_string())),
            Value::Array(items) => items
                .iter()
                .map(scalar_to_string)
                .collect::<Option<Vec<_>>>()
                .map(FieldValue::Multi),
            Value::Object(_) => None,
        }
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) => Some(value.to_string()),
        _ => None,
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{}", s),
            FieldValue::Multi(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::Multi(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        FieldValue::multi(items)
    }
}
