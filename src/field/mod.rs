//! Field state.
//!
//! This module provides [`FieldState`], the live condition of one form field,
//! along with the tri-state [`Validity`], the presentation [`ClassNames`] and
//! the merge-style [`FieldPatch`] used to update state.

mod store;

pub use store::{FieldSnapshot, FieldStateStore};

use crate::value::FieldValue;

/// Outcome of the last validation of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Validity {
    /// Never validated against a schema, or validated while it had none.
    #[default]
    Unvalidated,
    /// Validated and every rule passed.
    Valid,
    /// Validated and a rule failed.
    Invalid,
}

impl Validity {
    /// Returns true for `Valid`.
    pub fn is_valid(self) -> bool {
        self == Validity::Valid
    }

    /// Returns true for `Invalid`.
    pub fn is_invalid(self) -> bool {
        self == Validity::Invalid
    }

    /// The tri-state as an optional boolean: `None` when unvalidated.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Validity::Unvalidated => None,
            Validity::Valid => Some(true),
            Validity::Invalid => Some(false),
        }
    }
}

/// Presentation class tokens propagated to every field.
///
/// `static_class` is attached to every field; `success` and `error` are added
/// after a passing or failing validation. Empty tokens are never emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassNames {
    /// Token present on every field.
    pub static_class: String,
    /// Token added when the field is valid.
    pub success: String,
    /// Token added when the field is invalid.
    pub error: String,
}

impl ClassNames {
    /// Creates a token set.
    pub fn new(
        static_class: impl Into<String>,
        success: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            static_class: static_class.into(),
            success: success.into(),
            error: error.into(),
        }
    }

    /// Derives the ordered class list for a field with the given validity.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formcontrol::{ClassNames, Validity};
    ///
    /// let classes = ClassNames::new("form-control", "valid", "invalid");
    /// assert_eq!(classes.derive(Validity::Invalid), vec!["form-control", "invalid"]);
    /// assert_eq!(classes.derive(Validity::Unvalidated), vec!["form-control"]);
    /// ```
    pub fn derive(&self, validity: Validity) -> Vec<String> {
        let outcome = match validity {
            Validity::Unvalidated => None,
            Validity::Valid => Some(&self.success),
            Validity::Invalid => Some(&self.error),
        };

        std::iter::once(&self.static_class)
            .chain(outcome)
            .filter(|token| !token.is_empty())
            .cloned()
            .collect()
    }
}

/// The live condition of one field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldState {
    /// Current raw value.
    pub value: FieldValue,
    /// Derived presentation tokens.
    pub class_name: Vec<String>,
    /// Outcome of the last validation.
    pub validity: Validity,
    /// Rendered failure message; only ever set while `Invalid`.
    pub message: Option<String>,
}

impl FieldState {
    /// Creates an unvalidated field stamped with the static class.
    pub fn new(value: FieldValue, class_names: &ClassNames) -> Self {
        Self {
            value,
            class_name: class_names.derive(Validity::Unvalidated),
            validity: Validity::Unvalidated,
            message: None,
        }
    }

    /// The class tokens joined with a single space.
    pub fn class_string(&self) -> String {
        self.class_name.join(" ")
    }

    /// Returns a copy of this state with `patch` applied.
    pub fn patched(&self, patch: FieldPatch) -> Self {
        Self {
            value: patch.value.unwrap_or_else(|| self.value.clone()),
            class_name: patch.class_name.unwrap_or_else(|| self.class_name.clone()),
            validity: patch.validity.unwrap_or(self.validity),
            message: patch.message.unwrap_or_else(|| self.message.clone()),
        }
    }
}

/// A partial update of a [`FieldState`].
///
/// Only the parts that are set replace the stored ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldPatch {
    value: Option<FieldValue>,
    class_name: Option<Vec<String>>,
    validity: Option<Validity>,
    message: Option<Option<String>>,
}

impl FieldPatch {
    /// Creates an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the value.
    pub fn value(mut self, value: FieldValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Replaces the class tokens.
    pub fn class_name(mut self, class_name: Vec<String>) -> Self {
        self.class_name = Some(class_name);
        self
    }

    /// Replaces the validity.
    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = Some(validity);
        self
    }

    /// Replaces the message; `None` clears it.
    pub fn message(mut self, message: Option<String>) -> Self {
        self.message = Some(message);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_skips_empty_tokens() {
        let classes = ClassNames::new("", "ok", "");
        assert!(classes.derive(Validity::Invalid).is_empty());
        assert_eq!(classes.derive(Validity::Valid), vec!["ok"]);
    }

    #[test]
    fn test_new_state_is_unvalidated() {
        let classes = ClassNames::new("input", "valid", "invalid");
        let state = FieldState::new(FieldValue::text("x"), &classes);

        assert_eq!(state.validity, Validity::Unvalidated);
        assert_eq!(state.message, None);
        assert_eq!(state.class_string(), "input");
    }

    #[test]
    fn test_patch_only_touches_given_parts() {
        let classes = ClassNames::new("input", "valid", "invalid");
        let state = FieldState::new(FieldValue::text("x"), &classes);

        let patched = state.patched(FieldPatch::new().validity(Validity::Valid));
        assert_eq!(patched.value, FieldValue::text("x"));
        assert_eq!(patched.class_name, vec!["input"]);
        assert_eq!(patched.validity, Validity::Valid);

        let cleared = patched
            .patched(FieldPatch::new().message(Some("bad".into())))
            .patched(FieldPatch::new().message(None));
        assert_eq!(cleared.message, None);
        assert_eq!(cleared.validity, Validity::Valid);
    }

    #[test]
    fn test_validity_as_bool() {
        assert_eq!(Validity::Unvalidated.as_bool(), None);
        assert_eq!(Validity::Valid.as_bool(), Some(true));
        assert_eq!(Validity::Invalid.as_bool(), Some(false));
        assert!(Validity::Invalid.is_invalid());
        assert!(!Validity::Unvalidated.is_valid());
    }
}
