//! Field validation failure types.
//!
//! This module provides [`FieldError`] for a single field's failing rule and
//! [`FieldErrors`] for accumulating failures across a validation pass.

use std::fmt::{self, Display};

use stillwater::prelude::*;

/// The first failing rule of one field.
///
/// A field reports at most one `FieldError` per validation: rules are evaluated
/// left to right and the first failure wins.
///
/// # Example
///
/// ```rust
/// use formcontrol::FieldError;
///
/// let error = FieldError::new("email", "isEmail").with_message("invalid");
///
/// assert_eq!(error.to_string(), "email: invalid");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the field that failed.
    pub field: String,
    /// Name of the rule that failed.
    pub rule: String,
    /// Parameter the rule was evaluated with, if any.
    pub param: Option<String>,
    /// Rendered message, absent when the schema has none for this rule.
    pub message: Option<String>,
}

impl FieldError {
    /// Creates a new field error for the given field and rule.
    pub fn new(field: impl Into<String>, rule: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            param: None,
            message: None,
        }
    }

    /// Sets the rule parameter and returns self for chaining.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Sets the rendered message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.message {
            Some(ref message) => write!(f, "{}: {}", self.field, message),
            None => match self.param {
                Some(ref param) => {
                    write!(f, "{}: failed rule '{}({})'", self.field, self.rule, param)
                }
                None => write!(f, "{}: failed rule '{}'", self.field, self.rule),
            },
        }
    }
}

impl std::error::Error for FieldError {}

/// A non-empty collection of field failures.
///
/// `FieldErrors` wraps a `NonEmptyVec<FieldError>` so that a failed
/// `Validation<T, FieldErrors>` always carries at least one failure.
///
/// # Combining Errors
///
/// ```rust
/// use formcontrol::{FieldError, FieldErrors};
/// use stillwater::prelude::*;
///
/// let errors = FieldErrors::single(FieldError::new("email", "required"))
///     .combine(FieldErrors::single(FieldError::new("phone", "isPhone")));
///
/// assert_eq!(errors.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldErrors(NonEmptyVec<FieldError>);

impl FieldErrors {
    /// Creates a `FieldErrors` containing a single error.
    pub fn single(error: FieldError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Creates a `FieldErrors` from a `Vec`, or `None` when it is empty.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        let mut iter = errors.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::single(first), |acc, e| acc.combine(Self::single(e))))
    }

    /// Returns the number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns the error recorded for `field`, if any.
    pub fn for_field(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }

    /// Returns all errors produced by the rule named `rule`.
    pub fn with_rule(&self, rule: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.rule == rule).collect()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &FieldError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<FieldError>`.
    pub fn into_vec(self) -> Vec<FieldError> {
        self.0.into_vec()
    }
}

impl Semigroup for FieldErrors {
    fn combine(self, other: Self) -> Self {
        FieldErrors(self.0.combine(other.0))
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} field(s) failed validation:", self.len())?;
        for error in self.iter() {
            writeln!(f, "  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl IntoIterator for FieldErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display_with_message() {
        let error = FieldError::new("email", "required").with_message("empty");
        assert_eq!(error.to_string(), "email: empty");
    }

    #[test]
    fn test_field_error_display_without_message() {
        let error = FieldError::new("remarks", "maxLength").with_param("60");
        assert_eq!(error.to_string(), "remarks: failed rule 'maxLength(60)'");

        let error = FieldError::new("phone", "isPhone");
        assert_eq!(error.to_string(), "phone: failed rule 'isPhone'");
    }

    #[test]
    fn test_from_vec_rejects_empty() {
        assert!(FieldErrors::from_vec(Vec::new()).is_none());

        let errors = FieldErrors::from_vec(vec![FieldError::new("a", "required")]).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_combine_keeps_order() {
        let errors = FieldErrors::single(FieldError::new("a", "required"))
            .combine(FieldErrors::single(FieldError::new("b", "isEmail")))
            .combine(FieldErrors::single(FieldError::new("c", "required")));

        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b", "c"]);
        assert_eq!(errors.first().field, "a");
        assert_eq!(errors.with_rule("required").len(), 2);
        assert_eq!(errors.for_field("b").map(|e| e.rule.as_str()), Some("isEmail"));
        assert!(errors.for_field("z").is_none());
    }

    #[test]
    fn test_display_lists_every_field() {
        let errors = FieldErrors::single(FieldError::new("name", "required").with_message("empty"))
            .combine(FieldErrors::single(
                FieldError::new("email", "isEmail").with_message("invalid"),
            ));
        let display = errors.to_string();

        assert!(display.contains("2 field(s)"));
        assert!(display.contains("name: empty"));
        assert!(display.contains("email: invalid"));
    }

    #[test]
    fn test_into_iter() {
        let errors = FieldErrors::single(FieldError::new("a", "required"))
            .combine(FieldErrors::single(FieldError::new("b", "required")));
        let collected: Vec<FieldError> = errors.into_iter().collect();
        assert_eq!(collected.len(), 2);
    }
}
