//! Change events from the presentation layer.
//!
//! This module provides [`ChangeEvent`], the normalised form of an input's
//! change notification, and the [`ChangeDispatcher`] that turns it into a new
//! field value, validates it and mirrors it upstream.

use crate::coordinator::ValidationCoordinator;
use crate::error::ConfigError;
use crate::field::{ClassNames, FieldStateStore, Validity};
use crate::value::FieldValue;
use crate::values::FormValues;

/// How an input contributes its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputKind {
    /// The raw value replaces the field value (text, radio, select, ...).
    #[default]
    Single,
    /// The raw value is toggled in the field's set (checkbox groups).
    Multi,
}

impl InputKind {
    /// Maps an HTML input `type` attribute to its kind.
    ///
    /// Only `checkbox` toggles; every other type replaces.
    pub fn from_type_attr(input_type: &str) -> Self {
        if input_type.eq_ignore_ascii_case("checkbox") {
            InputKind::Multi
        } else {
            InputKind::Single
        }
    }
}

/// One change notification from an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The input's field name; empty for untagged inputs.
    pub name: String,
    /// How the raw value applies.
    pub kind: InputKind,
    /// The raw value the input reported.
    pub value: String,
}

impl ChangeEvent {
    /// Creates an event from the input's name, `type` attribute and value.
    pub fn new(name: impl Into<String>, input_type: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::from_type_attr(input_type),
            value: value.into(),
        }
    }

    /// A change of a single-valued input.
    pub fn single(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Single,
            value: value.into(),
        }
    }

    /// A checkbox toggle.
    pub fn checkbox(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: InputKind::Multi,
            value: value.into(),
        }
    }

    /// Computes the field's next value from its current one.
    ///
    /// Single inputs yield the raw value verbatim. Checkbox inputs toggle the
    /// raw value in the current set; a missing field starts from the empty set.
    pub fn next_value(&self, current: Option<&FieldValue>) -> FieldValue {
        match self.kind {
            InputKind::Single => FieldValue::Text(self.value.clone()),
            InputKind::Multi => current
                .cloned()
                .unwrap_or_else(|| FieldValue::Multi(Vec::new()))
                .toggle(&self.value),
        }
    }
}

/// Applies change events to field state.
pub struct ChangeDispatcher<'a> {
    coordinator: ValidationCoordinator<'a>,
    class_names: &'a ClassNames,
    upstream: &'a FormValues,
}

impl<'a> ChangeDispatcher<'a> {
    /// Creates a dispatcher that validates through `coordinator` and mirrors
    /// values into `upstream`.
    pub fn new(
        coordinator: ValidationCoordinator<'a>,
        class_names: &'a ClassNames,
        upstream: &'a FormValues,
    ) -> Self {
        Self {
            coordinator,
            class_names,
            upstream,
        }
    }

    /// Handles one change event.
    ///
    /// Returns `Ok(None)` without doing anything when the event has no field
    /// name. Otherwise the next value is validated, stored, and written into
    /// the upstream values; the resulting validity is returned. A name with no
    /// field yet is admitted first.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the field's schema cannot be evaluated.
    /// Neither the field state nor the upstream values change in that case,
    /// and an unknown field is not admitted.
    pub fn handle(
        &self,
        fields: &mut FieldStateStore,
        event: &ChangeEvent,
    ) -> Result<Option<Validity>, ConfigError> {
        if event.name.is_empty() {
            tracing::trace!(value = %event.value, "change without field name ignored");
            return Ok(None);
        }

        let name = event.name.as_str();
        let current = fields.value(name);
        let next = event.next_value(current.as_ref());
        tracing::trace!(field = name, kind = ?event.kind, value = %next, "change normalised");

        let outcome = self.coordinator.evaluate(name, &next)?;
        let validity = outcome.validity;

        if current.is_none() {
            tracing::warn!(field = name, "change for unknown field, admitting it");
            fields.add_fields([(name, FieldValue::default())], self.class_names);
        }
        self.coordinator.record(fields, name, next.clone(), outcome);
        self.upstream.set(name, next);
        Ok(Some(validity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleEngine;
    use crate::schema::{Schema, SchemaStore};

    #[test]
    fn test_input_kind_from_type_attr() {
        assert_eq!(InputKind::from_type_attr("checkbox"), InputKind::Multi);
        assert_eq!(InputKind::from_type_attr("CHECKBOX"), InputKind::Multi);
        assert_eq!(InputKind::from_type_attr("radio"), InputKind::Single);
        assert_eq!(InputKind::from_type_attr("select-one"), InputKind::Single);
        assert_eq!(InputKind::from_type_attr(""), InputKind::Single);
    }

    #[test]
    fn test_next_value_single_is_verbatim() {
        let event = ChangeEvent::single("age", " 42 ");
        let current = FieldValue::multi(["x"]);
        assert_eq!(event.next_value(Some(&current)), FieldValue::text(" 42 "));
    }

    #[test]
    fn test_next_value_checkbox_toggles() {
        let event = ChangeEvent::new("hobby", "checkbox", "2");
        let current = FieldValue::multi(["1"]);

        let on = event.next_value(Some(&current));
        assert_eq!(on, FieldValue::multi(["1", "2"]));
        let off = event.next_value(Some(&on));
        assert_eq!(off, current);
        assert_eq!(event.next_value(None), FieldValue::multi(["2"]));
    }

    #[test]
    fn test_handle_validates_and_mirrors() {
        let engine = RuleEngine::new();
        let schemas = SchemaStore::new();
        schemas.add_schemas([("email", Schema::parse("required | isEmail", "empty | invalid").unwrap())]);
        let classes = ClassNames::new("input", "valid", "invalid");
        let upstream = FormValues::from_iter([("email", FieldValue::default())]);
        let mut fields = FieldStateStore::new();
        fields.add_fields(upstream.snapshot(), &classes);

        let dispatcher = ChangeDispatcher::new(
            ValidationCoordinator::new(&engine, &schemas, &classes),
            &classes,
            &upstream,
        );

        let validity = dispatcher
            .handle(&mut fields, &ChangeEvent::single("email", "a@b.com"))
            .unwrap();
        assert_eq!(validity, Some(Validity::Valid));
        assert_eq!(upstream.get("email"), Some(FieldValue::text("a@b.com")));

        let ignored = dispatcher
            .handle(&mut fields, &ChangeEvent::single("", "zzz"))
            .unwrap();
        assert_eq!(ignored, None);
        assert_eq!(upstream.len(), 1);
    }

    #[test]
    fn test_handle_error_admits_nothing() {
        let engine = RuleEngine::new();
        let schemas = SchemaStore::new();
        schemas.add_schemas([("tags", Schema::new().rule("isFoo"))]);
        let classes = ClassNames::new("input", "valid", "invalid");
        let upstream = FormValues::new();
        let mut fields = FieldStateStore::new();

        let dispatcher = ChangeDispatcher::new(
            ValidationCoordinator::new(&engine, &schemas, &classes),
            &classes,
            &upstream,
        );
        let result = dispatcher.handle(&mut fields, &ChangeEvent::checkbox("tags", "a"));

        assert_eq!(result, Err(ConfigError::UnknownRule("isFoo".to_string())));
        assert!(!fields.contains("tags"));
        assert!(upstream.is_empty());
    }

    #[test]
    fn test_handle_admits_unknown_field() {
        let engine = RuleEngine::new();
        let schemas = SchemaStore::new();
        let classes = ClassNames::new("input", "valid", "invalid");
        let upstream = FormValues::new();
        let mut fields = FieldStateStore::new();

        let dispatcher = ChangeDispatcher::new(
            ValidationCoordinator::new(&engine, &schemas, &classes),
            &classes,
            &upstream,
        );
        let validity = dispatcher
            .handle(&mut fields, &ChangeEvent::checkbox("tags", "a"))
            .unwrap();

        assert_eq!(validity, Some(Validity::Unvalidated));
        assert_eq!(fields.value("tags"), Some(FieldValue::multi(["a"])));
        assert_eq!(fields.get("tags").unwrap().class_name, vec!["input"]);
        assert_eq!(upstream.get("tags"), Some(FieldValue::multi(["a"])));
    }
}
