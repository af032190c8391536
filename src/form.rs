//! The form controller.
//!
//! [`FormControl`] binds a set of fields to their schemas. It owns the field
//! state, routes change events through validation, keeps the host's values in
//! sync and hands a fresh [`FormSnapshot`] to every subscribed presenter after
//! each update.

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use stillwater::Validation;

use crate::coordinator::ValidationCoordinator;
use crate::dispatch::{ChangeDispatcher, ChangeEvent};
use crate::error::ConfigError;
use crate::field::{ClassNames, FieldSnapshot, FieldState, FieldStateStore, Validity};
use crate::rule::RuleEngine;
use crate::schema::{Schema, SchemaStore};
use crate::value::FieldValue;
use crate::values::FormValues;
use crate::ValidationResult;

type Presenter = Box<dyn FnMut(&FormSnapshot)>;

/// Everything the presentation layer needs to render the form.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSnapshot {
    /// State of every field, in insertion order.
    pub fields: FieldSnapshot,
    /// True if every schema-bearing field is valid.
    pub is_all_valid: bool,
    /// Name to value projection of the fields.
    pub form_values: IndexMap<String, FieldValue>,
}

/// A form's validation binding.
///
/// # Example
///
/// ```rust
/// use formcontrol::{
///     ChangeEvent, ClassNames, FieldValue, FormControl, FormValues, RuleEngine, Schema,
///     SchemaStore, Validity,
/// };
///
/// let values = FormValues::from_iter([
///     ("email", FieldValue::text("")),
///     ("hobby", FieldValue::multi(Vec::<String>::new())),
/// ]);
/// let schemas = SchemaStore::new();
/// schemas.add_schemas([
///     ("email", Schema::parse("required | isEmail", "empty | invalid").unwrap()),
///     ("hobby", Schema::parse("selectLimit(2)", "pick at least {{param}}").unwrap()),
/// ]);
/// let engine = RuleEngine::new().with_rule("selectLimit", |value, param| {
///     let limit = param.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
///     value.as_items().map_or(false, |items| items.len() >= limit)
/// });
///
/// let mut form = FormControl::new(
///     values.clone(),
///     ClassNames::new("form-control", "valid", "invalid"),
///     schemas,
///     engine,
/// )
/// .unwrap();
///
/// form.handle_change(&ChangeEvent::single("email", "a@b.com")).unwrap();
/// form.handle_change(&ChangeEvent::checkbox("hobby", "1")).unwrap();
///
/// assert_eq!(form.field("email").unwrap().validity, Validity::Valid);
/// assert_eq!(
///     form.field("hobby").unwrap().message.as_deref(),
///     Some("pick at least 2")
/// );
/// assert_eq!(values.get("hobby"), Some(FieldValue::multi(["1"])));
/// assert!(!form.validate().unwrap());
/// ```
pub struct FormControl {
    engine: RuleEngine,
    schemas: SchemaStore,
    fields: FieldStateStore,
    class_names: ClassNames,
    upstream: FormValues,
    presenters: Vec<Presenter>,
}

impl FormControl {
    /// Creates a form from the host's values, class tokens, schemas and rules.
    ///
    /// Every upstream value becomes an unvalidated field stamped with the
    /// static class. No validation runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` if a schema names a rule the engine
    /// does not know, or a parameter error if a rule's parameter is missing
    /// or unusable.
    pub fn new(
        values: FormValues,
        class_names: ClassNames,
        schemas: SchemaStore,
        engine: RuleEngine,
    ) -> Result<Self, ConfigError> {
        for (_, schema) in schemas.entries() {
            engine.ensure_known(schema.rules())?;
        }

        let mut fields = FieldStateStore::new();
        fields.add_fields(values.snapshot(), &class_names);
        tracing::debug!(fields = fields.len(), schemas = schemas.len(), "form created");

        Ok(Self {
            engine,
            schemas,
            fields,
            class_names,
            upstream: values,
            presenters: Vec::new(),
        })
    }

    /// Returns the rule engine.
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Returns the schema store.
    pub fn schemas(&self) -> &SchemaStore {
        &self.schemas
    }

    /// Returns the upstream value source.
    pub fn values(&self) -> &FormValues {
        &self.upstream
    }

    /// Returns the class tokens.
    pub fn class_names(&self) -> &ClassNames {
        &self.class_names
    }

    /// Registers a custom rule on this form's engine.
    pub fn register_rule<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&FieldValue, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.engine.register(name, check);
    }

    /// Returns a field's state.
    pub fn field(&self, name: &str) -> Option<Arc<FieldState>> {
        self.fields.get(name)
    }

    /// Returns every field's state.
    pub fn fields(&self) -> FieldSnapshot {
        self.fields.snapshot()
    }

    /// Returns the name to value projection of the fields.
    pub fn form_values(&self) -> IndexMap<String, FieldValue> {
        self.fields.values()
    }

    /// Returns true if every schema-bearing field is valid.
    ///
    /// Fields without a schema do not count. A schema-bearing field that has
    /// not been validated yet is not valid.
    pub fn is_all_valid(&self) -> bool {
        ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .is_all_valid(&self.fields)
    }

    /// Returns the current snapshot.
    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            fields: self.fields.snapshot(),
            is_all_valid: self.is_all_valid(),
            form_values: self.fields.values(),
        }
    }

    /// Subscribes a presenter to every update.
    ///
    /// The presenter is called synchronously with the new snapshot at the end
    /// of each state-changing operation.
    pub fn subscribe<F>(&mut self, presenter: F)
    where
        F: FnMut(&FormSnapshot) + 'static,
    {
        self.presenters.push(Box::new(presenter));
    }

    /// Handles a change event from an input.
    ///
    /// Events without a field name are ignored and return `Ok(None)`.
    /// Otherwise the field's next value is validated, stored and written into
    /// the upstream values, and presenters are notified.
    pub fn handle_change(&mut self, event: &ChangeEvent) -> Result<Option<Validity>, ConfigError> {
        let coordinator = ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names);
        let dispatcher = ChangeDispatcher::new(coordinator, &self.class_names, &self.upstream);
        let validity = dispatcher.handle(&mut self.fields, event)?;

        if validity.is_some() {
            self.notify();
        }
        Ok(validity)
    }

    /// Validates one field with a new value without notifying presenters.
    pub fn validate_field(
        &mut self,
        name: &str,
        value: FieldValue,
    ) -> Result<Validity, ConfigError> {
        ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .validate_one(&mut self.fields, name, value)
    }

    /// Validates every schema-bearing field.
    ///
    /// Returns false if any field ended invalid. On a [`ConfigError`] no
    /// field is changed and presenters are not notified.
    pub fn validate(&mut self) -> Result<bool, ConfigError> {
        let result = ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .validate_all(&mut self.fields)?;
        self.notify();
        Ok(result)
    }

    /// Validates the named fields against their stored values.
    ///
    /// Returns false if any of them ended invalid; fields without a schema
    /// never fail the result.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownField` if a name has no field. No field
    /// is changed when an error is returned.
    pub fn validate_by_names<I, S>(&mut self, names: I) -> Result<bool, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let result = ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .validate_many(&mut self.fields, names)?;
        self.notify();
        Ok(result)
    }

    /// Validates every schema-bearing field and reports all failures.
    ///
    /// On success the form values are returned; on failure every invalid
    /// field contributes one [`FieldError`](crate::FieldError).
    pub fn validate_report(
        &mut self,
    ) -> Result<ValidationResult<IndexMap<String, FieldValue>>, ConfigError> {
        let report = ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .validate_all_report(&mut self.fields)?;
        self.notify();

        Ok(match report.into_result() {
            Ok(()) => Validation::Success(self.fields.values()),
            Err(errors) => Validation::Failure(errors),
        })
    }

    /// Adds fields with the given initial values.
    ///
    /// New fields start unvalidated with the static class. Re-adding an
    /// existing name resets it.
    pub fn add_fields<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        self.fields.add_fields(entries, &self.class_names);
        self.notify();
    }

    /// Removes the named fields.
    pub fn remove_fields<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.fields.remove_fields(names);
        self.notify();
    }

    /// Adds or replaces schemas. No validation runs.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` if a schema names an unregistered
    /// rule, or a parameter error if a rule cannot use its parameter; nothing
    /// is added in that case.
    pub fn add_schemas<I, S>(&mut self, entries: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = (S, Schema)>,
        S: Into<String>,
    {
        let entries: Vec<(S, Schema)> = entries.into_iter().collect();
        for (_, schema) in &entries {
            self.engine.ensure_known(schema.rules())?;
        }
        self.schemas.add_schemas(entries);
        Ok(())
    }

    /// Removes schemas. Affected fields keep their last result until they
    /// are validated again.
    pub fn remove_schemas<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.schemas.remove_schemas(names);
    }

    /// Picks up values the host changed in the upstream source.
    ///
    /// Fields whose stored value differs from the upstream one are validated
    /// with the new value; unchanged fields are left alone; names unknown to
    /// the form are admitted without validation. Returns the names that were
    /// re-validated.
    ///
    /// On a [`ConfigError`] nothing is changed and presenters are not
    /// notified.
    pub fn sync_values(&mut self) -> Result<Vec<String>, ConfigError> {
        let mut changed = Vec::new();
        let mut admitted = Vec::new();

        for (name, value) in self.upstream.snapshot() {
            match self.fields.value(&name) {
                Some(current) if current == value => {}
                Some(_) => changed.push((name, value)),
                None => admitted.push((name, value)),
            }
        }

        let names: Vec<String> = changed.iter().map(|(name, _)| name.clone()).collect();
        ValidationCoordinator::new(&self.engine, &self.schemas, &self.class_names)
            .validate_entries(&mut self.fields, changed)?;
        self.fields.add_fields(admitted, &self.class_names);

        tracing::debug!(changed = names.len(), "values synced");
        self.notify();
        Ok(names)
    }

    /// Writes new values into the upstream source, then syncs.
    pub fn update_values<I, S>(&mut self, entries: I) -> Result<Vec<String>, ConfigError>
    where
        I: IntoIterator<Item = (S, FieldValue)>,
        S: Into<String>,
    {
        self.upstream.extend(entries);
        self.sync_values()
    }

    fn notify(&mut self) {
        if self.presenters.is_empty() {
            return;
        }
        let snapshot = self.snapshot();
        for presenter in &mut self.presenters {
            presenter(&snapshot);
        }
    }
}

impl fmt::Debug for FormControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormControl")
            .field("fields", &self.fields)
            .field("schemas", &self.schemas)
            .field("class_names", &self.class_names)
            .field("presenters", &self.presenters.len())
            .finish()
    }
}
