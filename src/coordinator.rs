//! Validation passes over field state.
//!
//! This module provides the [`ValidationCoordinator`], which validates one
//! field, a named subset, or every schema-bearing field, and writes the
//! outcome back into the [`FieldStateStore`].

use stillwater::Validation;

use crate::error::{ConfigError, FieldError, FieldErrors};
use crate::field::{ClassNames, FieldPatch, FieldStateStore, Validity};
use crate::rule::RuleEngine;
use crate::schema::SchemaStore;
use crate::value::FieldValue;
use crate::ValidationResult;

/// Orchestrates validation of fields against their schemas.
///
/// The coordinator borrows everything it needs for one pass. It is the only
/// writer of a field's `validity`, `message` and `class_name`.
///
/// # Example
///
/// ```rust
/// use formcontrol::{
///     ClassNames, FieldStateStore, FieldValue, RuleEngine, Schema, SchemaStore,
///     ValidationCoordinator, Validity,
/// };
///
/// let engine = RuleEngine::new();
/// let schemas = SchemaStore::new();
/// schemas.add_schemas([("email", Schema::parse("required | isEmail", "empty | invalid").unwrap())]);
/// let classes = ClassNames::new("input", "valid", "invalid");
/// let mut fields = FieldStateStore::new();
///
/// let coordinator = ValidationCoordinator::new(&engine, &schemas, &classes);
/// let validity = coordinator
///     .validate_one(&mut fields, "email", FieldValue::text("a@b.com"))
///     .unwrap();
///
/// assert_eq!(validity, Validity::Valid);
/// assert_eq!(fields.get("email").unwrap().class_name, vec!["input", "valid"]);
/// ```
pub struct ValidationCoordinator<'a> {
    engine: &'a RuleEngine,
    schemas: &'a SchemaStore,
    class_names: &'a ClassNames,
}

impl<'a> ValidationCoordinator<'a> {
    /// Creates a coordinator over the given engine, schemas and class tokens.
    pub fn new(engine: &'a RuleEngine, schemas: &'a SchemaStore, class_names: &'a ClassNames) -> Self {
        Self {
            engine,
            schemas,
            class_names,
        }
    }

    /// Validates `value` for the field `name` and stores the outcome.
    ///
    /// Without a schema the field becomes `Unvalidated` and its message is
    /// cleared; with one, the first failing rule makes it `Invalid` with that
    /// rule's message. Either way the value is stored and the class tokens are
    /// re-derived. A field that does not exist yet is created.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the schema uses a rule the engine cannot
    /// evaluate. Field state is left untouched in that case.
    pub fn validate_one(
        &self,
        fields: &mut FieldStateStore,
        name: &str,
        value: FieldValue,
    ) -> Result<Validity, ConfigError> {
        let outcome = self.evaluate(name, &value)?;
        let validity = outcome.validity;
        self.record(fields, name, value, outcome);
        Ok(validity)
    }

    /// Re-validates the named fields against their stored values.
    ///
    /// Returns false if and only if at least one of them ended `Invalid`.
    /// Unvalidated fields never fail the aggregate. Every named field is
    /// evaluated, even after a failure.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownField` if a name has no field, or the
    /// first rule configuration error met. Every field is evaluated before any
    /// is written, so no state changes when an error is returned.
    pub fn validate_many<I, S>(&self, fields: &mut FieldStateStore, names: I) -> Result<bool, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.validate_many_report(fields, names)
            .map(|report| report.is_success())
    }

    /// Like [`validate_many`](Self::validate_many), but accumulates the
    /// failure of every invalid field.
    pub fn validate_many_report<I, S>(
        &self,
        fields: &mut FieldStateStore,
        names: I,
    ) -> Result<ValidationResult<()>, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets = names
            .into_iter()
            .map(|name| {
                let name = name.as_ref();
                fields
                    .value(name)
                    .map(|value| (name.to_string(), value))
                    .ok_or_else(|| ConfigError::UnknownField(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.validate_entries(fields, targets)
    }

    /// Validates the given values and stores them, all or nothing.
    ///
    /// Every entry is evaluated first; only when none of them hits a
    /// [`ConfigError`] are the outcomes written. Names without a field are
    /// created.
    pub fn validate_entries(
        &self,
        fields: &mut FieldStateStore,
        entries: Vec<(String, FieldValue)>,
    ) -> Result<ValidationResult<()>, ConfigError> {
        let outcomes = entries
            .into_iter()
            .map(|(name, value)| {
                let outcome = self.evaluate(&name, &value)?;
                Ok((name, value, outcome))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let mut errors = Vec::new();
        for (name, value, outcome) in outcomes {
            if let Some(error) = self.record(fields, &name, value, outcome) {
                errors.push(error);
            }
        }

        Ok(match FieldErrors::from_vec(errors) {
            Some(errors) => Validation::Failure(errors),
            None => Validation::Success(()),
        })
    }

    /// Validates every field that has a schema.
    ///
    /// Schema names with no field entry are skipped.
    pub fn validate_all(&self, fields: &mut FieldStateStore) -> Result<bool, ConfigError> {
        self.validate_all_report(fields)
            .map(|report| report.is_success())
    }

    /// Like [`validate_all`](Self::validate_all), but accumulates failures.
    pub fn validate_all_report(
        &self,
        fields: &mut FieldStateStore,
    ) -> Result<ValidationResult<()>, ConfigError> {
        let names = self.schema_bearing(fields);
        self.validate_many_report(fields, names)
    }

    /// Returns true if every schema-bearing field is `Valid`.
    ///
    /// Fields without a schema are ignored. A schema-bearing field that was
    /// never validated is not valid.
    pub fn is_all_valid(&self, fields: &FieldStateStore) -> bool {
        self.schema_bearing(fields)
            .iter()
            .all(|name| fields.get(name).is_some_and(|state| state.validity.is_valid()))
    }

    fn schema_bearing(&self, fields: &FieldStateStore) -> Vec<String> {
        self.schemas
            .names()
            .into_iter()
            .filter(|name| {
                let present = fields.contains(name);
                if !present {
                    tracing::trace!(field = %name, "schema has no field, skipping");
                }
                present
            })
            .collect()
    }

    /// Checks `value` against the field's schema without touching state.
    pub fn evaluate(&self, name: &str, value: &FieldValue) -> Result<Outcome, ConfigError> {
        let outcome = match self.schemas.get(name) {
            None => Outcome {
                validity: Validity::Unvalidated,
                error: None,
            },
            Some(schema) => match schema.evaluate(self.engine, name, value)? {
                Some(error) => Outcome {
                    validity: Validity::Invalid,
                    error: Some(error),
                },
                None => Outcome {
                    validity: Validity::Valid,
                    error: None,
                },
            },
        };
        Ok(outcome)
    }

    /// Stores `value` and an evaluated outcome, creating the field if needed.
    ///
    /// Returns the outcome's failure, if any.
    pub fn record(
        &self,
        fields: &mut FieldStateStore,
        name: &str,
        value: FieldValue,
        outcome: Outcome,
    ) -> Option<FieldError> {
        let Outcome { validity, error } = outcome;
        let message = error.as_ref().and_then(|e| e.message.clone());
        tracing::debug!(
            field = name,
            ?validity,
            rule = error.as_ref().map(|e| e.rule.as_str()),
            "field validated"
        );

        fields.upsert(
            name,
            FieldPatch::new()
                .value(value)
                .class_name(self.class_names.derive(validity))
                .validity(validity)
                .message(message),
            self.class_names,
        );
        error
    }
}

/// The result of checking one value, not yet written to field state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Validity the field will take.
    pub validity: Validity,
    /// The first failing rule, when `validity` is `Invalid`.
    pub error: Option<FieldError>,
}
