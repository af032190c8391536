//! Field schemas.
//!
//! A [`Schema`] describes how one named field is validated: an ordered list of
//! rules, each carrying its own parameter and message template. Schemas are
//! kept per form in a [`SchemaStore`].
//!
//! # Example
//!
//! ```rust
//! use formcontrol::{FieldValue, RuleEngine, Schema};
//!
//! let schema = Schema::new()
//!     .rule("required")
//!     .message("empty")
//!     .rule("isEmail")
//!     .message("invalid");
//!
//! let engine = RuleEngine::new();
//! let error = schema
//!     .evaluate(&engine, "email", &FieldValue::text("not-an-email"))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(error.message.as_deref(), Some("invalid"));
//! ```

mod store;

pub use store::SchemaStore;

use crate::error::{ConfigError, FieldError};
use crate::rule::{parse_messages, parse_rules, Rule, RuleEngine};
use crate::value::FieldValue;

/// The validation schema of one field.
///
/// Rules run left to right and the first failing rule decides the outcome.
/// A schema with no rules accepts every value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    rules: Vec<Rule>,
}

impl Schema {
    /// Creates a schema with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a schema from its surface syntax.
    ///
    /// `rules` is a pipe-delimited rule expression and `messages` the
    /// pipe-delimited message list aligned with it by position. Surplus
    /// messages are ignored; rules without a message fail silently.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MalformedRule` if the rule expression cannot be
    /// parsed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formcontrol::Schema;
    ///
    /// let schema = Schema::parse(
    ///     "required | maxLength(32)",
    ///     "empty | at most {{param}} characters",
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(schema.len(), 2);
    /// assert_eq!(schema.rules()[1].message.as_deref(), Some("at most {{param}} characters"));
    /// ```
    pub fn parse(rules: &str, messages: &str) -> Result<Self, ConfigError> {
        let messages = parse_messages(messages);
        Ok(Self::from_parts(parse_rules(rules)?, messages))
    }

    /// Builds a schema from parsed rules and position-aligned messages.
    pub(crate) fn from_parts(rules: Vec<Rule>, messages: Vec<Option<String>>) -> Self {
        let mut messages = messages.into_iter();
        let rules = rules
            .into_iter()
            .map(|mut rule| {
                rule.message = messages.next().flatten();
                rule
            })
            .collect();
        Self { rules }
    }

    /// Appends a rule without parameter.
    pub fn rule(self, name: impl Into<String>) -> Self {
        self.push(Rule::new(name))
    }

    /// Appends a parameterised rule.
    pub fn rule_with(self, name: impl Into<String>, param: impl Into<String>) -> Self {
        self.push(Rule::new(name).with_param(param))
    }

    /// Appends a fully built rule.
    pub fn push(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Sets the message template of the most recently added rule.
    ///
    /// Has no effect on a schema without rules.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.rules.last_mut() {
            last.message = Some(message.into());
        }
        self
    }

    /// Returns the rules in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true if the schema has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluates `value` for the field `field`.
    ///
    /// Returns `Ok(None)` when every rule passes, or the first failing rule
    /// as a [`FieldError`] with its message rendered against `value`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if a rule is unknown to `engine` or rejects
    /// its parameter. Evaluation stops at that rule.
    pub fn evaluate(
        &self,
        engine: &RuleEngine,
        field: &str,
        value: &FieldValue,
    ) -> Result<Option<FieldError>, ConfigError> {
        for rule in &self.rules {
            if !engine.check_rule(rule, value)? {
                return Ok(Some(FieldError {
                    field: field.to_string(),
                    rule: rule.name.clone(),
                    param: rule.param.clone(),
                    message: rule.render_message(value),
                }));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_schema() -> Schema {
        Schema::parse("required | isEmail", "empty | invalid").unwrap()
    }

    #[test]
    fn test_parse_pairs_messages_by_position() {
        let schema = Schema::parse("required | isEmail | maxLength(32)", "empty | invalid").unwrap();
        let messages: Vec<_> = schema.rules().iter().map(|r| r.message.as_deref()).collect();
        assert_eq!(messages, vec![Some("empty"), Some("invalid"), None]);
    }

    #[test]
    fn test_builder_matches_parse() {
        let built = Schema::new()
            .rule("required")
            .message("empty")
            .rule("isEmail")
            .message("invalid");
        assert_eq!(built, email_schema());
    }

    #[test]
    fn test_message_without_rules_is_ignored() {
        let schema = Schema::new().message("orphan");
        assert!(schema.is_empty());
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let engine = RuleEngine::new();
        let schema = email_schema();

        // "" fails both required and isEmail; required is reported.
        let error = schema
            .evaluate(&engine, "email", &FieldValue::default())
            .unwrap()
            .unwrap();
        assert_eq!(error.rule, "required");
        assert_eq!(error.message.as_deref(), Some("empty"));
    }

    #[test]
    fn test_all_rules_pass() {
        let engine = RuleEngine::new();
        let result = email_schema().evaluate(&engine, "email", &FieldValue::text("a@b.com"));
        assert_eq!(result, Ok(None));
    }

    #[test]
    fn test_missing_message_yields_none() {
        let engine = RuleEngine::new();
        let schema = Schema::new().rule_with("maxLength", "2");
        let error = schema
            .evaluate(&engine, "code", &FieldValue::text("abc"))
            .unwrap()
            .unwrap();
        assert_eq!(error.message, None);
        assert_eq!(error.param.as_deref(), Some("2"));
    }

    #[test]
    fn test_value_placeholder() {
        let engine = RuleEngine::new();
        let schema = Schema::parse("isPhone", "phone {{value}} is invalid").unwrap();
        let error = schema
            .evaluate(&engine, "phone", &FieldValue::text("12ab"))
            .unwrap()
            .unwrap();
        assert_eq!(error.message.as_deref(), Some("phone 12ab is invalid"));
    }

    #[test]
    fn test_unknown_rule_propagates() {
        let engine = RuleEngine::new();
        let schema = Schema::new().rule("required").rule("isFoo");

        let result = schema.evaluate(&engine, "x", &FieldValue::text("value"));
        assert_eq!(result, Err(ConfigError::UnknownRule("isFoo".to_string())));

        // A failure before the unknown rule is still a plain failure.
        let result = schema.evaluate(&engine, "x", &FieldValue::default());
        assert!(matches!(result, Ok(Some(_))));
    }

    #[test]
    fn test_empty_schema_accepts_everything() {
        let engine = RuleEngine::new();
        let result = Schema::new().evaluate(&engine, "x", &FieldValue::default());
        assert_eq!(result, Ok(None));
    }
}
