//! Named validation rules.
//!
//! This module provides the [`RuleEngine`], a registry of named checks, and the
//! [`Rule`] triple that a schema is built from. A check receives the field
//! value and the rule's optional parameter and answers pass or fail.
//!
//! # Example
//!
//! ```rust
//! use formcontrol::{FieldValue, RuleEngine};
//!
//! let engine = RuleEngine::new().with_rule("selectLimit", |value, param| {
//!     let limit = param.and_then(|p| p.parse::<usize>().ok()).unwrap_or(0);
//!     value.as_items().map_or(false, |items| items.len() >= limit)
//! });
//!
//! assert!(engine.check("isEmail", &FieldValue::text("a@b.com"), None).unwrap());
//! assert!(!engine.check("selectLimit", &FieldValue::multi(["1"]), Some("2")).unwrap());
//! assert!(engine.check("noSuchRule", &FieldValue::default(), None).is_err());
//! ```

mod builtin;
mod expression;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigError;
use crate::value::FieldValue;

pub use expression::{parse_messages, parse_rules, render_message};

/// Type alias for a check stored in the engine.
pub(crate) type CheckFn =
    Arc<dyn Fn(&FieldValue, Option<&str>) -> Result<bool, ConfigError> + Send + Sync>;

/// Type alias for a parameter check run when a schema is set up.
pub(crate) type ParamCheckFn = Arc<dyn Fn(Option<&str>) -> Result<(), ConfigError> + Send + Sync>;

pub(crate) fn into_check<F>(check: F) -> CheckFn
where
    F: Fn(&FieldValue, Option<&str>) -> Result<bool, ConfigError> + Send + Sync + 'static,
{
    Arc::new(check)
}

fn into_param_check<P>(check: P) -> ParamCheckFn
where
    P: Fn(Option<&str>) -> Result<(), ConfigError> + Send + Sync + 'static,
{
    Arc::new(check)
}

/// One rule of a schema: a rule name, its parameter and its message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// The registered rule name, e.g. `maxLength`.
    pub name: String,
    /// The raw parameter text, e.g. `32` for `maxLength(32)`.
    pub param: Option<String>,
    /// Message template shown when this rule fails.
    pub message: Option<String>,
}

impl Rule {
    /// Creates a rule without parameter or message.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: None,
            message: None,
        }
    }

    /// Sets the parameter and returns self for chaining.
    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Sets the message template and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Renders this rule's message for `value`, if it has one.
    pub fn render_message(&self, value: &FieldValue) -> Option<String> {
        self.message
            .as_deref()
            .map(|template| render_message(template, self.param.as_deref(), value))
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.param {
            Some(ref param) => write!(f, "{}({})", self.name, param),
            None => write!(f, "{}", self.name),
        }
    }
}

/// A registry of named checks.
///
/// `RuleEngine::new()` starts with the built-in rules (`required`, `isEmail`,
/// `isPhone`, `isUrl`, `isDate`, `isNum`, `isInt`, `minLength`, `maxLength`,
/// `greaterThan`, `lessThan`). Custom rules are added with [`register`] and
/// overwrite a built-in of the same name.
///
/// A rule can also carry a parameter check, attached with
/// [`register_param_check`]. It runs when a schema is set up, so a rule used
/// with a missing or unusable parameter is rejected before any field is
/// validated.
///
/// Cloning an engine is cheap; checks are shared.
///
/// [`register`]: RuleEngine::register
/// [`register_param_check`]: RuleEngine::register_param_check
#[derive(Clone)]
pub struct RuleEngine {
    checks: HashMap<String, CheckFn>,
    param_checks: HashMap<String, ParamCheckFn>,
}

impl RuleEngine {
    /// Creates an engine with the built-in rules.
    pub fn new() -> Self {
        let mut engine = Self::empty();
        builtin::install(&mut engine);
        engine
    }

    /// Creates an engine without any rules.
    pub fn empty() -> Self {
        Self {
            checks: HashMap::new(),
            param_checks: HashMap::new(),
        }
    }

    /// Registers a custom rule, replacing any rule with the same name.
    ///
    /// A parameter check attached to the replaced rule is dropped.
    pub fn register<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&FieldValue, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.register_fallible(name, move |value, param| Ok(check(value, param)));
    }

    /// Registers a rule whose check can reject its parameter.
    pub fn register_fallible<F>(&mut self, name: impl Into<String>, check: F)
    where
        F: Fn(&FieldValue, Option<&str>) -> Result<bool, ConfigError> + Send + Sync + 'static,
    {
        let name = name.into();
        self.param_checks.remove(&name);
        self.checks.insert(name, into_check(check));
    }

    /// Attaches a parameter check to the rule `name`.
    ///
    /// The check runs in [`ensure_known`](RuleEngine::ensure_known) for every
    /// schema rule with this name.
    pub fn register_param_check<P>(&mut self, name: impl Into<String>, check: P)
    where
        P: Fn(Option<&str>) -> Result<(), ConfigError> + Send + Sync + 'static,
    {
        self.param_checks.insert(name.into(), into_param_check(check));
    }

    /// Builder form of [`register`](RuleEngine::register).
    pub fn with_rule<F>(mut self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&FieldValue, Option<&str>) -> bool + Send + Sync + 'static,
    {
        self.register(name, check);
        self
    }

    /// Returns true if a rule with this name is registered.
    pub fn has_rule(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Returns the registered rule names, sorted.
    pub fn rule_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.checks.keys().cloned().collect();
        names.sort();
        names
    }

    /// Evaluates the named rule.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` if no rule is registered under
    /// `name`, or the check's own parameter error.
    pub fn check(
        &self,
        name: &str,
        value: &FieldValue,
        param: Option<&str>,
    ) -> Result<bool, ConfigError> {
        let check = self
            .checks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownRule(name.to_string()))?;
        check(value, param)
    }

    /// Evaluates a single [`Rule`].
    pub fn check_rule(&self, rule: &Rule, value: &FieldValue) -> Result<bool, ConfigError> {
        self.check(&rule.name, value, rule.param.as_deref())
    }

    /// Verifies that every rule in `rules` is registered and accepts its
    /// parameter.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` for the first unregistered name, or
    /// the first parameter check error.
    pub fn ensure_known<'a>(
        &self,
        rules: impl IntoIterator<Item = &'a Rule>,
    ) -> Result<(), ConfigError> {
        for rule in rules {
            if !self.has_rule(&rule.name) {
                return Err(ConfigError::UnknownRule(rule.name.clone()));
            }
            if let Some(check) = self.param_checks.get(&rule.name) {
                check(rule.param.as_deref())?;
            }
        }
        Ok(())
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_rule_is_config_error() {
        let engine = RuleEngine::new();
        let result = engine.check("isFoo", &FieldValue::text("x"), None);
        assert_eq!(result, Err(ConfigError::UnknownRule("isFoo".to_string())));
    }

    #[test]
    fn test_empty_engine_has_no_rules() {
        let engine = RuleEngine::empty();
        assert!(!engine.has_rule("required"));
        assert!(engine.rule_names().is_empty());
    }

    #[test]
    fn test_custom_rule_overrides_builtin() {
        let mut engine = RuleEngine::new();
        assert!(!engine.check("required", &FieldValue::default(), None).unwrap());

        engine.register("required", |_, _| true);
        assert!(engine.check("required", &FieldValue::default(), None).unwrap());
    }

    #[test]
    fn test_register_fallible() {
        let mut engine = RuleEngine::empty();
        engine.register_fallible("oddLength", |value, param| match param {
            Some(_) => Err(ConfigError::invalid_param("oddLength", param.unwrap_or(""))),
            None => Ok(value.len() % 2 == 1),
        });

        assert!(engine.check("oddLength", &FieldValue::text("abc"), None).unwrap());
        assert!(engine.check("oddLength", &FieldValue::text("abc"), Some("1")).is_err());
    }

    #[test]
    fn test_ensure_known() {
        let engine = RuleEngine::new();
        let rules = vec![Rule::new("required"), Rule::new("isFoo"), Rule::new("isBar")];
        assert_eq!(
            engine.ensure_known(&rules),
            Err(ConfigError::UnknownRule("isFoo".to_string()))
        );
        assert!(engine.ensure_known(&rules[..1]).is_ok());
    }

    #[test]
    fn test_ensure_known_checks_params() {
        let engine = RuleEngine::new();

        assert_eq!(
            engine.ensure_known(&[Rule::new("maxLength")]),
            Err(ConfigError::missing_param("maxLength"))
        );
        assert_eq!(
            engine.ensure_known(&[Rule::new("greaterThan").with_param("ten")]),
            Err(ConfigError::invalid_param("greaterThan", "ten"))
        );
        assert!(engine
            .ensure_known(&[Rule::new("maxLength").with_param("32"), Rule::new("required")])
            .is_ok());
    }

    #[test]
    fn test_reregister_drops_param_check() {
        let mut engine = RuleEngine::new();
        engine.register("maxLength", |value, _| value.len() <= 8);
        assert!(engine.ensure_known(&[Rule::new("maxLength")]).is_ok());
    }

    #[test]
    fn test_rule_display_and_message() {
        let rule = Rule::new("maxLength")
            .with_param("32")
            .with_message("at most {{param}} characters");
        assert_eq!(rule.to_string(), "maxLength(32)");
        assert_eq!(
            rule.render_message(&FieldValue::text("x")),
            Some("at most 32 characters".to_string())
        );
        assert_eq!(Rule::new("required").render_message(&FieldValue::default()), None);
    }
}
