//! Rule and message surface syntax.
//!
//! Rules are written as a pipe-delimited list of `name` or `name(param)`
//! segments, e.g. `required | isEmail | maxLength(32)`. Messages are a
//! pipe-delimited list aligned by position with the rules, and may use the
//! placeholders `{{param}}` and `{{value}}`.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::value::FieldValue;

use super::Rule;

static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*(?:\((.*)\))?$").expect("valid rule segment regex")
});

const PARAM_PLACEHOLDER: &str = "{{param}}";
const VALUE_PLACEHOLDER: &str = "{{value}}";

/// Parses a rule expression into rules without messages.
///
/// Whitespace around segments and parameters is ignored. An empty expression
/// yields no rules.
///
/// # Errors
///
/// Returns `ConfigError::MalformedRule` for a segment that is empty or not of
/// the form `name` / `name(param)`.
///
/// # Example
///
/// ```rust
/// use formcontrol::rule::parse_rules;
///
/// let rules = parse_rules("required | maxLength(32)").unwrap();
/// assert_eq!(rules[0].name, "required");
/// assert_eq!(rules[1].param.as_deref(), Some("32"));
///
/// assert!(parse_rules("required || isEmail").is_err());
/// ```
pub fn parse_rules(expression: &str) -> Result<Vec<Rule>, ConfigError> {
    if expression.trim().is_empty() {
        return Ok(Vec::new());
    }

    expression.split('|').map(parse_segment).collect()
}

fn parse_segment(segment: &str) -> Result<Rule, ConfigError> {
    let segment = segment.trim();
    let caps = SEGMENT_REGEX
        .captures(segment)
        .ok_or_else(|| ConfigError::MalformedRule(segment.to_string()))?;

    let rule = Rule::new(&caps[1]);
    match caps.get(2).map(|m| m.as_str().trim()) {
        Some(param) if !param.is_empty() => Ok(rule.with_param(param)),
        _ => Ok(rule),
    }
}

/// Splits a pipe-delimited message list.
///
/// Each message is trimmed; a blank entry stays in place as `None` so later
/// messages keep their alignment.
pub fn parse_messages(messages: &str) -> Vec<Option<String>> {
    if messages.trim().is_empty() {
        return Vec::new();
    }

    messages
        .split('|')
        .map(str::trim)
        .map(|m| (!m.is_empty()).then(|| m.to_string()))
        .collect()
}

/// Fills the `{{param}}` and `{{value}}` placeholders of a message template.
///
/// A missing parameter renders as an empty string; multi values render as
/// their items joined with `,`.
pub fn render_message(template: &str, param: Option<&str>, value: &FieldValue) -> String {
    template
        .replace(PARAM_PLACEHOLDER, param.unwrap_or(""))
        .replace(VALUE_PLACEHOLDER, &value.to_string())
}
