//! Built-in rules.
//!
//! Every built-in is a plain function over a [`FieldValue`] and the rule's
//! parameter text. Format checks (`isEmail`, `isUrl`, ...) only accept scalar
//! values; a multi value never matches a format.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ConfigError;
use crate::value::FieldValue;

use super::RuleEngine;

static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));
static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[\d\s\-()]{7,20}$").expect("valid phone regex"));
static URL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://[^\s/$.?#][^\s]*$").expect("valid url regex"));
static DATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("valid date regex"));
static NUM_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid number regex"));
static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+$").expect("valid integer regex"));

/// Installs every built-in rule into `engine`.
pub(super) fn install(engine: &mut RuleEngine) {
    engine.register("required", |value, _| required(value));
    engine.register("isEmail", |value, _| matches_text(&EMAIL_REGEX, value));
    engine.register("isPhone", |value, _| matches_text(&PHONE_REGEX, value));
    engine.register("isUrl", |value, _| matches_text(&URL_REGEX, value));
    engine.register("isDate", |value, _| is_date(value));
    engine.register("isNum", |value, _| matches_text(&NUM_REGEX, value));
    engine.register("isInt", |value, _| matches_text(&INT_REGEX, value));
    engine.register_fallible("minLength", |value, param| {
        Ok(value.len() >= length_param("minLength", param)?)
    });
    engine.register_fallible("maxLength", |value, param| {
        Ok(value.len() <= length_param("maxLength", param)?)
    });
    engine.register_fallible("greaterThan", |value, param| {
        let bound = number_param("greaterThan", param)?;
        Ok(as_number(value).is_some_and(|n| n > bound))
    });
    engine.register_fallible("lessThan", |value, param| {
        let bound = number_param("lessThan", param)?;
        Ok(as_number(value).is_some_and(|n| n < bound))
    });

    for rule in ["minLength", "maxLength"] {
        engine.register_param_check(rule, move |param| length_param(rule, param).map(|_| ()));
    }
    for rule in ["greaterThan", "lessThan"] {
        engine.register_param_check(rule, move |param| number_param(rule, param).map(|_| ()));
    }
}

/// Non-blank text, or at least one selected item.
fn required(value: &FieldValue) -> bool {
    match value {
        FieldValue::Text(s) => !s.trim().is_empty(),
        FieldValue::Multi(items) => !items.is_empty(),
    }
}

fn matches_text(regex: &Regex, value: &FieldValue) -> bool {
    value.as_text().is_some_and(|s| regex.is_match(s))
}

/// `YYYY-MM-DD` naming a real calendar day.
fn is_date(value: &FieldValue) -> bool {
    let Some(caps) = value.as_text().and_then(|s| DATE_REGEX.captures(s)) else {
        return false;
    };
    let part = |i: usize| caps[i].parse::<u32>().unwrap_or(0);
    let (year, month, day) = (part(1), part(2), part(3));

    let days_in_month = match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => return false,
    };
    (1..=days_in_month).contains(&day)
}

fn is_leap_year(year: u32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn as_number(value: &FieldValue) -> Option<f64> {
    value
        .as_text()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|n| n.is_finite())
}

fn length_param(rule: &str, param: Option<&str>) -> Result<usize, ConfigError> {
    let param = param.ok_or_else(|| ConfigError::missing_param(rule))?;
    param
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_param(rule, param))
}

fn number_param(rule: &str, param: Option<&str>) -> Result<f64, ConfigError> {
    let param = param.ok_or_else(|| ConfigError::missing_param(rule))?;
    param
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ConfigError::invalid_param(rule, param))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> RuleEngine {
        RuleEngine::new()
    }

    fn passes(rule: &str, value: impl Into<FieldValue>, param: Option<&str>) -> bool {
        engine().check(rule, &value.into(), param).unwrap()
    }

    #[test]
    fn test_required() {
        assert!(passes("required", "x", None));
        assert!(!passes("required", "", None));
        assert!(!passes("required", "   ", None));
        assert!(passes("required", vec!["1"], None));
        assert!(!passes("required", FieldValue::Multi(vec![]), None));
    }

    #[test]
    fn test_is_email() {
        assert!(passes("isEmail", "a@b.com", None));
        assert!(!passes("isEmail", "not-an-email", None));
        assert!(!passes("isEmail", "", None));
        assert!(!passes("isEmail", "a b@c.com", None));
        assert!(!passes("isEmail", vec!["a@b.com"], None));
    }

    #[test]
    fn test_is_phone() {
        assert!(passes("isPhone", "+1 (555) 010-9999", None));
        assert!(passes("isPhone", "13800138000", None));
        assert!(!passes("isPhone", "12ab", None));
        assert!(!passes("isPhone", "123", None));
    }

    #[test]
    fn test_is_url() {
        assert!(passes("isUrl", "https://example.com/path", None));
        assert!(passes("isUrl", "http://localhost:8080", None));
        assert!(!passes("isUrl", "ftp://example.com", None));
        assert!(!passes("isUrl", "example.com", None));
    }

    #[test]
    fn test_is_date() {
        assert!(passes("isDate", "2016-12-23", None));
        assert!(passes("isDate", "2024-02-29", None));
        assert!(!passes("isDate", "2023-02-29", None));
        assert!(passes("isDate", "2000-02-29", None));
        assert!(!passes("isDate", "1900-02-29", None));
        assert!(!passes("isDate", "2016-13-01", None));
        assert!(!passes("isDate", "2016-04-31", None));
        assert!(!passes("isDate", "2016-00-10", None));
        assert!(!passes("isDate", "23/12/2016", None));
    }

    #[test]
    fn test_numeric_formats() {
        assert!(passes("isNum", "3.14", None));
        assert!(passes("isNum", "-2", None));
        assert!(!passes("isNum", "1e3", None));
        assert!(passes("isInt", "42", None));
        assert!(!passes("isInt", "4.2", None));
    }

    #[test]
    fn test_length_rules() {
        assert!(passes("minLength", "hello", Some("5")));
        assert!(!passes("minLength", "hi", Some("5")));
        assert!(passes("maxLength", "hello", Some("5")));
        assert!(!passes("maxLength", "hello!", Some("5")));
        assert!(passes("maxLength", "日本語", Some("3")));
        assert!(passes("minLength", vec!["1", "2"], Some("2")));
        assert!(!passes("maxLength", vec!["1", "2"], Some("1")));
    }

    #[test]
    fn test_length_rule_param_errors() {
        let result = engine().check("maxLength", &FieldValue::text("x"), None);
        assert_eq!(result, Err(ConfigError::missing_param("maxLength")));

        let result = engine().check("maxLength", &FieldValue::text("x"), Some("ten"));
        assert_eq!(result, Err(ConfigError::invalid_param("maxLength", "ten")));
    }

    #[test]
    fn test_compare_rules() {
        assert!(passes("greaterThan", "10", Some("5")));
        assert!(!passes("greaterThan", "5", Some("5")));
        assert!(passes("lessThan", "4.5", Some("5")));
        assert!(!passes("lessThan", "abc", Some("5")));

        let result = engine().check("lessThan", &FieldValue::text("1"), Some("x"));
        assert!(result.is_err());
    }
}
