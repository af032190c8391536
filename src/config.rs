//! Form definitions loaded from JSON.
//!
//! A [`FormConfig`] carries everything needed to build a form: class tokens,
//! initial values and schemas. It is read from a JSON document:
//!
//! ```json
//! {
//!   "classNames": { "static": "form-control", "success": "valid", "error": "invalid" },
//!   "values": { "email": "", "hobby": [] },
//!   "schemas": {
//!     "email": { "rules": "required | isEmail", "messages": "empty | invalid" }
//!   }
//! }
//! ```
//!
//! `rules` and `messages` accept the pipe-delimited string or an array of
//! strings. Every section is optional.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::field::ClassNames;
use crate::form::FormControl;
use crate::rule::{parse_messages, parse_rules, Rule, RuleEngine};
use crate::schema::{Schema, SchemaStore};
use crate::value::FieldValue;
use crate::values::FormValues;

/// Errors that can occur while loading a form definition.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error reading a file.
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, std::io::Error),

    /// The document is not valid JSON.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document is JSON but not a valid form definition.
    #[error("Invalid definition at '{path}': {reason}")]
    Invalid {
        /// Location in the document, e.g. `schemas.email.rules`.
        path: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A rule expression could not be parsed.
    #[error("Invalid rules for '{field}': {source}")]
    Rules {
        /// The field whose schema is broken.
        field: String,
        /// The underlying rule error.
        source: ConfigError,
    },
}

impl LoadError {
    fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        LoadError::Invalid {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// A complete form definition.
#[derive(Debug, Clone, Default)]
pub struct FormConfig {
    /// Presentation class tokens.
    pub class_names: ClassNames,
    /// Initial values, in document order.
    pub values: IndexMap<String, FieldValue>,
    /// Schemas, in document order.
    pub schemas: IndexMap<String, Schema>,
}

impl FormConfig {
    /// Parses a definition from a JSON string.
    ///
    /// # Example
    ///
    /// ```rust
    /// use formcontrol::{FieldValue, FormConfig};
    ///
    /// let config = FormConfig::from_json_str(r#"{
    ///     "values": { "email": "", "hobby": ["1"] },
    ///     "schemas": {
    ///         "email": { "rules": "required | isEmail", "messages": ["empty", "invalid"] }
    ///     }
    /// }"#).unwrap();
    ///
    /// assert_eq!(config.values["hobby"], FieldValue::multi(["1"]));
    /// assert_eq!(config.schemas["email"].len(), 2);
    /// ```
    pub fn from_json_str(content: &str) -> Result<Self, LoadError> {
        let json: Value = serde_json::from_str(content)?;
        Self::from_json(&json)
    }

    /// Reads and parses a definition file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;
        tracing::debug!(path = %path.display(), "loading form definition");
        Self::from_json_str(&content)
    }

    /// Builds a definition from an already parsed JSON document.
    pub fn from_json(json: &Value) -> Result<Self, LoadError> {
        let root = json
            .as_object()
            .ok_or_else(|| LoadError::invalid("(root)", "expected an object"))?;

        Ok(Self {
            class_names: parse_class_names(root.get("classNames"))?,
            values: parse_values(root.get("values"))?,
            schemas: parse_schemas(root.get("schemas"))?,
        })
    }

    /// Returns the schemas as a fresh [`SchemaStore`].
    pub fn schema_store(&self) -> SchemaStore {
        self.schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.clone()))
            .collect()
    }

    /// Returns the initial values as a fresh [`FormValues`].
    pub fn form_values(&self) -> FormValues {
        self.values.clone().into_iter().collect()
    }
}

impl FormControl {
    /// Builds a form from a loaded definition.
    ///
    /// Returns the form together with the [`FormValues`] handle it is bound
    /// to, so the host can read back user edits.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownRule` if a schema names a rule `engine`
    /// does not know, or a parameter error if a rule cannot use its parameter.
    pub fn from_config(
        config: &FormConfig,
        engine: RuleEngine,
    ) -> Result<(Self, FormValues), ConfigError> {
        let values = config.form_values();
        let form = FormControl::new(
            values.clone(),
            config.class_names.clone(),
            config.schema_store(),
            engine,
        )?;
        Ok((form, values))
    }
}

fn object_section<'a>(
    section: Option<&'a Value>,
    path: &str,
) -> Result<Option<&'a Map<String, Value>>, LoadError> {
    match section {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(LoadError::invalid(path, "expected an object")),
    }
}

fn parse_class_names(section: Option<&Value>) -> Result<ClassNames, LoadError> {
    let Some(map) = object_section(section, "classNames")? else {
        return Ok(ClassNames::default());
    };

    let token = |key: &str| -> Result<String, LoadError> {
        match map.get(key) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            Some(_) => Err(LoadError::invalid(
                format!("classNames.{}", key),
                "expected a string",
            )),
        }
    };

    Ok(ClassNames::new(token("static")?, token("success")?, token("error")?))
}

fn parse_values(section: Option<&Value>) -> Result<IndexMap<String, FieldValue>, LoadError> {
    let Some(map) = object_section(section, "values")? else {
        return Ok(IndexMap::new());
    };

    map.iter()
        .map(|(name, value)| {
            FieldValue::from_json(value)
                .map(|value| (name.clone(), value))
                .ok_or_else(|| {
                    LoadError::invalid(
                        format!("values.{}", name),
                        "expected a string or an array of strings",
                    )
                })
        })
        .collect()
}

fn parse_schemas(section: Option<&Value>) -> Result<IndexMap<String, Schema>, LoadError> {
    let Some(map) = object_section(section, "schemas")? else {
        return Ok(IndexMap::new());
    };

    map.iter()
        .map(|(name, definition)| parse_schema(name, definition).map(|s| (name.clone(), s)))
        .collect()
}

fn parse_schema(name: &str, definition: &Value) -> Result<Schema, LoadError> {
    let path = format!("schemas.{}", name);
    let definition = definition
        .as_object()
        .ok_or_else(|| LoadError::invalid(path.as_str(), "expected an object"))?;

    let rules = match definition.get("rules") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(expression)) => parse_rules(expression).map_err(|source| LoadError::Rules {
            field: name.to_string(),
            source,
        })?,
        Some(Value::Array(items)) => {
            let mut rules: Vec<Rule> = Vec::new();
            for item in items {
                let segment = item.as_str().ok_or_else(|| {
                    LoadError::invalid(format!("{}.rules", path), "expected strings")
                })?;
                let parsed = parse_rules(segment).map_err(|source| LoadError::Rules {
                    field: name.to_string(),
                    source,
                })?;
                rules.extend(parsed);
            }
            rules
        }
        Some(_) => {
            return Err(LoadError::invalid(
                format!("{}.rules", path),
                "expected a string or an array of strings",
            ))
        }
    };

    let messages = match definition.get("messages") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::String(messages)) => parse_messages(messages),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Null => Ok(None),
                Value::String(s) if s.trim().is_empty() => Ok(None),
                Value::String(s) => Ok(Some(s.trim().to_string())),
                _ => Err(LoadError::invalid(
                    format!("{}.messages", path),
                    "expected strings",
                )),
            })
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(LoadError::invalid(
                format!("{}.messages", path),
                "expected a string or an array of strings",
            ))
        }
    };

    Ok(Schema::from_parts(rules, messages))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_definition() {
        let config = FormConfig::from_json(&json!({
            "classNames": { "static": "form-control", "success": "valid", "error": "invalid" },
            "values": { "email": "", "hobby": [] },
            "schemas": {
                "email": { "rules": "required | isEmail | maxLength(32)",
                           "messages": "empty | invalid | at most {{param}}" },
                "hobby": { "rules": ["required", "minLength(2)"] }
            }
        }))
        .unwrap();

        assert_eq!(config.class_names, ClassNames::new("form-control", "valid", "invalid"));
        assert_eq!(config.values.keys().collect::<Vec<_>>(), vec!["email", "hobby"]);
        assert_eq!(config.values["hobby"], FieldValue::Multi(vec![]));

        let email = &config.schemas["email"];
        assert_eq!(email.rules()[2].param.as_deref(), Some("32"));
        assert_eq!(email.rules()[2].message.as_deref(), Some("at most {{param}}"));

        let hobby = &config.schemas["hobby"];
        assert_eq!(hobby.len(), 2);
        assert!(hobby.rules().iter().all(|r| r.message.is_none()));
    }

    #[test]
    fn test_document_order_is_kept() {
        let config = FormConfig::from_json_str(
            r#"{
                "values": { "zeta": "", "alpha": "", "mid": "" },
                "schemas": {
                    "zeta": { "rules": "required" },
                    "alpha": { "rules": "required" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.values.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(config.schemas.keys().collect::<Vec<_>>(), vec!["zeta", "alpha"]);

        let (mut form, _) = FormControl::from_config(&config, RuleEngine::new()).unwrap();
        let errors = form.validate_report().unwrap().into_result().unwrap_err();
        let failed: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(failed, vec!["zeta", "alpha"]);
        assert_eq!(form.fields().keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_empty_document() {
        let config = FormConfig::from_json_str("{}").unwrap();
        assert!(config.values.is_empty());
        assert!(config.schemas.is_empty());
        assert_eq!(config.class_names, ClassNames::default());
    }

    #[test]
    fn test_message_array_keeps_gaps() {
        let config = FormConfig::from_json(&json!({
            "schemas": {
                "x": { "rules": "required | isInt", "messages": [null, "not a number"] }
            }
        }))
        .unwrap();

        let rules = config.schemas["x"].rules();
        assert_eq!(rules[0].message, None);
        assert_eq!(rules[1].message.as_deref(), Some("not a number"));
    }

    #[test]
    fn test_invalid_sections() {
        let err = FormConfig::from_json(&json!([])).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "(root)"));

        let err = FormConfig::from_json(&json!({ "values": { "a": { "b": 1 } } })).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "values.a"));

        let err = FormConfig::from_json(&json!({ "classNames": { "static": 1 } })).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "classNames.static"));

        let err =
            FormConfig::from_json(&json!({ "schemas": { "a": { "rules": 3 } } })).unwrap_err();
        assert!(matches!(err, LoadError::Invalid { ref path, .. } if path == "schemas.a.rules"));
    }

    #[test]
    fn test_malformed_rules() {
        let err = FormConfig::from_json(&json!({
            "schemas": { "a": { "rules": "required || isEmail" } }
        }))
        .unwrap_err();
        assert!(matches!(err, LoadError::Rules { ref field, .. } if field == "a"));
    }

    #[test]
    fn test_parse_error() {
        let err = FormConfig::from_json_str("not json").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = FormConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, LoadError::Io(_, _)));
    }

    #[test]
    fn test_from_config_binds_values() {
        let config = FormConfig::from_json(&json!({
            "values": { "email": "" },
            "schemas": { "email": { "rules": "required", "messages": "empty" } }
        }))
        .unwrap();

        let (mut form, values) = FormControl::from_config(&config, RuleEngine::new()).unwrap();
        assert!(!form.validate().unwrap());
        assert_eq!(form.field("email").unwrap().message.as_deref(), Some("empty"));

        values.set("email", FieldValue::text("x"));
        assert_eq!(form.sync_values().unwrap(), vec!["email"]);
        assert!(form.is_all_valid());
    }

    #[test]
    fn test_from_config_rejects_unknown_rule() {
        let config = FormConfig::from_json(&json!({
            "schemas": { "email": { "rules": "isFoo" } }
        }))
        .unwrap();

        let result = FormControl::from_config(&config, RuleEngine::new());
        assert!(matches!(result, Err(ConfigError::UnknownRule(_))));
    }
}
