//! Configuration errors raised by rule parsing and evaluation.

/// A configuration problem: the schema and the rule engine disagree.
///
/// These never describe bad user input. They indicate that a schema names a
/// rule the engine does not know, passes a parameter the rule cannot use, or
/// that the caller asked to validate a field that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A schema references a rule that is not registered in the engine.
    #[error("unknown rule '{0}'")]
    UnknownRule(String),

    /// A rule that needs a parameter was used without one.
    #[error("rule '{rule}' requires a parameter")]
    MissingParam {
        /// The rule name.
        rule: String,
    },

    /// A rule parameter could not be interpreted.
    #[error("rule '{rule}' cannot use parameter '{param}'")]
    InvalidParam {
        /// The rule name.
        rule: String,
        /// The offending parameter text.
        param: String,
    },

    /// A rule expression segment is not of the form `name` or `name(param)`.
    #[error("malformed rule expression '{0}'")]
    MalformedRule(String),

    /// A named validation pass referenced a field that has no state.
    #[error("field '{0}' does not exist")]
    UnknownField(String),
}

impl ConfigError {
    pub(crate) fn invalid_param(rule: &str, param: &str) -> Self {
        ConfigError::InvalidParam {
            rule: rule.to_string(),
            param: param.to_string(),
        }
    }

    pub(crate) fn missing_param(rule: &str) -> Self {
        ConfigError::MissingParam {
            rule: rule.to_string(),
        }
    }
}
