//! Error types for form validation.
//!
//! Two kinds of problems are kept apart here:
//! - [`FieldError`]/[`FieldErrors`]: a user-facing rule failure on a field. These
//!   are data, recorded into field state, and never abort an operation.
//! - [`ConfigError`]: a schema/engine mismatch such as an unknown rule name.
//!   These are returned as `Err` so host code can fail fast during setup.

mod config_error;
mod field_error;

pub use config_error::ConfigError;
pub use field_error::{FieldError, FieldErrors};
