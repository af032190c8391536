//! # Formcontrol
//!
//! A form-validation binding: named fields, per-field rule schemas, live
//! validity state and presentation class names, kept in sync with a host-owned
//! value source.
//!
//! ## Overview
//!
//! A form is created from the host's values, a set of class tokens and a set
//! of schemas. Every change reported by an input is normalised into a new
//! field value, checked against the field's schema, and written back into the
//! host's values. After each update, subscribed presenters receive a fresh
//! snapshot of every field along with the form-wide validity.
//!
//! Single-field validation stops at the first failing rule. Form-wide
//! reports accumulate one error per invalid field through stillwater's
//! `Validation` type.
//!
//! ## Core Types
//!
//! - [`FormControl`]: The controller tying fields, schemas and values together
//! - [`Schema`]: An ordered list of rules with parameters and messages
//! - [`RuleEngine`]: The registry of named rule predicates
//! - [`FieldState`]: Value, validity, classes and message of one field
//! - [`FieldErrors`]: A non-empty collection of per-field failures
//! - [`FormConfig`]: A complete form definition loaded from JSON
//!
//! ## Example
//!
//! ```rust
//! use formcontrol::{ChangeEvent, ClassNames, FieldValue, FormControl, FormValues};
//! use formcontrol::{RuleEngine, Schema, SchemaStore, Validity};
//!
//! let values = FormValues::from_iter([("email", FieldValue::text(""))]);
//! let schemas = SchemaStore::new();
//! schemas.add_schemas([(
//!     "email",
//!     Schema::parse("required | isEmail", "Email is required | Email is invalid").unwrap(),
//! )]);
//!
//! let mut form = FormControl::new(
//!     values,
//!     ClassNames::new("form-control", "is-valid", "is-invalid"),
//!     schemas,
//!     RuleEngine::new(),
//! )
//! .unwrap();
//!
//! form.handle_change(&ChangeEvent::single("email", "not-an-email")).unwrap();
//! let email = form.field("email").unwrap();
//! assert_eq!(email.validity, Validity::Invalid);
//! assert_eq!(email.message.as_deref(), Some("Email is invalid"));
//! assert_eq!(email.class_string(), "form-control is-invalid");
//! ```

pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod field;
pub mod form;
pub mod rule;
pub mod schema;
pub mod value;
pub mod values;

pub use config::{FormConfig, LoadError};
pub use coordinator::ValidationCoordinator;
pub use dispatch::{ChangeDispatcher, ChangeEvent, InputKind};
pub use error::{ConfigError, FieldError, FieldErrors};
pub use field::{ClassNames, FieldPatch, FieldSnapshot, FieldState, FieldStateStore, Validity};
pub use form::{FormControl, FormSnapshot};
pub use rule::{Rule, RuleEngine};
pub use schema::{Schema, SchemaStore};
pub use value::FieldValue;
pub use values::FormValues;

/// Type alias for form-wide validation results using FieldErrors
pub type ValidationResult<T> = stillwater::Validation<T, FieldErrors>;
