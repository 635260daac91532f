//! # SCORING VALIDATION MODULE
//!
//! **DECLARATIVE FIELD/SCHEMA VALIDATION FOR INCOMING REQUESTS**
//!
//! This module provides the `Validator` trait, the `Field` primitive with its
//! typed kinds, and the `Schema` builder that applies an ordered list of fields
//! to a raw JSON mapping.
//!
//! ## VALIDATION PIPELINE
//!
//! 1. **PRESENCE** - absent/null values fail only when the field is required
//! 2. **EMPTINESS** - `""`, `[]`, `{}` fail unless the field is nullable
//! 3. **KIND RULE** - type/shape predicate of the concrete field kind
//! 4. **AGGREGATION** - every field of a schema is checked, errors are collected
//!
//! ## USAGE
//!
//! ```rust
//! use scoring::validation::{Field, Schema, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::builder()
//!     .field("email", Field::email().required())
//!     .build();
//! let result = schema.validate(Some(&json!({"email": "user@example.com"})));
//! assert!(result.is_valid());
//! ```

use indexmap::IndexMap;
use serde_json::Value as JsonValue;
use std::fmt;

pub mod fields;
pub mod schema;

pub use fields::{Field, FieldKind};
pub use schema::{Schema, SchemaBuilder};

/// **CORE VALIDATOR TRAIT**
///
/// Implemented by single fields and by whole schemas. The input is the raw,
/// possibly absent JSON value; `None` and `Some(Null)` are treated alike.
///
/// **GUARANTEE**: MUST NOT panic and MUST NOT keep state between calls.
pub trait Validator {
    /// **OUTPUT TYPE** - cleaned value or aggregated report
    type Output;

    fn validate(&self, input: Option<&JsonValue>) -> Self::Output;
}

/// Reason a single field was rejected. Only the first failing check is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError(String);

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for FieldError {}

/// **SCHEMA VALIDATION REPORT**
///
/// `cleaned` holds every declared field (null when absent) that passed,
/// `errors` holds the message of every field that failed. Both keep the
/// schema's declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub cleaned: IndexMap<String, JsonValue>,
    pub errors: IndexMap<String, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Cleaned value, `None` when absent, null, or rejected.
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        self.cleaned.get(name).filter(|value| !value.is_null())
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(JsonValue::as_str)
    }

    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(JsonValue::as_i64)
    }

    /// Names of cleaned fields holding a non-null value, in declaration order.
    pub fn present_fields(&self) -> Vec<String> {
        self.cleaned
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Field errors as a JSON object for the error envelope.
    pub fn errors_json(&self) -> JsonValue {
        JsonValue::Object(
            self.errors
                .iter()
                .map(|(name, message)| (name.clone(), JsonValue::String(message.clone())))
                .collect(),
        )
    }
}

/// **VALIDATION MESSAGES**
///
/// **MANDATE**: Field kinds report with these texts so clients see stable wording.
pub mod messages {
    pub const REQUIRED: &str = "field is required";
    pub const EMPTY: &str = "field can't be empty";
    pub const NOT_STRING: &str = "must be a string";
    pub const NOT_MAP: &str = "must be a dictionary";
    pub const NO_AT_SIGN: &str = "must contain '@'";
    pub const PHONE_NOT_DIGITS: &str = "phone must be digits only";
    pub const PHONE_WRONG_TYPE: &str = "phone must be a string or an integer";
    pub const PHONE_FORMAT: &str = "phone must start with 7 and be 11 digits";
    pub const DATE_FORMAT: &str = "invalid date format, expected DD.MM.YYYY";
    pub const BIRTHDAY_TOO_OLD: &str = "birthday must be less than 70 years ago";
    pub const GENDER: &str = "gender must be 0, 1, or 2";
    pub const NOT_LIST: &str = "must be a list";
    pub const EMPTY_LIST: &str = "list must not be empty";
    pub const NOT_INT_ITEMS: &str = "all items must be int";
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validation_result_default_is_valid() {
        let result = ValidationResult::default();
        assert!(result.is_valid());
        assert!(result.present_fields().is_empty());
    }

    #[test]
    fn test_validation_result_accessors_skip_null() {
        let mut result = ValidationResult::default();
        result.cleaned.insert("login".to_string(), json!("h&f"));
        result.cleaned.insert("account".to_string(), JsonValue::Null);
        result.cleaned.insert("gender".to_string(), json!(1));

        assert_eq!(result.get_str("login"), Some("h&f"));
        assert_eq!(result.get("account"), None);
        assert_eq!(result.get_i64("gender"), Some(1));
        assert_eq!(result.present_fields(), vec!["login", "gender"]);
    }

    #[test]
    fn test_errors_json_keeps_every_field() {
        let mut result = ValidationResult::default();
        result.errors.insert("login".to_string(), messages::REQUIRED.to_string());
        result.errors.insert("method".to_string(), messages::EMPTY.to_string());

        assert!(!result.is_valid());
        assert_eq!(
            result.errors_json(),
            json!({"login": "field is required", "method": "field can't be empty"})
        );
    }
}
