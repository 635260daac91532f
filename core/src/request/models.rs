//! # REQUEST MODELS
//!
//! Typed views of the envelope and of the two method payloads. Each model owns
//! a schema built once per process; construction validates and never mutates
//! afterwards.

use crate::errors::ScoringError;
use crate::validation::fields::DATE_FORMAT;
use crate::validation::{Field, Schema, ValidationResult, Validator};
use chrono::NaiveDate;
use serde_json::{Map, Value as JsonValue};
use std::sync::OnceLock;

pub const ADMIN_LOGIN: &str = "admin";

/// Message reported when no field pair of an online score request is complete.
pub const PAIRS_REQUIRED: &str = "At least one pair of fields must be not empty: \
(phone, email), (first_name, last_name), (gender, birthday)";

/// Key the cross-field failure is reported under in the error payload. It is
/// not a field name, so it never collides with an envelope field error.
pub const PAIRS_ERROR_KEY: &str = "non_field_errors";

pub fn is_admin(login: &str) -> bool {
    login == ADMIN_LOGIN
}

fn invalid(result: ValidationResult) -> ScoringError {
    ScoringError::InvalidFields {
        errors: result.errors,
    }
}

fn owned_str(result: &ValidationResult, name: &str) -> Option<String> {
    result.get_str(name).map(str::to_string)
}

fn parse_date(result: &ValidationResult, name: &str) -> Option<NaiveDate> {
    result
        .get_str(name)
        .and_then(|text| NaiveDate::parse_from_str(text, DATE_FORMAT).ok())
}

// ================================================================================================
// METHOD REQUEST - the envelope
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MethodRequest {
    pub account: Option<String>,
    pub login: String,
    pub token: String,
    pub method: String,
    pub arguments: Map<String, JsonValue>,
}

impl MethodRequest {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder()
                .field("account", Field::char().nullable())
                .field("login", Field::char().required().nullable())
                .field("token", Field::char().required().nullable())
                .field("arguments", Field::arguments().required().nullable())
                .field("method", Field::char().required())
                .build()
        })
    }

    pub fn from_value(input: &JsonValue) -> Result<Self, ScoringError> {
        let result = Self::schema().validate(Some(input));
        if !result.is_valid() {
            return Err(invalid(result));
        }

        Ok(Self {
            account: owned_str(&result, "account"),
            login: owned_str(&result, "login").unwrap_or_default(),
            token: owned_str(&result, "token").unwrap_or_default(),
            method: owned_str(&result, "method").unwrap_or_default(),
            arguments: result
                .get("arguments")
                .and_then(JsonValue::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }

    /// Recomputed from `login` on every call.
    pub fn is_admin(&self) -> bool {
        is_admin(&self.login)
    }
}

// ================================================================================================
// ONLINE SCORE REQUEST
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OnlineScoreRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<u64>,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<u8>,
    present: Vec<String>,
}

impl OnlineScoreRequest {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder()
                .field("first_name", Field::char().nullable())
                .field("last_name", Field::char().nullable())
                .field("email", Field::email().nullable())
                .field("phone", Field::phone().nullable())
                .field("birthday", Field::birthday().nullable())
                .field("gender", Field::gender().nullable())
                .build()
        })
    }

    /// Per-field validation only; see [`OnlineScoreRequest::validate_logic`].
    pub fn from_value(input: &JsonValue) -> Result<Self, ScoringError> {
        Self::from_result(Self::schema().validate(Some(input)))
    }

    pub fn from_result(result: ValidationResult) -> Result<Self, ScoringError> {
        if !result.is_valid() {
            return Err(invalid(result));
        }

        Ok(Self {
            first_name: owned_str(&result, "first_name"),
            last_name: owned_str(&result, "last_name"),
            email: owned_str(&result, "email"),
            phone: result.get("phone").and_then(JsonValue::as_u64),
            birthday: parse_date(&result, "birthday"),
            gender: result
                .get_i64("gender")
                .and_then(|gender| u8::try_from(gender).ok()),
            present: result.present_fields(),
        })
    }

    /// Cross-field rule: at least one of the pairs (phone, email),
    /// (first_name, last_name), (gender, birthday) is fully populated.
    pub fn validate_logic(&self) -> Result<(), ScoringError> {
        let complete = (self.phone.is_some() && self.email.is_some())
            || (self.first_name.is_some() && self.last_name.is_some())
            || (self.gender.is_some() && self.birthday.is_some());
        if complete {
            return Ok(());
        }

        let mut errors = indexmap::IndexMap::new();
        errors.insert(PAIRS_ERROR_KEY.to_string(), PAIRS_REQUIRED.to_string());
        Err(ScoringError::InvalidFields { errors })
    }

    /// Names of the arguments that carried a non-null value.
    pub fn present_fields(&self) -> &[String] {
        &self.present
    }
}

// ================================================================================================
// CLIENTS INTERESTS REQUEST
// ================================================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ClientsInterestsRequest {
    pub client_ids: Vec<i64>,
    pub date: Option<NaiveDate>,
}

impl ClientsInterestsRequest {
    pub fn schema() -> &'static Schema {
        static SCHEMA: OnceLock<Schema> = OnceLock::new();
        SCHEMA.get_or_init(|| {
            Schema::builder()
                .field("client_ids", Field::client_ids().required())
                .field("date", Field::date().nullable())
                .build()
        })
    }

    pub fn from_value(input: &JsonValue) -> Result<Self, ScoringError> {
        let result = Self::schema().validate(Some(input));
        if !result.is_valid() {
            return Err(invalid(result));
        }

        Ok(Self {
            client_ids: result
                .get("client_ids")
                .and_then(JsonValue::as_array)
                .map(|ids| ids.iter().filter_map(JsonValue::as_i64).collect())
                .unwrap_or_default(),
            date: parse_date(&result, "date"),
        })
    }
}
