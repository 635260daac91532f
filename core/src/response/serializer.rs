use crate::errors::ScoringError;
use crate::response::types::HttpResponse;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;

pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const FORBIDDEN: u16 = 403;
pub const NOT_FOUND: u16 = 404;
pub const INVALID_REQUEST: u16 = 422;
pub const INTERNAL_ERROR: u16 = 500;

const FALLBACK: &[u8] = b"{\"error\":\"Internal Server Error\",\"code\":500}";

/// Reason phrase used when an error carries no payload of its own.
pub fn default_reason(status: u16) -> Option<&'static str> {
    match status {
        BAD_REQUEST => Some("Bad Request"),
        FORBIDDEN => Some("Forbidden"),
        NOT_FOUND => Some("Not Found"),
        INVALID_REQUEST => Some("Invalid Request"),
        INTERNAL_ERROR => Some("Internal Server Error"),
        _ => None,
    }
}

fn is_blank(payload: &JsonValue) -> bool {
    match payload {
        JsonValue::Null => true,
        JsonValue::String(text) => text.is_empty(),
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// `{"response": ..., "code"}` for success statuses, `{"error": ..., "code"}` otherwise.
///
/// Blank error payloads are replaced by the status reason phrase.
pub fn envelope(status: u16, payload: JsonValue) -> JsonValue {
    match default_reason(status) {
        None => json!({"response": payload, "code": status}),
        Some(reason) => {
            let error = if is_blank(&payload) {
                JsonValue::String(reason.to_string())
            } else {
                payload
            };
            json!({"error": error, "code": status})
        }
    }
}

/// Client-facing error payload. Server-side failures never expose details.
pub fn error_payload(err: &ScoringError) -> JsonValue {
    match err {
        ScoringError::InvalidFields { errors } => JsonValue::Object(
            errors
                .iter()
                .map(|(name, message)| (name.clone(), JsonValue::String(message.clone())))
                .collect(),
        ),
        ScoringError::Validation { message, .. } if err.status() == INVALID_REQUEST => {
            JsonValue::String(message.clone())
        }
        _ => JsonValue::Null,
    }
}

pub fn serialize_json_response(value: &JsonValue) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_else(|_| FALLBACK.to_vec())
}

pub fn create_response(status: u16, body: JsonValue) -> HttpResponse {
    let mut headers = HashMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());

    HttpResponse {
        status_code: status,
        headers,
        body,
    }
}

pub fn success_response(payload: JsonValue) -> HttpResponse {
    create_response(OK, envelope(OK, payload))
}

pub fn error_response(err: &ScoringError) -> HttpResponse {
    let status = err.status();
    create_response(status, envelope(status, error_payload(err)))
}
