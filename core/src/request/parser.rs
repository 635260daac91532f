use crate::errors::{codes, ScoringError};
use serde_json::{Map, Value as JsonValue};

/// Largest request body accepted (10MB).
pub const MAX_BODY_SIZE: usize = 10_485_760;

pub fn validate_body_size(data: &[u8]) -> Result<(), ScoringError> {
    if data.len() > MAX_BODY_SIZE {
        Err(ScoringError::validation(
            codes::BODY_TOO_LARGE,
            format!("Body size {} exceeds limit {}", data.len(), MAX_BODY_SIZE),
        ))
    } else {
        Ok(())
    }
}

pub fn parse_json_body(data: &[u8]) -> Result<JsonValue, ScoringError> {
    validate_body_size(data)?;
    serde_json::from_slice(data)
        .map_err(|e| ScoringError::validation(codes::INVALID_JSON, format!("Invalid JSON: {}", e)))
}

/// Parse a request body that must hold a JSON object.
pub fn parse_envelope(data: &[u8]) -> Result<Map<String, JsonValue>, ScoringError> {
    match parse_json_body(data)? {
        JsonValue::Object(map) => Ok(map),
        other => Err(ScoringError::validation(
            codes::INVALID_ENVELOPE,
            format!("Expected JSON object, got {}", json_type_name(&other)),
        )),
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_body_valid() {
        let json_data = br#"{"login": "h&f", "arguments": {}}"#;
        let result = parse_json_body(json_data).unwrap();
        assert_eq!(result["login"], "h&f");
        assert!(result["arguments"].is_object());
    }

    #[test]
    fn test_parse_json_body_invalid() {
        let json_data = br#"{"login": "h&f", invalid}"#;
        let result = parse_json_body(json_data);
        assert!(matches!(
            result,
            Err(ScoringError::Validation { ref code, .. }) if code == codes::INVALID_JSON
        ));
        assert_eq!(result.unwrap_err().status(), 400);
    }

    #[test]
    fn test_parse_envelope_empty_object() {
        let envelope = parse_envelope(b"{}").unwrap();
        assert!(envelope.is_empty());
    }

    #[test]
    fn test_parse_envelope_rejects_non_object() {
        let bodies: [&[u8]; 4] = [b"[1, 2]", b"\"text\"", b"42", b"null"];
        for body in bodies {
            let err = parse_envelope(body).unwrap_err();
            assert_eq!(err.status(), 400);
        }
    }

    #[test]
    fn test_body_size_limit() {
        assert!(validate_body_size(&vec![b' '; MAX_BODY_SIZE]).is_ok());

        let err = parse_json_body(&vec![b' '; MAX_BODY_SIZE + 1]).unwrap_err();
        assert_eq!(err.status(), 400);
        assert!(err.to_string().contains(codes::BODY_TOO_LARGE));
    }

    #[test]
    fn test_parse_envelope_rejects_empty_body() {
        assert_eq!(parse_envelope(b"").unwrap_err().status(), 400);
    }
}
