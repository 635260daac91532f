use indexmap::IndexMap;
use thiserror::Error;

/// **STABLE ERROR CODES**
///
/// **MANDATE**: Use these codes when constructing `ScoringError` so logs stay greppable.
pub mod codes {
    pub const INVALID_JSON: &str = "RUST_CORE_VALIDATION_INVALID_JSON";
    pub const INVALID_ENVELOPE: &str = "RUST_CORE_VALIDATION_INVALID_ENVELOPE";
    pub const BODY_TOO_LARGE: &str = "RUST_CORE_VALIDATION_BODY_TOO_LARGE";
    pub const ROUTE_NOT_FOUND: &str = "RUST_CORE_VALIDATION_ROUTE_NOT_FOUND";
    pub const INVALID_ROUTE_PATTERN: &str = "RUST_CORE_VALIDATION_INVALID_ROUTE_PATTERN";
    pub const INVALID_HTTP_METHOD: &str = "RUST_CORE_VALIDATION_INVALID_HTTP_METHOD";
    pub const STORE_UNAVAILABLE: &str = "RUST_CORE_STORE_UNAVAILABLE";
    pub const STORE_CORRUPT_VALUE: &str = "RUST_CORE_STORE_CORRUPT_VALUE";
    pub const UNKNOWN_METHOD: &str = "RUST_CORE_VALIDATION_UNKNOWN_METHOD";
    pub const HANDLER_PANIC: &str = "RUST_CORE_SYSTEM_HANDLER_PANIC";
}

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("VALIDATION ERROR: {code} - {message}")]
    Validation { code: String, message: String },

    #[error("INVALID REQUEST: {} field(s) rejected", .errors.len())]
    InvalidFields { errors: IndexMap<String, String> },

    #[error("FORBIDDEN")]
    Forbidden,

    #[error("STORE ERROR: {code} - {message}")]
    Store { code: String, message: String },

    #[error("TIMEOUT ERROR: operation exceeded {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("SYSTEM ERROR: {code} - {message}")]
    System { code: String, message: String },
}

impl ScoringError {
    pub fn validation(code: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn store(code: &str, message: impl Into<String>) -> Self {
        Self::Store {
            code: code.to_string(),
            message: message.into(),
        }
    }

    pub fn system(code: &str, message: impl Into<String>) -> Self {
        Self::System {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// HTTP status the error is reported with.
    pub fn status(&self) -> u16 {
        match self {
            ScoringError::Validation { code, .. } if code == codes::ROUTE_NOT_FOUND => 404,
            ScoringError::Validation { code, .. } if code == codes::INVALID_JSON => 400,
            ScoringError::Validation { code, .. } if code == codes::INVALID_ENVELOPE => 400,
            ScoringError::Validation { code, .. } if code == codes::BODY_TOO_LARGE => 400,
            ScoringError::Validation { .. } | ScoringError::InvalidFields { .. } => 422,
            ScoringError::Forbidden => 403,
            ScoringError::Store { .. } | ScoringError::Timeout { .. } | ScoringError::System { .. } => 500,
        }
    }
}
