//! # SCORING CORE LIBRARY
//!
//! **REQUEST VALIDATION AND DISPATCH FOR THE SCORING API**
//!
//! **ARCHITECTURE**: Declarative field schemas feeding a single dispatcher
//! **GUARANTEE**: Every request ends in a `{response|error, code}` envelope
//! **BOUNDARY**: Storage is reached only through the [`store::Store`] trait

pub mod api;
pub mod auth;
pub mod dispatcher;
pub mod errors;
pub mod request;
pub mod response;
pub mod routing;
pub mod scoring;
pub mod store;
pub mod types;

// **VALIDATION MODULE REGISTRATION**
pub mod validation;

#[cfg(test)]
mod tests {
    use crate::api::*;
    use serde_json::json;

    // **PIPELINE TESTS**
    #[test]
    fn test_envelope_then_arguments_pipeline() {
        // **STEP 1**: Validate the envelope
        let body = json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "method": ONLINE_SCORE,
            "token": "",
            "arguments": {"first_name": "Ivan", "last_name": "Petrov"}
        });
        let request = MethodRequest::from_value(&body).unwrap();
        assert!(!request.is_admin());

        // **STEP 2**: Validate the arguments, then the pair rule
        let arguments = serde_json::Value::Object(request.arguments.clone());
        let score_request = OnlineScoreRequest::from_value(&arguments).unwrap();
        assert!(score_request.validate_logic().is_ok());

        // **STEP 3**: Score against an empty store
        let store = MemoryStore::new();
        assert!((get_score(&store, &score_request) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_field_errors_surface_as_422() {
        let err = MethodRequest::from_value(&json!({"login": "x"})).unwrap_err();
        assert_eq!(err.status(), 422);

        match err {
            ScoringError::InvalidFields { errors } => {
                assert!(errors.contains_key("token"));
                assert!(errors.contains_key("arguments"));
                assert!(errors.contains_key("method"));
                assert!(!errors.contains_key("login"));
                assert!(!errors.contains_key("account"));
            }
            other => panic!("Wrong error type: {other:?}"),
        }
    }

    #[test]
    fn test_custom_salts_change_tokens() {
        let default = AuthVerifier::default();
        let custom = AuthVerifier::new("pepper", "7");
        assert_ne!(
            default.user_digest("acc", "user"),
            custom.user_digest("acc", "user")
        );
        assert!(is_admin(ADMIN_LOGIN));
    }
}
