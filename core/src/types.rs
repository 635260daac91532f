//! # REQUEST CONTEXT
//!
//! Per-call record filled while a request is dispatched and logged once the
//! response is written.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RequestContext {
    pub request_id: String,

    /// Online score arguments that carried a value.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub has: Vec<String>,

    /// Number of clients asked for by `clients_interests`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nclients: Option<usize>,

    /// Status code of the response, set once the call is finished.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
}

impl RequestContext {
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            ..Self::default()
        }
    }

    /// Single-line JSON rendering for the access log.
    pub fn to_log_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}
