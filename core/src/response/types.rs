use crate::response::serializer::serialize_json_response;
use serde_json::Value as JsonValue;
use std::collections::HashMap;

/// Every response of the service is a JSON envelope.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: JsonValue,
}

impl HttpResponse {
    pub fn json(&self) -> &JsonValue {
        &self.body
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        serialize_json_response(&self.body)
    }
}
