pub mod serializer;
pub mod types;

pub use serializer::{
    create_response, default_reason, envelope, error_payload, error_response,
    serialize_json_response, success_response, BAD_REQUEST, FORBIDDEN,
    INTERNAL_ERROR, INVALID_REQUEST, NOT_FOUND, OK,
};
pub use types::HttpResponse;
