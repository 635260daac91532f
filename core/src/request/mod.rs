pub mod models;
pub mod parser;
pub mod types;

pub use models::{
    is_admin, ClientsInterestsRequest, MethodRequest, OnlineScoreRequest, ADMIN_LOGIN,
    PAIRS_ERROR_KEY,
};
pub use parser::{parse_envelope, parse_json_body, validate_body_size, MAX_BODY_SIZE};
pub use types::{HttpRequest, REQUEST_ID_HEADER};
