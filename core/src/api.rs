//! Flat re-exports for embedding the scoring core behind any transport.

pub use crate::auth::{AuthVerifier, ADMIN_SALT, SALT};
pub use crate::dispatcher::{Dispatcher, CLIENTS_INTERESTS, ONLINE_SCORE};
pub use crate::errors::{codes, ScoringError};
pub use crate::request::{
    is_admin, ClientsInterestsRequest, HttpRequest, MethodRequest, OnlineScoreRequest,
    ADMIN_LOGIN, MAX_BODY_SIZE, PAIRS_ERROR_KEY, REQUEST_ID_HEADER,
};
pub use crate::response::{envelope, HttpResponse};
pub use crate::routing::{parse_http_method, HttpMethod};
pub use crate::scoring::{get_interests, get_score, ADMIN_SCORE, SCORE_TTL};
pub use crate::store::{MemoryStore, Store};
pub use crate::types::RequestContext;
pub use crate::validation::{Field, FieldKind, Schema, ValidationResult, Validator};
