//! # DISPATCHER
//!
//! **FLOW**: route → parse envelope → validate envelope → authenticate →
//! validate arguments → business function → envelope + status.
//!
//! The dispatcher holds no per-request state. Schemas are process-wide and
//! read-only, and the store brings its own synchronization, so one instance
//! is shared by every worker.

use crate::auth::AuthVerifier;
use crate::errors::{codes, ScoringError};
use crate::request::{
    parse_envelope, ClientsInterestsRequest, HttpRequest, MethodRequest, OnlineScoreRequest,
    REQUEST_ID_HEADER,
};
use crate::response::{error_response, success_response, HttpResponse};
use crate::routing::{RouteMatcher, METHOD_HANDLER};
use crate::scoring::{get_interests, get_score, ADMIN_SCORE};
use crate::store::Store;
use crate::types::RequestContext;
use log::{error, info};
use serde_json::{json, Map, Value as JsonValue};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

pub const ONLINE_SCORE: &str = "online_score";
pub const CLIENTS_INTERESTS: &str = "clients_interests";

pub struct Dispatcher {
    auth: AuthVerifier,
    store: Arc<dyn Store>,
    router: RouteMatcher,
}

impl Dispatcher {
    pub fn new(store: Arc<dyn Store>) -> Result<Self, ScoringError> {
        Self::with_auth(store, AuthVerifier::default())
    }

    pub fn with_auth(store: Arc<dyn Store>, auth: AuthVerifier) -> Result<Self, ScoringError> {
        Ok(Self {
            auth,
            store,
            router: RouteMatcher::scoring()?,
        })
    }

    pub fn auth(&self) -> &AuthVerifier {
        &self.auth
    }

    /// **FULL REQUEST CYCLE**
    ///
    /// Never fails: every error, panics included, is folded into the response
    /// envelope. `ctx.code` is set to the status written.
    pub fn handle(&self, request: &HttpRequest, ctx: &mut RequestContext) -> HttpResponse {
        let mut response = match self.route(request, ctx) {
            Ok(payload) => success_response(payload),
            Err(err) => {
                if err.status() >= 500 {
                    error!("{} failed: {}", ctx.request_id, err);
                } else {
                    info!("{} rejected: {}", ctx.request_id, err);
                }
                error_response(&err)
            }
        };

        ctx.code = Some(response.status_code);
        response
            .headers
            .insert(REQUEST_ID_HEADER.to_string(), ctx.request_id.clone());
        response
    }

    fn route(&self, request: &HttpRequest, ctx: &mut RequestContext) -> Result<JsonValue, ScoringError> {
        let matched = self.router.match_route(&request.path, &request.method)?;
        let envelope = parse_envelope(&request.body)?;
        info!(
            "{}: {} {}",
            request.path,
            String::from_utf8_lossy(&request.body),
            ctx.request_id
        );

        match matched.handler_id.as_str() {
            METHOD_HANDLER => {
                let body = JsonValue::Object(envelope);
                catch_unwind(AssertUnwindSafe(|| self.method_handler(&body, ctx))).unwrap_or_else(
                    |_| {
                        Err(ScoringError::system(
                            codes::HANDLER_PANIC,
                            "method handler panicked",
                        ))
                    },
                )
            }
            other => Err(ScoringError::validation(
                codes::ROUTE_NOT_FOUND,
                format!("no handler registered as {}", other),
            )),
        }
    }

    /// Validate, authenticate and run one envelope.
    pub fn method_handler(
        &self,
        body: &JsonValue,
        ctx: &mut RequestContext,
    ) -> Result<JsonValue, ScoringError> {
        let request = MethodRequest::from_value(body)?;

        if !self.auth.check_auth(&request) {
            info!("Forbidden for user: {}", request.login);
            return Err(ScoringError::Forbidden);
        }

        let arguments = JsonValue::Object(request.arguments.clone());
        match request.method.as_str() {
            ONLINE_SCORE => self.online_score(&request, &arguments, ctx),
            CLIENTS_INTERESTS => self.clients_interests(&arguments, ctx),
            other => {
                info!("Unknown method: {}", other);
                Err(ScoringError::validation(codes::UNKNOWN_METHOD, "Unknown method"))
            }
        }
    }

    fn online_score(
        &self,
        request: &MethodRequest,
        arguments: &JsonValue,
        ctx: &mut RequestContext,
    ) -> Result<JsonValue, ScoringError> {
        let score_request = OnlineScoreRequest::from_value(arguments)?;
        score_request.validate_logic()?;
        ctx.has = score_request.present_fields().to_vec();

        if request.is_admin() {
            return Ok(json!({ "score": ADMIN_SCORE }));
        }

        let score = get_score(self.store.as_ref(), &score_request);
        info!("Score calculated: {}", score);
        Ok(json!({ "score": score }))
    }

    fn clients_interests(
        &self,
        arguments: &JsonValue,
        ctx: &mut RequestContext,
    ) -> Result<JsonValue, ScoringError> {
        let interests_request = ClientsInterestsRequest::from_value(arguments)?;
        ctx.nclients = Some(interests_request.client_ids.len());

        let mut interests = Map::new();
        for client_id in &interests_request.client_ids {
            let found = get_interests(self.store.as_ref(), *client_id)?;
            interests.insert(client_id.to_string(), json!(found));
        }
        info!(
            "Interests returned for {} clients",
            interests_request.client_ids.len()
        );
        Ok(JsonValue::Object(interests))
    }
}
