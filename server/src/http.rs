//! # HTTP FRONT END
//!
//! hyper/tokio accept loop that turns each request into an [`HttpRequest`],
//! runs the dispatcher on the blocking pool under a timeout and writes the
//! envelope back.

use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes, Incoming};
use hyper::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use hyper::service::service_fn;
use hyper::{HeaderMap, Method, Request, Response, StatusCode};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::server::graceful::GracefulShutdown;
use log::{error, info, warn};
use scoring::api::{
    codes, parse_http_method, Dispatcher, HttpRequest, HttpResponse, RequestContext,
    ScoringError, MAX_BODY_SIZE, REQUEST_ID_HEADER,
};
use scoring::response::error_response;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinSet;

const FALLBACK: &[u8] = b"{\"error\":\"Internal Server Error\",\"code\":500}";

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared by every connection task.
pub struct AppState {
    dispatcher: Dispatcher,
    timeout: Duration,
}

impl AppState {
    pub const fn new(dispatcher: Dispatcher, timeout: Duration) -> Self {
        Self {
            dispatcher,
            timeout,
        }
    }
}

/// Serve connections from `listener` until `shutdown` resolves, then drain
/// open connections.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    let builder = Builder::new(TokioExecutor::new());
    let graceful = GracefulShutdown::new();
    let mut join_set: JoinSet<()> = JoinSet::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("shutdown requested");
                break;
            }
            accept = listener.accept() => {
                let (stream, peer) = match accept {
                    Ok(s) => s,
                    Err(e) => {
                        warn!("accept error: {e}");
                        continue;
                    }
                };
                let state = Arc::clone(&state);
                let http_builder = builder.clone();
                let watcher = graceful.watcher();
                join_set.spawn(async move {
                    let io = TokioIo::new(stream);
                    let service = service_fn(move |req| handle_request(req, Arc::clone(&state)));
                    let connection = http_builder.serve_connection(io, service).into_owned();
                    if let Err(err) = watcher.watch(connection).await {
                        warn!("connection from {peer} failed: {err}");
                    }
                });
            }
            Some(res) = join_set.join_next(), if !join_set.is_empty() => {
                log_join(res);
            }
        }
    }

    drop(listener);
    graceful.shutdown().await;
    while let Some(res) = join_set.join_next().await {
        log_join(res);
    }
}

fn log_join(res: Result<(), tokio::task::JoinError>) {
    if let Err(join_err) = res {
        if join_err.is_panic() {
            error!("connection task panicked: {join_err}");
        } else {
            warn!("connection task error: {join_err}");
        }
    }
}

async fn handle_request(
    req: Request<Incoming>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, BoxError> {
    let (parts, body_stream) = req.into_parts();
    match read_body(body_stream).await? {
        Ok(body) => Ok(respond(&state, &parts.method, parts.uri.path(), &parts.headers, body).await),
        Err(err) => Ok(reject(&parts.headers, &err)),
    }
}

/// Collect at most [`MAX_BODY_SIZE`] bytes. An oversized body is a client
/// error (inner `Err`); transport failures propagate as the outer `Err`.
pub async fn read_body<B>(body: B) -> Result<Result<Bytes, ScoringError>, BoxError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, MAX_BODY_SIZE).collect().await {
        Ok(collected) => Ok(Ok(collected.to_bytes())),
        Err(err) if err.is::<LengthLimitError>() => Ok(Err(ScoringError::validation(
            codes::BODY_TOO_LARGE,
            format!("Body exceeds limit {MAX_BODY_SIZE}"),
        ))),
        Err(err) => Err(err),
    }
}

/// Answer a request that never reached the dispatcher.
fn reject(headers: &HeaderMap, err: &ScoringError) -> Response<Full<Bytes>> {
    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map_or_else(new_request_id, str::to_string);
    warn!("{request_id}: {err}");
    finish(error_response(err), &mut RequestContext::new(request_id))
}

/// Dispatch one request and build the hyper response.
pub async fn respond(
    state: &Arc<AppState>,
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Response<Full<Bytes>> {
    let request = match to_core_request(method, path, headers, body) {
        Ok(request) => request,
        Err(err) => {
            let mut ctx = RequestContext::new(new_request_id());
            return finish(error_response(&err), &mut ctx);
        }
    };
    let request_id = request
        .request_id()
        .map_or_else(new_request_id, str::to_string);

    let worker_state = Arc::clone(state);
    let worker_id = request_id.clone();
    let task = tokio::task::spawn_blocking(move || {
        let mut ctx = RequestContext::new(worker_id);
        let response = worker_state.dispatcher.handle(&request, &mut ctx);
        (response, ctx)
    });

    let (response, mut ctx) = match tokio::time::timeout(state.timeout, task).await {
        Ok(Ok(done)) => done,
        Ok(Err(join_err)) => {
            error!("{request_id}: dispatch task failed: {join_err}");
            internal_error(
                &request_id,
                &ScoringError::system(codes::HANDLER_PANIC, join_err.to_string()),
            )
        }
        Err(_) => {
            let err = ScoringError::Timeout {
                timeout_ms: u64::try_from(state.timeout.as_millis()).unwrap_or(u64::MAX),
            };
            error!("{request_id}: {err}");
            internal_error(&request_id, &err)
        }
    };

    finish(response, &mut ctx)
}

fn to_core_request(
    method: &Method,
    path: &str,
    headers: &HeaderMap,
    body: Bytes,
) -> Result<HttpRequest, ScoringError> {
    // verbs the router does not know are reported like unknown paths
    let method = parse_http_method(method.as_str()).map_err(|_| {
        ScoringError::validation(
            codes::ROUTE_NOT_FOUND,
            format!("No route found for {method} {path}"),
        )
    })?;

    let mut request = HttpRequest::new(method, path, body.to_vec());
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            request = request.with_header(name.as_str(), value);
        }
    }
    Ok(request)
}

fn new_request_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn internal_error(request_id: &str, err: &ScoringError) -> (HttpResponse, RequestContext) {
    let mut response = error_response(err);
    response
        .headers
        .insert(REQUEST_ID_HEADER.to_string(), request_id.to_string());
    (response, RequestContext::new(request_id))
}

fn finish(response: HttpResponse, ctx: &mut RequestContext) -> Response<Full<Bytes>> {
    ctx.code = Some(response.status_code);
    info!("{}", ctx.to_log_line());
    to_hyper_response(&response, &ctx.request_id)
}

fn to_hyper_response(response: &HttpResponse, request_id: &str) -> Response<Full<Bytes>> {
    let mut builder = Response::builder().status(response.status_code);
    for (key, value) in &response.headers {
        if let (Ok(name), Ok(val)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            builder = builder.header(name, val);
        }
    }
    if !response.headers.contains_key(REQUEST_ID_HEADER) {
        if let Ok(val) = HeaderValue::from_str(request_id) {
            builder = builder.header(REQUEST_ID_HEADER, val);
        }
    }

    builder
        .body(Full::from(response.to_bytes()))
        .unwrap_or_else(|e| {
            error!("Failed to build response: {e}");
            let mut fallback = Response::new(Full::from(FALLBACK));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            fallback
        })
}
