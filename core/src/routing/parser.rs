use crate::errors::{codes, ScoringError};
use crate::routing::types::{HttpMethod, Route};
use regex::Regex;

pub fn parse_route_pattern(
    pattern: &str,
    method: &str,
    handler_id: &str,
) -> Result<Route, ScoringError> {
    // Static segments only; every segment matches literally.
    let mut regex_pattern = String::from("^");

    for part in pattern.split('/').filter(|part| !part.is_empty()) {
        regex_pattern.push('/');
        regex_pattern.push_str(&regex::escape(part));
    }
    if regex_pattern.len() == 1 {
        regex_pattern.push('/');
    }
    regex_pattern.push('$');

    let path_regex = Regex::new(&regex_pattern).map_err(|e| {
        ScoringError::validation(
            codes::INVALID_ROUTE_PATTERN,
            format!("Invalid route pattern: {}", e),
        )
    })?;

    Ok(Route {
        path: pattern.to_string(),
        method: parse_http_method(method)?,
        handler_id: handler_id.to_string(),
        path_regex,
    })
}

pub fn parse_http_method(method: &str) -> Result<HttpMethod, ScoringError> {
    match method.to_uppercase().as_str() {
        "GET" => Ok(HttpMethod::GET),
        "POST" => Ok(HttpMethod::POST),
        "PUT" => Ok(HttpMethod::PUT),
        "DELETE" => Ok(HttpMethod::DELETE),
        "PATCH" => Ok(HttpMethod::PATCH),
        "HEAD" => Ok(HttpMethod::HEAD),
        "OPTIONS" => Ok(HttpMethod::OPTIONS),
        "TRACE" => Ok(HttpMethod::TRACE),
        _ => Err(ScoringError::validation(
            codes::INVALID_HTTP_METHOD,
            format!("Invalid HTTP method: {}", method),
        )),
    }
}
