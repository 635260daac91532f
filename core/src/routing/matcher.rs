use crate::errors::{codes, ScoringError};
use crate::routing::parser::parse_route_pattern;
use crate::routing::types::{HttpMethod, Route, RouteMatch};

/// Handler id of the single scoring endpoint.
pub const METHOD_HANDLER: &str = "method";

pub struct RouteMatcher {
    routes: Vec<Route>,
}

impl RouteMatcher {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router serving `POST /method`.
    pub fn scoring() -> Result<Self, ScoringError> {
        let mut matcher = Self::new();
        matcher.add_route(parse_route_pattern("/method", "POST", METHOD_HANDLER)?);
        Ok(matcher)
    }

    pub fn add_route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Match ignoring leading/trailing slashes; misses report as route-not-found.
    pub fn match_route(&self, path: &str, method: &HttpMethod) -> Result<RouteMatch, ScoringError> {
        let normalized = format!("/{}", path.trim_matches('/'));
        for route in &self.routes {
            if route.method != *method {
                continue;
            }

            if route.path_regex.is_match(&normalized) {
                return Ok(RouteMatch {
                    handler_id: route.handler_id.clone(),
                });
            }
        }

        Err(ScoringError::validation(
            codes::ROUTE_NOT_FOUND,
            format!("No route found for {} {}", method, path),
        ))
    }
}

impl Default for RouteMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoring_route() {
        let matcher = RouteMatcher::scoring().unwrap();
        let matched = matcher.match_route("/method", &HttpMethod::POST).unwrap();
        assert_eq!(matched.handler_id, METHOD_HANDLER);
    }

    #[test]
    fn test_trailing_slash_matches() {
        let matcher = RouteMatcher::scoring().unwrap();
        assert!(matcher.match_route("/method/", &HttpMethod::POST).is_ok());
        assert!(matcher.match_route("method", &HttpMethod::POST).is_ok());
    }

    #[test]
    fn test_unknown_path_is_404() {
        let matcher = RouteMatcher::scoring().unwrap();
        let err = matcher.match_route("/score", &HttpMethod::POST).unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_wrong_verb_is_404() {
        let matcher = RouteMatcher::scoring().unwrap();
        let err = matcher.match_route("/method", &HttpMethod::GET).unwrap_err();
        assert_eq!(err.status(), 404);
    }

    #[test]
    fn test_method_subpath_is_404() {
        let matcher = RouteMatcher::scoring().unwrap();
        let err = matcher.match_route("/method/17", &HttpMethod::POST).unwrap_err();
        assert_eq!(err.status(), 404);
    }
}
