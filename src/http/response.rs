//! Translate a routing decision into an HTTP response.
//!
//! # Design Decisions
//! - Redirects use the rule status when it is a 3xx, otherwise 307
//! - Not-found decisions answer 404 unless a continue-rule set a status
//! - Rule headers that are not valid HTTP headers are skipped with a warning

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::routing::RouteResult;

pub const X_ROUTE_TARGET: &str = "x-route-target";
pub const X_ROUTE_DESTINATION: &str = "x-route-destination";

/// Build the response for a routing decision.
pub fn decision_response(result: RouteResult) -> Response {
    let status = response_status(&result);
    let mut headers = HeaderMap::new();

    for (name, value) in &result.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid rule header"),
        }
    }

    headers.insert(
        HeaderName::from_static(X_ROUTE_TARGET),
        HeaderValue::from_static(result.target.as_str()),
    );
    if let Ok(value) = HeaderValue::from_str(&result.destination) {
        headers.insert(HeaderName::from_static(X_ROUTE_DESTINATION), value);
    }

    if result.is_redirect() {
        if let Ok(location) = HeaderValue::from_str(&location(&result)) {
            headers.insert(header::LOCATION, location);
        }
    }

    (status, headers, Json(result)).into_response()
}

fn response_status(result: &RouteResult) -> StatusCode {
    let configured = result.status.and_then(|s| StatusCode::from_u16(s).ok());

    if result.is_redirect() {
        return configured
            .filter(StatusCode::is_redirection)
            .unwrap_or(StatusCode::TEMPORARY_REDIRECT);
    }

    match (result.found, configured) {
        (_, Some(status)) => status,
        (true, None) => StatusCode::OK,
        (false, None) => StatusCode::NOT_FOUND,
    }
}

/// Redirect target with the request query appended.
fn location(result: &RouteResult) -> String {
    if result.query_args.is_empty() {
        return result.destination.clone();
    }

    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(&result.query_args)
        .finish();
    format!("{}?{}", result.destination, query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Phase, Target};
    use std::collections::BTreeMap;

    fn result(found: bool, target: Target, destination: &str) -> RouteResult {
        RouteResult {
            found,
            destination: destination.to_string(),
            target,
            headers: BTreeMap::new(),
            continued: false,
            status: None,
            query_args: BTreeMap::new(),
            matched_rule_index: None,
            phase: Some(Phase::Filesystem),
        }
    }

    #[test]
    fn test_not_found_status() {
        let response = decision_response(result(false, Target::Unresolved, "/about"));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[X_ROUTE_DESTINATION], "/about");
    }

    #[test]
    fn test_redirect_with_query() {
        let mut redirect = result(true, Target::Url, "https://example.com/a");
        redirect.status = Some(308);
        redirect.query_args.insert("q".into(), "a b".into());

        let response = decision_response(redirect);
        assert_eq!(response.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "https://example.com/a?q=a+b");
    }

    #[test]
    fn test_redirect_defaults_to_temporary() {
        let mut redirect = result(true, Target::Url, "https://example.com/");
        redirect.status = Some(200);
        let response = decision_response(redirect);
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    }

    #[test]
    fn test_rule_headers_applied() {
        let mut found = result(true, Target::Backend, "/__LAMBDA_0");
        found.headers.insert("x-page".into(), "/index".into());
        found.headers.insert("bad header".into(), "x".into());

        let response = decision_response(found);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["x-page"], "/index");
        assert_eq!(response.headers()[X_ROUTE_TARGET], "backend");
        assert!(response.headers().get("bad header").is_none());
    }
}
