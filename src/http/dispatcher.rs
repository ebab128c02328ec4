//! The dispatch pipeline.
//!
//! Every request lands here through the catch-all router and is resolved in
//! a fixed order:
//!
//! 1. route table lookup (exact method + template match)
//! 2. proxy rule resolution (when proxying is enabled)
//! 3. structured 404
//!
//! Route handling validates the request against the route's declared schemas
//! before the handler runs. Proxy handling consults the rule's pre-forward
//! hook once, then forwards with a per-attempt timeout and bounded retries.

use std::collections::HashMap;
use std::time::Instant;

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::State;
use axum::http::header::{CONNECTION, CONTENT_LENGTH, HOST};
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderName, HeaderValue, Request, Uri};
use axum::response::Response;
use url::Url;

use super::server::AppState;
use crate::error::{self, FieldViolation};
use crate::observability::record_request;
use crate::proxy::{resolve, ForwardContext, HookOutcome, ProxyRule};
use crate::routing::{RequestContext, Route};
use crate::schema::validate_text_params;

/// Entry point for every request the router does not claim for a built-in
/// endpoint.
pub async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let path = parts.uri.path().to_string();
    let method = parts.method.as_str().to_string();

    // Both arms need the whole body: route handling validates it, proxy
    // forwarding replays it on retry.
    let raw_body = match to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            let response = error::payload_too_large();
            record_request(&method, response.status().as_u16(), "rejected", start);
            return response;
        }
    };

    let (response, outcome) =
        if let Some((route, path_params)) = state.table.lookup(&parts.method, &path) {
            (handle_route(route, path_params, &parts, raw_body).await, "route")
        } else if state.proxy_enabled {
            match resolve(&path, &state.rules) {
                Some(decision) => (
                    forward(&state, decision.rule, decision.params, &parts, raw_body).await,
                    "proxy",
                ),
                None => (error::not_found(&path), "none"),
            }
        } else {
            (error::not_found(&path), "none")
        };

    record_request(&method, response.status().as_u16(), outcome, start);
    response
}

/// Validate the request against the route's declared schemas, then run the
/// handler. Any violation stops the request before the handler sees it.
async fn handle_route(
    route: &Route,
    path_params: HashMap<String, String>,
    parts: &Parts,
    raw_body: Bytes,
) -> Response {
    let query = query_map(&parts.uri);
    let header_values = header_map(&parts.headers);

    let mut violations = Vec::new();
    if let Some(schema) = &route.parameters.path {
        validate_text_params(schema, &path_params, "path", &mut violations);
    }
    if let Some(schema) = &route.parameters.query {
        validate_text_params(schema, &query, "query", &mut violations);
    }
    if let Some(schema) = &route.parameters.headers {
        validate_text_params(schema, &header_values, "header", &mut violations);
    }

    let body = match &route.parameters.body {
        Some(schema) => match serde_json::from_slice::<serde_json::Value>(&raw_body) {
            Ok(value) => {
                schema.validate(&value, "body", &mut violations);
                Some(value)
            }
            Err(_) => {
                violations.push(FieldViolation::new("body", "expected a JSON body"));
                None
            }
        },
        None => None,
    };

    if !violations.is_empty() {
        return error::validation_failure(violations);
    }

    route
        .handle(RequestContext {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            path_params,
            query,
            body,
            raw_body,
        })
        .await
}

/// Forward a request under the resolved rule: hook first, then up to
/// `retries + 1` attempts against the upstream, each under the rule timeout.
async fn forward(
    state: &AppState,
    rule: &ProxyRule,
    params: HashMap<String, String>,
    parts: &Parts,
    raw_body: Bytes,
) -> Response {
    let mut target = rule.target.clone();
    let mut extra_headers = rule.headers.clone();

    if let Some(hook) = &rule.hook {
        let outcome = hook(ForwardContext {
            method: parts.method.clone(),
            uri: parts.uri.clone(),
            headers: parts.headers.clone(),
            params,
            target: target.clone(),
        })
        .await;
        match outcome {
            HookOutcome::ShortCircuit { response } => {
                return response.unwrap_or_else(error::forbidden);
            }
            HookOutcome::Proceed {
                headers,
                target: redirect,
            } => {
                extra_headers.extend(headers);
                if let Some(redirect) = redirect {
                    target = redirect;
                }
            }
        }
    }

    let uri: Uri = match upstream_uri(&target, &parts.uri).parse() {
        Ok(uri) => uri,
        Err(_) => {
            tracing::warn!(target = %target, "could not build upstream URI");
            return error::bad_gateway("invalid upstream target");
        }
    };

    let headers = outbound_headers(&parts.headers, &extra_headers);

    let attempts = rule.retries + 1;
    for attempt in 1..=attempts {
        let mut request = Request::new(Body::from(raw_body.clone()));
        *request.method_mut() = parts.method.clone();
        *request.uri_mut() = uri.clone();
        *request.headers_mut() = headers.clone();

        match tokio::time::timeout(rule.timeout, state.client.request(request)).await {
            Ok(Ok(response)) => {
                let (parts, body) = response.into_parts();
                return Response::from_parts(parts, Body::new(body));
            }
            Ok(Err(error)) => {
                tracing::warn!(%uri, attempt, %error, "upstream request failed");
            }
            Err(_) => {
                tracing::warn!(%uri, attempt, timeout = ?rule.timeout, "upstream request timed out");
            }
        }
    }

    tracing::error!(%uri, attempts, "upstream unreachable, giving up");
    error::bad_gateway("upstream did not respond")
}

/// Join the rule target with the inbound path and query. The target's path
/// acts as a prefix; its trailing slash is trimmed so the two halves join on
/// exactly one `/`.
fn upstream_uri(target: &Url, inbound: &Uri) -> String {
    let host = target.host_str().unwrap_or_default();
    let mut uri = match target.port() {
        Some(port) => format!("{}://{}:{}", target.scheme(), host, port),
        None => format!("{}://{}", target.scheme(), host),
    };
    uri.push_str(target.path().trim_end_matches('/'));
    uri.push_str(inbound.path());
    if let Some(query) = inbound.query() {
        uri.push('?');
        uri.push_str(query);
    }
    uri
}

/// Copy the inbound headers, drop the hop-specific ones the client addressed
/// to us, and merge in rule/hook headers. Unusable names or values from
/// configuration are skipped, not fatal.
fn outbound_headers(inbound: &HeaderMap, extra: &HashMap<String, String>) -> HeaderMap {
    let mut headers = inbound.clone();
    headers.remove(HOST);
    headers.remove(CONNECTION);
    headers.remove(CONTENT_LENGTH);

    for (name, value) in extra {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "skipping invalid forward header"),
        }
    }
    headers
}

fn query_map(uri: &Uri) -> HashMap<String, String> {
    match uri.query() {
        Some(query) => url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect(),
        None => HashMap::new(),
    }
}

/// Header names are matched case-insensitively; schemas declare them
/// lowercase.
fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_lowercase(), value.to_string()))
        })
        .collect()
}
