//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request ID (UUID v4) for tracing
//! - Reduce an axum request to the parts the proxy needs (method, path,
//!   query parameters, Origin, declared body length)
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Query parameters are a map; a repeated key keeps its last value
//! - The body is never read; forwarding only uses the query string, and the
//!   size limit is checked against `Content-Length`

use std::collections::BTreeMap;

use axum::http::{header, request::Parts, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the per-request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Query parameters, ordered by key so built URLs are deterministic.
pub type QueryParams = BTreeMap<String, String>;

/// Generates a fresh UUID for requests that arrive without an ID.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// What the proxy handler sees of an inbound request.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub path: String,
    pub params: QueryParams,
    pub origin: Option<HeaderValue>,
    pub content_length: Option<u64>,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            origin: None,
            content_length: None,
        }
    }

    /// Extract from the head of an axum request.
    pub fn from_parts(parts: &Parts) -> Self {
        Self {
            method: parts.method.clone(),
            path: parts.uri.path().to_string(),
            params: parts.uri.query().map(parse_query).unwrap_or_default(),
            origin: parts.headers.get(header::ORIGIN).cloned(),
            content_length: parts
                .headers
                .get(header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok()),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_origin(mut self, origin: &'static str) -> Self {
        self.origin = Some(HeaderValue::from_static(origin));
        self
    }

    pub fn with_content_length(mut self, length: u64) -> Self {
        self.content_length = Some(length);
        self
    }

    /// A parameter's value, treating empty strings as absent.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn is_preflight(&self) -> bool {
        self.method == Method::OPTIONS
    }
}

/// Decode an `application/x-www-form-urlencoded` query string.
pub fn parse_query(query: &str) -> QueryParams {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
