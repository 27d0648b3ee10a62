//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn an upstream response into the client response
//! - Keep only the content type; upstream hop-by-hop and caching headers
//!   are not relayed
//!
//! # Design Decisions
//! - Status code and body are copied verbatim, success or not
//! - Bodies are buffered; upstream JSON payloads are small
//! - A missing upstream content type is reported as JSON

use axum::{
    body::Body,
    http::{header, HeaderValue},
    response::Response,
};

use crate::upstream::UpstreamResponse;

/// Build the client response for an upstream reply.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static("application/json"));

    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, content_type);
    response
}
