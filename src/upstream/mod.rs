//! Upstream mapping API subsystem.
//!
//! # Data Flow
//! ```text
//! resolved operation + query params + credential
//!     → request.rs (UpstreamRequest: base URL + path + params + key)
//!     → Upstream::get (client.rs: one pooled reqwest client)
//!     → UpstreamResponse (status, content type, body bytes)
//! ```
//!
//! # Design Decisions
//! - Exactly one GET per inbound request: no retries, no timeout override
//! - The trait is the seam tests replace with a recording stub
//! - Errors carry a description that never includes the request URL

pub mod client;
pub mod request;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderValue, StatusCode};
use thiserror::Error;

use crate::config::Credential;

pub use client::HttpUpstream;
pub use request::UpstreamRequest;

const REDACTED: &str = "[redacted]";

/// What came back from the upstream API.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn json(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type: Some(HeaderValue::from_static("application/json")),
            body: body.into(),
        }
    }

    /// Replace any verbatim occurrence of the credential in the body.
    pub fn redact(mut self, credential: &Credential) -> Self {
        self.body = redact_bytes(self.body, credential.expose());
        self
    }
}

/// Transport-level failure talking to the upstream API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("failed to read upstream body: {0}")]
    Body(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

impl UpstreamError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UpstreamError::Connect(_) => "connect",
            UpstreamError::Timeout(_) => "timeout",
            UpstreamError::Body(_) => "body",
            UpstreamError::Request(_) => "request",
        }
    }
}

/// Issues GETs against the upstream API.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn get(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, UpstreamError>;
}

/// Replace every occurrence of `secret` in `text`.
pub fn redact_str(text: &str, secret: &str) -> String {
    if secret.is_empty() {
        return text.to_string();
    }
    text.replace(secret, REDACTED)
}

fn redact_bytes(body: Bytes, secret: &str) -> Bytes {
    let needle = secret.as_bytes();
    if needle.is_empty() || body.len() < needle.len() {
        return body;
    }
    if !body.windows(needle.len()).any(|w| w == needle) {
        return body;
    }

    let mut out = Vec::with_capacity(body.len());
    let mut rest: &[u8] = &body;
    while let Some(pos) = rest.windows(needle.len()).position(|w| w == needle) {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(REDACTED.as_bytes());
        rest = &rest[pos + needle.len()..];
    }
    out.extend_from_slice(rest);
    Bytes::from(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_body() {
        let credential = Credential::new("AIzaSECRET").unwrap();
        let response = UpstreamResponse::json(
            StatusCode::FORBIDDEN,
            r#"{"error_message":"The provided API key AIzaSECRET is invalid. (AIzaSECRET)"}"#,
        )
        .redact(&credential);

        let body = std::str::from_utf8(&response.body).unwrap();
        assert!(!body.contains("AIzaSECRET"));
        assert_eq!(
            body,
            r#"{"error_message":"The provided API key [redacted] is invalid. ([redacted])"}"#
        );
    }

    #[test]
    fn test_redact_leaves_clean_body_untouched() {
        let credential = Credential::new("AIzaSECRET").unwrap();
        let body = r#"{"status":"OK","results":[]}"#;
        let response = UpstreamResponse::json(StatusCode::OK, body).redact(&credential);
        assert_eq!(response.body, Bytes::from_static(body.as_bytes()));
    }

    #[test]
    fn test_redact_str() {
        assert_eq!(redact_str("dial key=abc failed", "abc"), "dial key=[redacted] failed");
        assert_eq!(redact_str("nothing here", ""), "nothing here");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(UpstreamError::Connect("refused".into()).kind(), "connect");
        assert_eq!(UpstreamError::Timeout("slow".into()).kind(), "timeout");
    }
}
