//! `reqwest`-backed upstream client.

use std::error::Error as _;

use async_trait::async_trait;
use axum::http::header::CONTENT_TYPE;

use crate::upstream::{Upstream, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Shares one connection pool across all requests.
#[derive(Debug, Clone)]
pub struct HttpUpstream {
    client: reqwest::Client,
}

impl HttpUpstream {
    pub fn new() -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("places-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Request(describe(e)))?;
        Ok(Self { client })
    }

    /// Use an already configured client (proxy settings, TLS roots, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn get(&self, request: &UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        let response = self
            .client
            .get(request.url().clone())
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        let content_type = response.headers().get(CONTENT_TYPE).cloned();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Body(describe(e)))?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout(describe(err))
    } else if err.is_connect() {
        UpstreamError::Connect(describe(err))
    } else {
        UpstreamError::Request(describe(err))
    }
}

/// The error and its causes, with the request URL (and so the key) stripped.
fn describe(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut text = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
