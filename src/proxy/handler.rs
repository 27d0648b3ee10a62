//! The proxy handler: one inbound request in, one response out.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use url::Url;

use crate::config::{ConfigError, Credential, ProxyConfig};
use crate::config::validation::ValidationError;
use crate::http::cors::Cors;
use crate::http::error::ProxyError;
use crate::http::request::InboundRequest;
use crate::http::response::relay;
use crate::observability::metrics;
use crate::routing::Router;
use crate::upstream::{redact_str, Upstream, UpstreamRequest};

/// Forwards inbound requests to the upstream API with the server credential.
///
/// Built once at startup from [`ProxyConfig`]; everything it holds is
/// read-only, so one instance serves all requests concurrently.
pub struct ProxyHandler {
    base_url: Url,
    credential: Option<Credential>,
    cors: Cors,
    router: Router,
    max_body_size: u64,
    upstream: Arc<dyn Upstream>,
}

impl ProxyHandler {
    pub fn new(config: &ProxyConfig, upstream: Arc<dyn Upstream>) -> Result<Self, ConfigError> {
        let base_url = Url::parse(&config.upstream.base_url).map_err(|_| {
            ConfigError::Validation(vec![ValidationError::InvalidBaseUrl(
                config.upstream.base_url.clone(),
            )])
        })?;

        Ok(Self {
            base_url,
            credential: config.upstream.credential.clone(),
            cors: Cors::from_config(&config.cors),
            router: Router::from_config(&config.routing),
            max_body_size: config.security.max_body_size,
            upstream,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Answer `request`. Never fails: every error becomes a response, and
    /// every response leaves through here with CORS headers attached.
    pub async fn handle(&self, request: InboundRequest) -> Response {
        let start = Instant::now();
        let preflight = request.is_preflight();

        let (mut response, operation) = if preflight {
            (StatusCode::NO_CONTENT.into_response(), None)
        } else {
            let route = self.router.resolve(&request);
            let operation = route.as_ref().ok().cloned();
            let response = match self.forward(&request, route).await {
                Ok(response) => response,
                Err(err) => err.into_response(),
            };
            (response, operation)
        };

        self.cors
            .apply(response.headers_mut(), request.origin.as_ref(), preflight);

        let operation = operation.as_deref().unwrap_or(metrics::NO_OPERATION);
        metrics::record_request(
            request.method.as_str(),
            operation,
            response.status().as_u16(),
            start,
        );
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            operation,
            status = response.status().as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );

        response
    }

    /// Checks run in order: credential, method, body size, then the route
    /// resolved by the caller.
    async fn forward(
        &self,
        request: &InboundRequest,
        route: Result<String, ProxyError>,
    ) -> Result<Response, ProxyError> {
        let credential = self.credential.as_ref().ok_or_else(|| {
            tracing::error!(path = %request.path, "No upstream credential configured");
            ProxyError::ConfigurationMissing
        })?;

        if !matches!(request.method, Method::GET | Method::HEAD | Method::POST) {
            return Err(ProxyError::MethodNotAllowed(request.method.clone()));
        }

        if request
            .content_length
            .is_some_and(|length| length > self.max_body_size)
        {
            return Err(ProxyError::PayloadTooLarge(self.max_body_size));
        }

        let operation = route?;
        let upstream_request =
            UpstreamRequest::new(&self.base_url, &operation, &request.params, credential);

        tracing::debug!(
            operation = %operation,
            upstream = %upstream_request.redacted(),
            "Forwarding request"
        );

        let upstream_response = match self.upstream.get(&upstream_request).await {
            Ok(response) => response.redact(credential),
            Err(err) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.path,
                    operation = %operation,
                    error = %redact_str(&err.to_string(), credential.expose()),
                    "Upstream request failed"
                );
                metrics::record_upstream_failure(err.kind());
                return Err(ProxyError::Upstream(err));
            }
        };

        if upstream_response.status.is_success() {
            Ok(relay(upstream_response))
        } else {
            tracing::warn!(
                method = %request.method,
                path = %request.path,
                operation = %operation,
                status = upstream_response.status.as_u16(),
                "Upstream rejected request"
            );
            Err(ProxyError::Rejected(upstream_response))
        }
    }
}
