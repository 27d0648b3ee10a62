//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the catch-all proxy route
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener and shut down gracefully
//! - Dispatch every request to the proxy handler

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::{ConfigError, ProxyConfig};
use crate::http::request::{InboundRequest, UuidRequestId, X_REQUEST_ID};
use crate::proxy::ProxyHandler;
use crate::upstream::{HttpUpstream, Upstream, UpstreamError};

/// Failure building the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to build upstream client: {0}")]
    Client(#[from] UpstreamError),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<ProxyHandler>,
}

/// HTTP server for the places proxy.
pub struct HttpServer {
    router: Router,
    handler: Arc<ProxyHandler>,
}

impl HttpServer {
    /// Create a server that talks to the configured upstream over HTTPS.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let upstream = Arc::new(HttpUpstream::new()?);
        Self::with_upstream(config, upstream)
    }

    /// Create a server with a caller-supplied upstream client.
    pub fn with_upstream(
        config: ProxyConfig,
        upstream: Arc<dyn Upstream>,
    ) -> Result<Self, ServerError> {
        let handler = Arc::new(ProxyHandler::new(&config, upstream)?);
        let state = AppState {
            handler: handler.clone(),
        };

        let router = Self::build_router(state);
        Ok(Self { router, handler })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(proxy_entry))
            .route("/{*path}", any(proxy_entry))
            .with_state(state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                let request_id = request
                    .headers()
                    .get(X_REQUEST_ID)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown");
                tracing::info_span!(
                    "request",
                    request_id = %request_id,
                    method = %request.method(),
                    path = %request.uri().path()
                )
            }))
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            credential_configured = self.handler.has_credential(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Catch-all route: hand the request head to the proxy handler.
async fn proxy_entry(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (parts, _body) = request.into_parts();
    state.handler.handle(InboundRequest::from_parts(&parts)).await
}
