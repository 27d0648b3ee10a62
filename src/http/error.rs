//! Request-time error taxonomy.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::http::response::relay;
use crate::upstream::{UpstreamError, UpstreamResponse};

/// Everything that can stop a request from being relayed as is.
///
/// The `Display` text is what the client sees in `{"error": ...}`, so no
/// variant renders its inner cause.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No credential configured; upstream is never contacted.
    #[error("configuration missing")]
    ConfigurationMissing,

    /// A required identifying parameter is absent.
    #[error("{0}")]
    Validation(String),

    /// Passthrough path that isn't an allowed upstream operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// Declared request body larger than `security.max_body_size`.
    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(u64),

    /// Transport failure reaching upstream.
    #[error("proxy failure")]
    Upstream(#[source] UpstreamError),

    /// Upstream answered with a non-2xx status.
    #[error("upstream responded with status {}", .0.status)]
    Rejected(UpstreamResponse),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::ConfigurationMissing | ProxyError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ProxyError::Validation(_) => StatusCode::BAD_REQUEST,
            ProxyError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::Rejected(response) => response.status,
        }
    }

    pub fn missing_parameter(names: &[String]) -> Self {
        let description = match names {
            [single] => format!("missing required parameter: {}", single),
            _ => format!("missing required parameter: one of {}", names.join(", ")),
        };
        ProxyError::Validation(description)
    }
}

/// JSON body of every locally generated error.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        match self {
            ProxyError::Rejected(upstream) => relay(upstream),
            other => {
                let status = other.status();
                (status, Json(ErrorBody { error: other.to_string() })).into_response()
            }
        }
    }
}
