//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, trace span)
//!     → request.rs (method, path, query params, Origin)
//!     → proxy handler (routing, upstream call)
//!     → response.rs / error.rs (relay or JSON error)
//!     → cors.rs (headers on every response)
//!     → Send to client
//! ```

pub mod cors;
pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use error::ProxyError;
pub use request::{InboundRequest, X_REQUEST_ID};
pub use server::{HttpServer, ServerError};
