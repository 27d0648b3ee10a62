//! Proxy handling subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest
//!     → OPTIONS? answer 204 locally
//!     → credential configured? else 500
//!     → routing (operation + required params) else 400/404
//!     → UpstreamRequest (base URL + operation + params + key)
//!     → Upstream::get (exactly once)
//!     → relay status/body, or map the failure
//!     → CORS headers on the way out, whatever happened
//! ```

pub mod handler;

pub use handler::ProxyHandler;
