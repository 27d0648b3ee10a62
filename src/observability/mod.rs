//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Proxy handler and HTTP layers produce:
//!     → logging.rs (structured log events, request ID in the span)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through the trace span of every request
//! - Credentials are never logged; upstream URLs are logged without query

pub mod logging;
pub mod metrics;
