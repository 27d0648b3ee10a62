//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (path, query params)
//!     → router.rs (fixed route or passthrough lookup)
//!     → operation.rs (identifying-parameter check)
//!     → Return: upstream operation path, or a 400/404 ProxyError
//!
//! Route Compilation (at startup):
//!     RoutingConfig
//!     → Operation allow-list keyed by path
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - The fixed route is checked before the passthrough table
//! - Unknown operations never reach upstream

pub mod operation;
pub mod router;

pub use operation::Operation;
pub use router::Router;
