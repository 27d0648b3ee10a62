//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file)
//!     → env.rs (PORT, PLACES_API_KEY, ALLOWED_ORIGIN, ...)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → handed to HttpServer::new, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup and never mutated
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{resolve_config, ConfigError};
pub use schema::{
    CorsConfig, Credential, ListenerConfig, LogFormat, ObservabilityConfig, OperationConfig,
    ProxyConfig, RoutingConfig, SecurityConfig, UpstreamConfig,
};
