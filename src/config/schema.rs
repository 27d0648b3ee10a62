//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All sections default so a config file (or no file at all) only needs to
//! name what it changes.

use std::fmt;

use serde::{Deserialize, Deserializer};

/// Root configuration for the places proxy.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Upstream mapping API and the credential injected into every call.
    pub upstream: UpstreamConfig,

    /// Cross-origin policy applied to every response.
    pub cors: CorsConfig,

    /// Inbound surfaces and the operations they may reach.
    pub routing: RoutingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request hardening.
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g. "0.0.0.0").
    pub host: String,

    /// Inbound port.
    pub port: u16,
}

impl ListenerConfig {
    /// `host:port` form accepted by `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Server-held API key for the upstream mapping API.
///
/// Formatting never prints the key itself; callers that need the raw value
/// go through [`Credential::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank values are treated as absent.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// The raw key, for building upstream URLs only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential([redacted])")
    }
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every operation path is appended to.
    pub base_url: String,

    /// API key. Usually supplied through the environment rather than a file.
    /// A blank value in the file counts as unset.
    #[serde(deserialize_with = "blank_as_none")]
    pub credential: Option<Credential>,

    /// Environment variable the credential is read from.
    pub credential_env: String,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<Credential>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(Credential::new))
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://maps.googleapis.com/maps/api".to_string(),
            credential: None,
            credential_env: "PLACES_API_KEY".to_string(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// `*` for any origin, `reflect` to echo the request Origin, otherwise a
    /// comma-separated allow-list of origins.
    pub allowed_origin: String,

    /// Advertise `Authorization` in `Access-Control-Allow-Headers`.
    pub allow_authorization_header: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origin: "*".to_string(),
            allow_authorization_header: true,
        }
    }
}

/// Inbound routing configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    /// Path of the fixed route that picks autocomplete or details itself.
    pub fixed_route: String,

    /// Serve `/<operation-path>` passthrough requests.
    pub passthrough: bool,

    /// Operations reachable through the passthrough surface.
    pub operations: Vec<OperationConfig>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fixed_route: "/proxyPlacesAPI".to_string(),
            passthrough: true,
            operations: default_operations(),
        }
    }
}

/// One upstream sub-resource and the parameters that identify a request to it.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationConfig {
    /// Sub-path below the base URL, e.g. `place/details/json`.
    pub path: String,

    /// At least one of these query parameters must be present and non-empty.
    #[serde(default)]
    pub required_any: Vec<String>,
}

impl OperationConfig {
    pub fn new(path: &str, required_any: &[&str]) -> Self {
        Self {
            path: path.to_string(),
            required_any: required_any.iter().map(|p| p.to_string()).collect(),
        }
    }
}

fn default_operations() -> Vec<OperationConfig> {
    vec![
        OperationConfig::new("place/autocomplete/json", &["input"]),
        OperationConfig::new("place/queryautocomplete/json", &["input"]),
        OperationConfig::new("place/details/json", &["place_id"]),
        OperationConfig::new("place/findplacefromtext/json", &["input"]),
        OperationConfig::new("place/textsearch/json", &["query"]),
        OperationConfig::new("place/nearbysearch/json", &["location"]),
        OperationConfig::new("place/photo", &["photo_reference"]),
        OperationConfig::new("geocode/json", &["address", "latlng", "place_id", "components"]),
        OperationConfig::new("timezone/json", &["location"]),
        OperationConfig::new("elevation/json", &["locations"]),
    ]
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Largest request body accepted, in bytes. Bodies are never forwarded,
    /// so this only bounds what clients may send.
    pub max_body_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024, // 64KB
        }
    }
}
