//! Environment overrides.
//!
//! Read once at startup; request handling never consults the environment.
//! The lookup is injected so tests don't have to mutate process state.

use crate::config::loader::ConfigError;
use crate::config::schema::{Credential, LogFormat, ProxyConfig};

pub const PORT: &str = "PORT";
pub const ALLOWED_ORIGIN: &str = "ALLOWED_ORIGIN";
pub const UPSTREAM_BASE_URL: &str = "UPSTREAM_BASE_URL";
pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const LOG_FORMAT: &str = "LOG_FORMAT";

/// Apply recognised environment variables on top of `config`.
///
/// The credential variable name is itself configurable
/// (`upstream.credential_env`), so a file can point at e.g.
/// `FIREBASE_API_KEY`.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup(PORT) {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            name: PORT.to_string(),
            reason: format!("`{}` is not a port number", port),
        })?;
    }

    if let Some(key) = lookup(&config.upstream.credential_env) {
        if let Some(credential) = Credential::new(key) {
            config.upstream.credential = Some(credential);
        }
    }

    if let Some(origin) = lookup(ALLOWED_ORIGIN) {
        config.cors.allowed_origin = origin;
    }

    if let Some(base_url) = lookup(UPSTREAM_BASE_URL) {
        config.upstream.base_url = base_url;
    }

    if let Some(level) = lookup(LOG_LEVEL) {
        config.observability.log_level = level;
    }

    if let Some(format) = lookup(LOG_FORMAT) {
        config.observability.log_format = match format.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            "pretty" => LogFormat::Pretty,
            other => {
                return Err(ConfigError::Env {
                    name: LOG_FORMAT.to_string(),
                    reason: format!("`{}` is not one of: pretty, json", other),
                })
            }
        };
    }

    Ok(())
}
