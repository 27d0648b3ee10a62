//! Startup orchestration.
//!
//! # Responsibilities
//! - Resolve and validate configuration
//! - Refuse to start without a credential unless told otherwise
//! - Initialize logging and metrics, then bind and serve
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and maps to a nonzero exit code
//! - Listener binds last (traffic only when ready)

use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::{resolve_config, ConfigError};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;
use crate::observability::{logging, metrics};

/// Options taken from the command line.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    pub config_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub allow_missing_credential: bool,
}

/// Why the process could not start or keep serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("no upstream credential configured; set {env}")]
    MissingCredential { env: String },

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl StartupError {
    /// 2 for configuration problems, 1 for everything else.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            StartupError::Config(_)
            | StartupError::MissingCredential { .. }
            | StartupError::Server(ServerError::Config(_)) => ExitCode::from(2),
            _ => ExitCode::FAILURE,
        }
    }
}

/// Bring the proxy up and serve until SIGINT/SIGTERM.
pub async fn run(options: StartupOptions) -> Result<(), StartupError> {
    let mut config = resolve_config(options.config_path.as_deref(), |name| {
        std::env::var(name).ok()
    })?;
    if let Some(port) = options.port {
        config.listener.port = port;
    }

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "places-proxy starting");

    if config.upstream.credential.is_none() {
        if !options.allow_missing_credential {
            return Err(StartupError::MissingCredential {
                env: config.upstream.credential_env.clone(),
            });
        }
        tracing::warn!(
            env = %config.upstream.credential_env,
            "No upstream credential; every proxied request will answer 500"
        );
    }

    tracing::info!(
        bind_address = %config.listener.bind_address(),
        upstream = %config.upstream.base_url,
        allowed_origin = %config.cors.allowed_origin,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        }
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let server = HttpServer::new(config)?;

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = StartupError::MissingCredential {
            env: "PLACES_API_KEY".into(),
        };
        assert_eq!(missing.exit_code(), ExitCode::from(2));

        let bind = StartupError::Bind {
            address: "0.0.0.0:80".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(bind.exit_code(), ExitCode::FAILURE);
    }

    #[test]
    fn test_missing_credential_message_names_variable() {
        let err = StartupError::MissingCredential {
            env: "PLACES_API_KEY".into(),
        };
        assert_eq!(
            err.to_string(),
            "no upstream credential configured; set PLACES_API_KEY"
        );
    }
}
