//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream base URL and CORS origins
//! - Check route and operation paths are well-formed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - A missing credential is not a validation error; the handler answers
//!   500 for it and startup decides whether to refuse

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream.base_url `{0}` is not a valid http(s) URL")]
    InvalidBaseUrl(String),

    #[error("cors.allowed_origin must not be empty")]
    EmptyOrigin,

    #[error("cors.allowed_origin entry `{0}` is not a valid header value")]
    InvalidOrigin(String),

    #[error("routing.fixed_route `{0}` must start with '/'")]
    InvalidFixedRoute(String),

    #[error("routing operation path `{0}` must be non-empty and relative")]
    InvalidOperation(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a parsed configuration, collecting every problem.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        _ => errors.push(ValidationError::InvalidBaseUrl(config.upstream.base_url.clone())),
    }

    let origin = config.cors.allowed_origin.trim();
    if origin.is_empty() {
        errors.push(ValidationError::EmptyOrigin);
    } else if origin != "*" && !origin.eq_ignore_ascii_case("reflect") {
        for entry in origin.split(',').map(str::trim) {
            if entry.is_empty() || HeaderValue::from_str(entry).is_err() {
                errors.push(ValidationError::InvalidOrigin(entry.to_string()));
            }
        }
    }

    if !config.routing.fixed_route.starts_with('/') {
        errors.push(ValidationError::InvalidFixedRoute(
            config.routing.fixed_route.clone(),
        ));
    }

    for op in &config.routing.operations {
        if op.path.trim_matches('/').is_empty() || op.path.starts_with('/') {
            errors.push(ValidationError::InvalidOperation(op.path.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::OperationConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "not a url".into();
        config.routing.fixed_route = "proxyPlacesAPI".into();
        config.routing.operations.push(OperationConfig::new("/geocode/json", &[]));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::InvalidBaseUrl("not a url".into())));
        assert!(errors.contains(&ValidationError::InvalidFixedRoute("proxyPlacesAPI".into())));
        assert!(errors.contains(&ValidationError::InvalidOperation("/geocode/json".into())));
    }

    #[test]
    fn test_origin_policies() {
        let mut config = ProxyConfig::default();
        for ok in ["*", "reflect", "https://a.example", "https://a.example, https://b.example"] {
            config.cors.allowed_origin = ok.into();
            assert!(validate_config(&config).is_ok(), "{ok} should be accepted");
        }

        config.cors.allowed_origin = "  ".into();
        assert_eq!(validate_config(&config).unwrap_err(), vec![ValidationError::EmptyOrigin]);

        config.cors.allowed_origin = "https://a.example,,".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidMetricsAddress("nope".into())]
        );
    }

    #[test]
    fn test_rejects_non_http_base() {
        let mut config = ProxyConfig::default();
        config.upstream.base_url = "ftp://maps.example/api".into();
        assert!(validate_config(&config).is_err());
    }
}
