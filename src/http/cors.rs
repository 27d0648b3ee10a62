//! Cross-origin response headers.
//!
//! Applied by [`Cors::apply`] from the proxy handler's single exit point, so
//! preflights, relayed responses and every error carry the same headers.
//! A browser cannot tell an error without these headers apart from a
//! network failure.

use axum::http::{header, HeaderMap, HeaderValue};

use crate::config::CorsConfig;

const ALLOW_METHODS: &str = "GET, POST, OPTIONS";
const MAX_AGE_SECS: &str = "3600";

/// Which value `Access-Control-Allow-Origin` takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsPolicy {
    /// `*`. Simplest, but browsers refuse it for credentialed requests.
    Any,
    /// Echo the request's Origin back.
    Reflect,
    /// Fixed allow-list. A single entry is always sent as is; with several
    /// entries a matching request Origin is echoed and the first entry is
    /// sent otherwise.
    AllowList(Vec<HeaderValue>),
}

impl CorsPolicy {
    /// Parse `*`, `reflect`, or a comma-separated list of origins.
    /// Entries that aren't valid header values are skipped (validation
    /// already reported them).
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value == "*" || value.is_empty() {
            return Self::Any;
        }
        if value.eq_ignore_ascii_case("reflect") {
            return Self::Reflect;
        }

        let origins: Vec<HeaderValue> = value
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();

        if origins.is_empty() {
            Self::Any
        } else {
            Self::AllowList(origins)
        }
    }

    /// The origin to send, and whether it depends on the request Origin.
    fn resolve(&self, origin: Option<&HeaderValue>) -> (HeaderValue, bool) {
        match self {
            Self::Any => (HeaderValue::from_static("*"), false),
            Self::Reflect => match origin {
                Some(origin) => (origin.clone(), true),
                None => (HeaderValue::from_static("*"), true),
            },
            Self::AllowList(origins) if origins.len() == 1 => (origins[0].clone(), false),
            Self::AllowList(origins) => {
                let matched = origin.and_then(|o| origins.iter().find(|allowed| *allowed == o));
                (matched.unwrap_or(&origins[0]).clone(), true)
            }
        }
    }
}

/// CORS policy plus the static header values it sends.
#[derive(Debug, Clone)]
pub struct Cors {
    policy: CorsPolicy,
    allow_headers: HeaderValue,
}

impl Cors {
    pub fn new(policy: CorsPolicy, allow_authorization: bool) -> Self {
        let allow_headers = if allow_authorization {
            HeaderValue::from_static("Content-Type, Authorization")
        } else {
            HeaderValue::from_static("Content-Type")
        };
        Self {
            policy,
            allow_headers,
        }
    }

    pub fn from_config(config: &CorsConfig) -> Self {
        Self::new(
            CorsPolicy::parse(&config.allowed_origin),
            config.allow_authorization_header,
        )
    }

    /// Attach the CORS headers to `headers`. `Max-Age` is only sent on
    /// preflight responses.
    pub fn apply(&self, headers: &mut HeaderMap, origin: Option<&HeaderValue>, preflight: bool) {
        let (allow_origin, varies) = self.policy.resolve(origin);

        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, allow_origin);
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOW_METHODS),
        );
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());

        if preflight {
            headers.insert(
                header::ACCESS_CONTROL_MAX_AGE,
                HeaderValue::from_static(MAX_AGE_SECS),
            );
        }
        if varies {
            headers.append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self::from_config(&CorsConfig::default())
    }
}
