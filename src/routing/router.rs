//! Route lookup: inbound path and parameters → upstream operation.

use std::collections::HashMap;

use crate::config::RoutingConfig;
use crate::http::error::ProxyError;
use crate::http::request::InboundRequest;
use crate::routing::operation::{Operation, AUTOCOMPLETE, DETAILS};

const FIXED_ROUTE_PARAMS: [&str; 2] = ["input", "place_id"];

/// Immutable routing table built once from configuration.
#[derive(Debug, Clone)]
pub struct Router {
    fixed_route: String,
    passthrough: bool,
    operations: HashMap<String, Operation>,
}

impl Router {
    pub fn from_config(config: &RoutingConfig) -> Self {
        let operations = config
            .operations
            .iter()
            .map(Operation::from)
            .map(|op| (op.path().to_string(), op))
            .collect();

        Self {
            fixed_route: config.fixed_route.clone(),
            passthrough: config.passthrough,
            operations,
        }
    }

    /// Pick the upstream operation path for `request`, or reject it before
    /// anything is sent upstream.
    ///
    /// The fixed route chooses by parameter: `input` means autocomplete,
    /// otherwise `place_id` means details. Every other path names the
    /// operation directly and must be on the allow-list.
    pub fn resolve(&self, request: &InboundRequest) -> Result<String, ProxyError> {
        if request.path == self.fixed_route {
            return if request.param("input").is_some() {
                Ok(AUTOCOMPLETE.to_string())
            } else if request.param("place_id").is_some() {
                Ok(DETAILS.to_string())
            } else {
                Err(ProxyError::missing_parameter(
                    &FIXED_ROUTE_PARAMS.map(String::from),
                ))
            };
        }

        let path = request.path.trim_matches('/');
        if !self.passthrough {
            return Err(ProxyError::UnknownOperation(path.to_string()));
        }

        let operation = self
            .operations
            .get(path)
            .ok_or_else(|| ProxyError::UnknownOperation(path.to_string()))?;
        operation.check(request)?;

        Ok(operation.path().to_string())
    }
}
