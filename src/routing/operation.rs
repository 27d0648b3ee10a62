//! Upstream operations and their identifying parameters.

use crate::config::OperationConfig;
use crate::http::error::ProxyError;
use crate::http::request::InboundRequest;

pub const AUTOCOMPLETE: &str = "place/autocomplete/json";
pub const DETAILS: &str = "place/details/json";

/// An upstream sub-resource reachable through the proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    path: String,
    required_any: Vec<String>,
}

impl Operation {
    pub fn new(path: impl Into<String>, required_any: Vec<String>) -> Self {
        Self {
            path: path.into().trim_matches('/').to_string(),
            required_any,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fails when none of the identifying parameters is present.
    /// Operations without identifying parameters accept anything.
    pub fn check(&self, request: &InboundRequest) -> Result<(), ProxyError> {
        if self.required_any.is_empty()
            || self.required_any.iter().any(|p| request.param(p).is_some())
        {
            Ok(())
        } else {
            Err(ProxyError::missing_parameter(&self.required_any))
        }
    }
}

impl From<&OperationConfig> for Operation {
    fn from(config: &OperationConfig) -> Self {
        Operation::new(config.path.clone(), config.required_any.clone())
    }
}
