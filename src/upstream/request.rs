//! Upstream URL construction.

use url::Url;

use crate::config::Credential;
use crate::http::request::QueryParams;

/// Query parameter the upstream API reads its key from.
pub const KEY_PARAM: &str = "key";

/// A GET against the upstream API, credential included.
///
/// Only [`UpstreamRequest::url`] carries the key; use
/// [`UpstreamRequest::redacted`] for anything that gets logged.
#[derive(Clone)]
pub struct UpstreamRequest {
    url: Url,
    operation: String,
}

impl UpstreamRequest {
    /// `base` + `operation` path, every forwarded parameter except a
    /// client-supplied `key`, then the server credential last.
    pub fn new(
        base: &Url,
        operation: &str,
        params: &QueryParams,
        credential: &Credential,
    ) -> Self {
        let mut url = base.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(operation.split('/').filter(|s| !s.is_empty()));
        }

        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params.iter().filter(|(name, _)| name.as_str() != KEY_PARAM) {
                query.append_pair(name, value);
            }
            query.append_pair(KEY_PARAM, credential.expose());
        }

        Self {
            url,
            operation: operation.to_string(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Scheme, host and path only.
    pub fn redacted(&self) -> String {
        let mut url = self.url.clone();
        url.set_query(None);
        url.to_string()
    }
}

impl std::fmt::Debug for UpstreamRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamRequest")
            .field("url", &self.redacted())
            .field("operation", &self.operation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://maps.googleapis.com/maps/api").unwrap()
    }

    fn credential() -> Credential {
        Credential::new("server-key").unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_builds_operation_url() {
        let request = UpstreamRequest::new(
            &base(),
            "place/autocomplete/json",
            &params(&[("input", "foo")]),
            &credential(),
        );
        assert_eq!(
            request.url().as_str(),
            "https://maps.googleapis.com/maps/api/place/autocomplete/json?input=foo&key=server-key"
        );
        assert_eq!(request.operation(), "place/autocomplete/json");
    }

    #[test]
    fn test_trailing_slash_base() {
        let base = Url::parse("http://127.0.0.1:9000/maps/api/").unwrap();
        let request = UpstreamRequest::new(&base, "geocode/json", &params(&[]), &credential());
        assert_eq!(request.url().path(), "/maps/api/geocode/json");
    }

    #[test]
    fn test_client_key_is_replaced() {
        let request = UpstreamRequest::new(
            &base(),
            "place/details/json",
            &params(&[("place_id", "bar"), ("key", "client-key")]),
            &credential(),
        );
        let keys: Vec<_> = request
            .url()
            .query_pairs()
            .filter(|(k, _)| k == "key")
            .map(|(_, v)| v.into_owned())
            .collect();
        assert_eq!(keys, vec!["server-key".to_string()]);

        let last = request.url().query_pairs().last().unwrap();
        assert_eq!(last.0, "key");
    }

    #[test]
    fn test_values_are_encoded() {
        let request = UpstreamRequest::new(
            &base(),
            "place/autocomplete/json",
            &params(&[("input", "café & bar")]),
            &credential(),
        );
        let input = request
            .url()
            .query_pairs()
            .find(|(k, _)| k == "input")
            .map(|(_, v)| v.into_owned());
        assert_eq!(input.as_deref(), Some("café & bar"));
    }

    #[test]
    fn test_redacted_hides_credential() {
        let request = UpstreamRequest::new(
            &base(),
            "place/details/json",
            &params(&[("place_id", "bar")]),
            &credential(),
        );
        assert!(!request.redacted().contains("server-key"));
        assert!(!format!("{:?}", request).contains("server-key"));
        assert_eq!(
            request.redacted(),
            "https://maps.googleapis.com/maps/api/place/details/json"
        );
    }
}
