//! HTTP session for one API endpoint.
//!
//! [`ApiClient`] owns the reqwest connection pool, the API key and the
//! endpoint URL. Create it once and reuse it for every page of a fetch.

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, instrument};
use url::Url;

use super::error::ApiError;
use super::page::PageResponse;
use crate::config::{API_KEY_ENV, ApiConfig};
use crate::query::QuerySpec;
use crate::user_agent;

/// Header carrying the JSON-encoded query parameters.
pub const PARAMS_HEADER: &str = "X-Params";

/// Client for one API route, authenticated with a static API key.
///
/// The key is sent as the `api_key` query parameter; the query itself travels
/// in the [`PARAMS_HEADER`] header so long facet lists stay readable.
///
/// Not intended to be shared across concurrent fetches.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoint: Url,
    api_key: String,
    expected_version: String,
}

impl ApiClient {
    /// Builds a client from `config`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::MissingCredential`] when the API key is blank
    /// - [`ApiError::InvalidUrl`] when root and route do not form a URL
    /// - [`ApiError::ClientBuild`] when reqwest rejects the configuration
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(ApiError::missing_credential(API_KEY_ENV));
        }

        let endpoint = endpoint_url(&config.base_url, &config.route)?;
        let client = build_client(config.connect_timeout_secs, config.read_timeout_secs)
            .map_err(|source| ApiError::ClientBuild { source })?;

        debug!(endpoint = %endpoint, "API client ready");
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
            expected_version: config.expected_version.clone(),
        })
    }

    /// Builds a client from [`ApiConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), plus a missing `API_KEY_EIA`.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ApiConfig::from_env()?)
    }

    /// Endpoint URL without the API key.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// API version responses are checked against.
    #[must_use]
    pub fn expected_version(&self) -> &str {
        &self.expected_version
    }

    /// Requests one page for `spec`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::HttpStatus`] for any non-success status (no retry)
    /// - [`ApiError::Network`] / [`ApiError::Timeout`] for transport failures
    /// - [`ApiError::MalformedResponse`] when the body lacks `response.total`
    #[instrument(skip(self, spec), fields(offset = spec.offset()))]
    pub async fn get_page(&self, spec: &QuerySpec) -> Result<PageResponse, ApiError> {
        let params = spec
            .to_header_value()
            .map_err(|source| ApiError::Encode { source })?;
        debug!(x_params = %params, "requesting page");

        let endpoint = self.endpoint.as_str();
        let response = self
            .client
            .get(self.authenticated_url())
            .header(PARAMS_HEADER, params)
            .send()
            .await
            .map_err(|e| ApiError::transport(endpoint, e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::http_status(
                endpoint,
                status.as_u16(),
                spec.offset(),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::transport(endpoint, e.without_url()))?;

        PageResponse::parse(body, spec.offset())
            .map_err(|reason| ApiError::malformed(endpoint, spec.offset(), reason))
    }

    fn authenticated_url(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("api_key", &self.api_key);
        url
    }
}

/// Joins the API root and route, tolerating a root without a trailing slash.
fn endpoint_url(base_url: &str, route: &str) -> Result<Url, ApiError> {
    let base = if base_url.ends_with('/') {
        base_url.to_string()
    } else {
        format!("{base_url}/")
    };
    Url::parse(&base)
        .and_then(|root| root.join(route.trim_start_matches('/')))
        .map_err(|_| ApiError::invalid_url(format!("{base}{route}")))
}

fn build_client(connect_timeout_secs: u64, read_timeout_secs: u64) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Client::builder()
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .timeout(Duration::from_secs(read_timeout_secs))
        .gzip(true)
        .user_agent(user_agent::default_api_user_agent())
        .default_headers(headers)
        .build()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::query::QueryOptions;
    use crate::test_support::socket_guard::start_mock_server_or_skip;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Match, Mock, Request, ResponseTemplate};

    const ROUTE: &str = "electricity/electric-power-operational-data/data/";

    fn test_config(base_url: &str) -> ApiConfig {
        ApiConfig::new("test-key").with_base_url(base_url)
    }

    /// Matches requests whose `X-Params` header decodes to the expected offset.
    struct ParamsOffset(u64);

    impl Match for ParamsOffset {
        fn matches(&self, request: &Request) -> bool {
            request
                .headers
                .get(PARAMS_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|raw| serde_json::from_str::<serde_json::Value>(raw).ok())
                .and_then(|params| params["offset"].as_u64())
                == Some(self.0)
        }
    }

    #[test]
    fn test_new_rejects_blank_api_key() {
        let config = ApiConfig::new("  ");
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::MissingCredential { .. })
        ));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = test_config("not a url");
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn test_endpoint_joins_root_and_route() {
        let client = ApiClient::new(&test_config("https://api.eia.gov/v2")).unwrap();
        assert_eq!(
            client.endpoint().as_str(),
            "https://api.eia.gov/v2/electricity/electric-power-operational-data/data/"
        );
        assert!(
            client.endpoint().query().is_none(),
            "endpoint must not carry the API key"
        );
    }

    #[tokio::test]
    async fn test_get_page_sends_key_query_and_params_header() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .and(path(format!("/{ROUTE}")))
            .and(query_param("api_key", "test-key"))
            .and(header("content-type", "application/json"))
            .and(ParamsOffset(0))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"response":{"total":3,"data":[{},{},{}]},"apiVersion":"2.0.2"}"#,
            ))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&test_config(&mock_server.uri())).unwrap();
        let page = client
            .get_page(&QueryOptions::default().build())
            .await
            .unwrap();

        assert_eq!(page.total(), 3);
        assert_eq!(page.row_count(), 3);
        assert_eq!(page.api_version(), Some("2.0.2"));
    }

    #[tokio::test]
    async fn test_get_page_maps_error_status_without_leaking_key() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&test_config(&mock_server.uri())).unwrap();
        let error = client
            .get_page(&QueryOptions::default().build().with_offset(5000))
            .await
            .unwrap_err();

        match &error {
            ApiError::HttpStatus { status, offset, .. } => {
                assert_eq!(*status, 503);
                assert_eq!(*offset, 5000);
            }
            other => panic!("Expected HttpStatus error, got: {other:?}"),
        }
        assert!(
            !error.to_string().contains("test-key"),
            "error must not contain the API key: {error}"
        );
    }

    #[tokio::test]
    async fn test_get_page_rejects_body_without_total() {
        let Some(mock_server) = start_mock_server_or_skip().await else {
            return;
        };

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"error":"bad facet"}"#))
            .mount(&mock_server)
            .await;

        let client = ApiClient::new(&test_config(&mock_server.uri())).unwrap();
        let result = client.get_page(&QueryOptions::default().build()).await;

        assert!(matches!(result, Err(ApiError::MalformedResponse { .. })));
    }
}
