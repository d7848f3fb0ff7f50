//! Shared helpers for integration tests: socket guard and a mock EIA endpoint.

#![allow(dead_code)]

#[path = "../../src/test_support/socket_guard.rs"]
pub mod socket_guard;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use eia_archiver_core::{ApiClient, ApiConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const ROUTE: &str = "/electricity/electric-power-operational-data/data/";
pub const API_KEY: &str = "integration-key";

/// Builds an EIA-shaped page body.
#[must_use]
pub fn page_body(total: u64, offset: u64, rows: u64, api_version: Option<&str>) -> String {
    let data: Vec<serde_json::Value> = (0..rows)
        .map(|row| {
            serde_json::json!({
                "period": (2001 + offset + row).to_string(),
                "location": "US",
                "cost-per-btu": 2.5,
                "cost-per-btu-units": "dollars per million Btu",
            })
        })
        .collect();
    let mut body = serde_json::json!({
        "response": {"total": total, "dateFormat": "YYYY", "frequency": "annual", "data": data},
        "request": {"command": "/v2/electricity/electric-power-operational-data/data/", "params": {"offset": offset}},
    });
    if let Some(version) = api_version {
        body["apiVersion"] = serde_json::Value::String(version.to_string());
    }
    body.to_string()
}

/// Mock EIA data route: answers each request according to the offset and
/// length in its `X-Params` header, optionally failing at one offset.
pub struct EiaResponder {
    pub total: u64,
    pub api_version: Option<&'static str>,
    pub fail_at_offset: Option<(u64, u16)>,
    pub requests: Arc<AtomicUsize>,
}

impl EiaResponder {
    #[must_use]
    pub fn new(total: u64) -> Self {
        Self {
            total,
            api_version: Some("2.0.2"),
            fail_at_offset: None,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Respond for EiaResponder {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let params: serde_json::Value = request
            .headers
            .get("X-Params")
            .and_then(|value| value.to_str().ok())
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        let offset = params["offset"].as_u64().unwrap_or(0);
        let length = params["length"].as_u64().unwrap_or(5000);

        if let Some((fail_offset, status)) = self.fail_at_offset
            && fail_offset == offset
        {
            return ResponseTemplate::new(status);
        }

        let rows = self.total.saturating_sub(offset).min(length);
        ResponseTemplate::new(200).set_body_string(page_body(
            self.total,
            offset,
            rows,
            self.api_version,
        ))
    }
}

/// Mounts `responder` on the data route of `server`.
pub async fn mount_eia(server: &MockServer, responder: EiaResponder) {
    Mock::given(method("GET"))
        .and(path(ROUTE))
        .respond_with(responder)
        .mount(server)
        .await;
}

/// Client pointed at the mock server.
#[must_use]
pub fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ApiConfig::new(API_KEY).with_base_url(server.uri()))
        .expect("client for mock server")
}
