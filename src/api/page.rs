//! One server reply of a paginated fetch.

use serde::Deserialize;
use serde_json::Value;

/// A single page: the raw body plus the few envelope fields pagination needs.
///
/// The body is kept verbatim so the aggregate document preserves the full
/// request/response metadata of every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResponse {
    body: String,
    offset: u64,
    total: u64,
    api_version: Option<String>,
    row_count: u64,
    echoed_params: Option<Value>,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "apiVersion")]
    api_version: Option<Value>,
    response: Option<ResponseSection>,
    request: Option<RequestSection>,
}

#[derive(Deserialize)]
struct ResponseSection {
    total: Option<Total>,
    data: Option<Value>,
}

#[derive(Deserialize)]
struct RequestSection {
    params: Option<Value>,
}

/// The live API reports `total` as a number or as a numeric string.
#[derive(Deserialize)]
#[serde(untagged)]
enum Total {
    Number(u64),
    Text(String),
}

impl PageResponse {
    /// Parses the envelope of `body`, requested at `offset`.
    ///
    /// # Errors
    ///
    /// Returns a description of the problem when the body is not JSON or
    /// lacks a usable `response.total`.
    pub fn parse(body: String, offset: u64) -> Result<Self, String> {
        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            if e.is_data() {
                format!("unexpected response structure: {e}")
            } else {
                format!("invalid JSON: {e}")
            }
        })?;

        let response = envelope
            .response
            .ok_or_else(|| "missing `response` object".to_string())?;
        let total = match response.total {
            Some(Total::Number(total)) => total,
            Some(Total::Text(raw)) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("non-numeric response.total '{raw}'"))?,
            None => return Err("missing response.total".to_string()),
        };

        Ok(Self {
            offset,
            total,
            api_version: envelope.api_version.as_ref().and_then(version_text),
            row_count: response.data.as_ref().map_or(0, row_count),
            echoed_params: envelope.request.and_then(|request| request.params),
            body,
        })
    }

    /// Raw response body, exactly as received.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Offset this page was requested at.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Total rows matched by the query (same on every page of a fetch).
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[must_use]
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_deref()
    }

    /// Rows carried in `response.data`.
    #[must_use]
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    /// Parameters as interpreted by the API (`request.params`).
    #[must_use]
    pub fn echoed_params(&self) -> Option<&Value> {
        self.echoed_params.as_ref()
    }

    /// Consumes the page, returning its body.
    #[must_use]
    pub fn into_body(self) -> String {
        self.body
    }
}

/// `apiVersion` as text. Numbers are kept as written so a bare `2` still
/// reaches the drift check; any other type means no usable version.
fn version_text(value: &Value) -> Option<String> {
    match value {
        Value::String(version) => Some(version.clone()),
        Value::Number(version) => Some(version.to_string()),
        _ => None,
    }
}

/// Rows in `response.data`; zero unless it is an array.
fn row_count(data: &Value) -> u64 {
    data.as_array().map_or(0, |rows| rows.len() as u64)
}
