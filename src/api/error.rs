//! Error types for the API client.
//!
//! URLs carried in errors are the endpoint without its query string, so the
//! API key never ends up in logs or error output.

use thiserror::Error;

/// Errors raised while constructing the client or requesting a page.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key was not configured.
    #[error("API key not found: set {variable} (e.g. in eia_api.env)")]
    MissingCredential {
        /// The environment variable that should hold the key.
        variable: String,
    },

    /// The reqwest client could not be built.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        #[source]
        source: reqwest::Error,
    },

    /// The configured root or route does not form a valid URL.
    #[error("invalid API URL: {url}")]
    InvalidUrl { url: String },

    /// Network-level failure (DNS, connection refused, TLS, truncated body).
    #[error("network error requesting {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request timed out.
    #[error("timeout requesting {url}")]
    Timeout { url: String },

    /// The server answered with a non-success status.
    #[error("HTTP {status} requesting {url} at offset {offset}")]
    HttpStatus {
        url: String,
        status: u16,
        /// Offset of the page that failed.
        offset: u64,
    },

    /// The query parameters could not be encoded for the header.
    #[error("failed to encode query parameters: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The body is not the expected JSON envelope.
    #[error("malformed response from {url} at offset {offset}: {reason}")]
    MalformedResponse {
        url: String,
        offset: u64,
        reason: String,
    },
}

impl ApiError {
    pub fn missing_credential(variable: impl Into<String>) -> Self {
        Self::MissingCredential {
            variable: variable.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Maps a transport error, promoting timeouts to [`ApiError::Timeout`].
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    pub fn http_status(url: impl Into<String>, status: u16, offset: u64) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            offset,
        }
    }

    pub fn malformed(url: impl Into<String>, offset: u64, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            offset,
            reason: reason.into(),
        }
    }

    /// HTTP status code, when the error came from a status response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
