//! API endpoint, credential and output-root configuration.
//!
//! Values come from constants with environment overrides. The binary loads an
//! optional `eia_api.env` file before calling [`ApiConfig::from_env`].

use std::env;
use std::path::PathBuf;

use crate::api::ApiError;

/// Root of the EIA v2 API.
pub const API_ROOT_URL: &str = "https://api.eia.gov/v2/";

/// Route for electric power operational data.
pub const ELECTRIC_POWER_ROUTE: &str = "electricity/electric-power-operational-data/data/";

/// API version the response schema was last verified against.
pub const API_VERSION: &str = "2.0.2";

/// Server-enforced ceiling on rows per page.
pub const MAX_PAGE_LENGTH: u64 = 5000;

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default HTTP read timeout (5 minutes; large pages can be slow).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "API_KEY_EIA";

/// Environment variable overriding [`API_ROOT_URL`].
pub const BASE_URL_ENV: &str = "EIA_API_BASE_URL";

/// Environment variable holding the output root directory.
pub const OUTPUT_DIR_ENV: &str = "EIA_ARCHIVER_OUTPUT_DIR";

/// Name of the optional dotenv file carrying the API key.
pub const DOTENV_FILE: &str = "eia_api.env";

/// Connection settings for one [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// API root, e.g. `https://api.eia.gov/v2/`.
    pub base_url: String,
    /// Resource route appended to the root.
    pub route: String,
    /// Static API key sent as the `api_key` query parameter.
    pub api_key: String,
    /// Version the first response is checked against.
    pub expected_version: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
}

impl ApiConfig {
    /// Creates a config for the electric power route with default timeouts.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: API_ROOT_URL.to_string(),
            route: ELECTRIC_POWER_ROUTE.to_string(),
            api_key: api_key.into(),
            expected_version: API_VERSION.to_string(),
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
        }
    }

    /// Reads the API key (and optional base URL override) from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredential`] when `API_KEY_EIA` is unset or blank.
    pub fn from_env() -> Result<Self, ApiError> {
        let api_key = env_var_non_empty(API_KEY_ENV)
            .ok_or_else(|| ApiError::missing_credential(API_KEY_ENV))?;
        let mut config = Self::new(api_key);
        if let Some(base_url) = env_var_non_empty(BASE_URL_ENV) {
            config.base_url = base_url;
        }
        Ok(config)
    }

    /// Points the config at another API root (tests, mirrors).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = route.into();
        self
    }

    #[must_use]
    pub fn with_expected_version(mut self, version: impl Into<String>) -> Self {
        self.expected_version = version.into();
        self
    }
}

/// Resolves the root under which per-run output directories are allocated.
///
/// Uses `EIA_ARCHIVER_OUTPUT_DIR` when set, `./output` otherwise, with an
/// `eia_api` subdirectory appended.
#[must_use]
pub fn output_root_from_env() -> PathBuf {
    env_var_non_empty(OUTPUT_DIR_ENV)
        .map_or_else(|| PathBuf::from("output"), PathBuf::from)
        .join("eia_api")
}

fn env_var_non_empty(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
