//! User-Agent string for API traffic.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/catalyst-cooperative/pudl-scrapers";

/// Default User-Agent for API requests (identifies the tool and its version).
#[must_use]
pub(crate) fn default_api_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("eia-archiver/{version} (open-data-archiver; +{PROJECT_UA_URL})")
}
