//! HTTP access to the EIA v2 API.
//!
//! - [`ApiClient`] - one reusable session per endpoint
//! - [`PageResponse`] - one raw page plus its envelope fields
//! - [`ApiError`] - construction, transport and status errors

mod client;
mod error;
mod page;

pub use client::{ApiClient, PARAMS_HEADER};
pub use error::ApiError;
pub use page::PageResponse;
