//! EIA Archiver Core Library
//!
//! Paginated bulk download of EIA open-data API queries into single,
//! compressed JSON archives.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`query`] - Typed query options and the `X-Params` payload
//! - [`version`] - API version drift classification
//! - [`api`] - HTTP session and page responses
//! - [`fetch`] - Sequential, lazily fetched page sequence
//! - [`aggregate`] - Streaming assembly of pages into one JSON array
//! - [`archive`] - Gzip compression of finished documents
//! - [`archiver`] - The full pipeline for one query
//! - [`output_dir`] - Per-run output directory naming
//! - [`config`] - Endpoint, credential and output-root settings

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregate;
pub mod api;
pub mod archive;
pub mod archiver;
pub mod config;
pub mod fetch;
pub mod output_dir;
pub mod progress;
pub mod query;
pub mod version;

mod user_agent;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use aggregate::{AggregateSummary, aggregate, aggregate_to_file};
pub use api::{ApiClient, ApiError, PageResponse};
pub use archive::{ArchiveError, finalize, gzip_file};
pub use archiver::{Archiver, FetchSummary, archive_query};
pub use config::{API_VERSION, ApiConfig, MAX_PAGE_LENGTH, output_root_from_env};
pub use fetch::{FetchError, PageSource, PaginatedFetcher, Pages, request_count};
pub use output_dir::{latest_output_dir, new_output_dir};
pub use query::{FacetValue, Frequency, QueryOptions, QuerySpec, SortDirection, SortDirective};
pub use version::{DriftSeverity, VersionGuard, VersionOutcome, check};
