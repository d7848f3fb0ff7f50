//! Paginated retrieval of one query's full result set.
//!
//! The first request learns the total row count; the remaining requests are
//! issued one at a time, each at the next multiple of the page length.
//!
//! # Example
//!
//! ```no_run
//! use eia_archiver_core::api::ApiClient;
//! use eia_archiver_core::fetch::{PageSource, PaginatedFetcher};
//! use eia_archiver_core::query::QueryOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ApiClient::from_env()?;
//! let mut pages = PaginatedFetcher::new(&client).fetch(QueryOptions::default().build())?;
//! while let Some(page) = pages.next_page().await {
//!     let page = page?;
//!     println!("offset {} carried {} rows", page.offset(), page.row_count());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod pages;
mod source;

pub use error::FetchError;
pub use pages::{PaginatedFetcher, Pages, request_count};
pub use source::PageSource;
